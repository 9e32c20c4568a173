pub mod award;
pub mod education;
pub mod post;
pub mod principal;
pub mod role;
pub mod user;

pub use award::*;
pub use education::*;
pub use post::*;
pub use principal::*;
pub use role::*;
pub use user::*;
