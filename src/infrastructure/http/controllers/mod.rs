pub mod auth;
pub mod awards;
pub mod education;
pub mod posts;
pub mod roles;
pub mod users;
