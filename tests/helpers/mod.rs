#![allow(unused_imports)]
pub mod rbac_helpers;
pub mod test_db;

pub use rbac_helpers::*;
pub use test_db::*;
