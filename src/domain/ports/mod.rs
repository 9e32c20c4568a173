pub mod award_repository;
pub mod education_repository;
pub mod permission_store;
pub mod post_repository;
pub mod role_repository;
pub mod user_repository;
