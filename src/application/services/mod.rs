pub mod auth_service;
pub mod award_service;
pub mod education_service;
pub mod permission_service;
pub mod post_service;
pub mod role_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use award_service::AwardService;
pub use education_service::EducationService;
pub use permission_service::PermissionService;
pub use post_service::PostService;
pub use role_service::RoleService;
pub use user_service::UserService;
