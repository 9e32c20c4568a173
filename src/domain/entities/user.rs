use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    PendingApproval,
    Active,
    Inactive,
    Withdrawn,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::PendingApproval => "pending_approval",
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Withdrawn => "withdrawn",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_approval" => Ok(UserStatus::PendingApproval),
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "withdrawn" => Ok(UserStatus::Withdrawn),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub role_id: i64,
    pub role_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login_id: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub role_id: i64,
}

// DTOs for API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub login_id: String,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub role_id: i64,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub login_id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveUserRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub status: Option<UserStatus>,
    pub role_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login_id: user.login_id,
            name: user.name,
            email: user.email,
            status: user.status,
            role_id: user.role_id,
            role: user.role_name,
            created_at: user.created_at,
        }
    }
}
