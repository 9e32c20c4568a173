use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAwardRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAwardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
