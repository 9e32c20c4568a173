/// Verified identity of the caller, rebuilt from the token on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role_id: i64,
}
