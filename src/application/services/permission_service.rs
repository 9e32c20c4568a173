use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::Action;
use crate::domain::ports::permission_store::PermissionStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Answers "may this user do X" against the live role/permission graph.
///
/// Every check is a fresh read of the store, so a committed grant edit is
/// visible to the very next check. Unknown users and roles without grants
/// collapse to "no permissions". The only error is `StoreUnavailable`, which
/// callers must not confuse with a denial.
#[derive(Clone)]
pub struct PermissionService {
    store: Arc<dyn PermissionStore>,
}

impl PermissionService {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Every action granted to the user's role. Empty if the user is unknown.
    pub async fn get_user_permissions(&self, user_id: i64) -> DomainResult<BTreeSet<String>> {
        match self.store.find_role_and_permissions_for_user(user_id).await {
            Ok(Some(grants)) => Ok(grants.actions),
            Ok(None) => Ok(BTreeSet::new()),
            Err(e) => {
                tracing::error!("Permission lookup failed for user {}: {}", user_id, e);
                metrics::counter!("authz_checks_total", "outcome" => "error").increment(1);
                Err(match e {
                    DomainError::StoreUnavailable(msg) => DomainError::StoreUnavailable(msg),
                    other => DomainError::StoreUnavailable(other.to_string()),
                })
            }
        }
    }

    pub async fn has_permission(&self, user_id: i64, action: Action) -> DomainResult<bool> {
        let granted = self
            .get_user_permissions(user_id)
            .await?
            .contains(action.as_str());
        record_outcome(granted);
        Ok(granted)
    }

    /// False for an empty `actions` list.
    pub async fn has_any_permission(&self, user_id: i64, actions: &[Action]) -> DomainResult<bool> {
        let permissions = self.get_user_permissions(user_id).await?;
        let granted = actions.iter().any(|a| permissions.contains(a.as_str()));
        record_outcome(granted);
        Ok(granted)
    }

    /// True for an empty `actions` list, without touching the store.
    pub async fn has_all_permissions(
        &self,
        user_id: i64,
        actions: &[Action],
    ) -> DomainResult<bool> {
        if actions.is_empty() {
            return Ok(true);
        }

        let permissions = self.get_user_permissions(user_id).await?;
        let granted = actions.iter().all(|a| permissions.contains(a.as_str()));
        record_outcome(granted);
        Ok(granted)
    }

    /// Ownership-or-override: the owner may always modify the resource,
    /// anyone else needs `override_action`.
    pub async fn can_modify_resource(
        &self,
        user_id: i64,
        resource_owner_id: i64,
        override_action: Action,
    ) -> DomainResult<bool> {
        if user_id == resource_owner_id {
            return Ok(true);
        }

        self.has_permission(user_id, override_action).await
    }

    /// Request-path form of [`has_permission`](Self::has_permission).
    pub async fn require_permission(&self, user_id: i64, action: Action) -> DomainResult<()> {
        if self.has_permission(user_id, action).await? {
            Ok(())
        } else {
            tracing::warn!("Permission denied: user {} lacks {}", user_id, action);
            Err(DomainError::permission_denied(action))
        }
    }

    /// Request-path form of [`can_modify_resource`](Self::can_modify_resource).
    pub async fn require_modify(
        &self,
        user_id: i64,
        resource_owner_id: i64,
        override_action: Action,
    ) -> DomainResult<()> {
        if self
            .can_modify_resource(user_id, resource_owner_id, override_action)
            .await?
        {
            Ok(())
        } else {
            tracing::warn!(
                "Permission denied: user {} is not the owner ({}) and lacks {}",
                user_id,
                resource_owner_id,
                override_action
            );
            Err(DomainError::permission_denied(override_action))
        }
    }
}

fn record_outcome(granted: bool) {
    let outcome = if granted { "granted" } else { "denied" };
    metrics::counter!("authz_checks_total", "outcome" => outcome).increment(1);
}
