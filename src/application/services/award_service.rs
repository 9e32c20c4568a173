use crate::application::services::PermissionService;
use crate::domain::entities::{Award, CreateAwardRequest, UpdateAwardRequest};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::Action;
use crate::domain::ports::award_repository::AwardRepository;
use crate::shared::utils::validate_text;
use std::sync::Arc;

#[derive(Clone)]
pub struct AwardService {
    awards: Arc<dyn AwardRepository>,
    permissions: PermissionService,
}

impl AwardService {
    pub fn new(awards: Arc<dyn AwardRepository>, permissions: PermissionService) -> Self {
        Self {
            awards,
            permissions,
        }
    }

    /// Without `view_all_awards` only the caller's own awards are visible,
    /// and asking for someone else's is denied.
    pub async fn list_awards(
        &self,
        actor_id: i64,
        user_id: Option<i64>,
    ) -> DomainResult<Vec<Award>> {
        let filter = match user_id {
            Some(owner) => {
                self.permissions
                    .require_modify(actor_id, owner, Action::ViewAllAwards)
                    .await?;
                Some(owner)
            }
            None => {
                if self
                    .permissions
                    .has_permission(actor_id, Action::ViewAllAwards)
                    .await?
                {
                    None
                } else {
                    Some(actor_id)
                }
            }
        };

        self.awards.list_awards(filter).await
    }

    pub async fn get_award(&self, actor_id: i64, id: i64) -> DomainResult<Award> {
        let award = self.find_award(id).await?;
        self.permissions
            .require_modify(actor_id, award.user_id, Action::ViewAllAwards)
            .await?;
        Ok(award)
    }

    pub async fn create_award(
        &self,
        actor_id: i64,
        request: CreateAwardRequest,
    ) -> DomainResult<Award> {
        self.permissions
            .require_permission(actor_id, Action::CreateOwnAward)
            .await?;

        let title = validate_text("Title", &request.title, 1, 200)?;
        let id = self
            .awards
            .create_award(actor_id, &title, request.description.as_deref())
            .await?;
        self.find_award(id).await
    }

    pub async fn update_award(
        &self,
        actor_id: i64,
        id: i64,
        request: UpdateAwardRequest,
    ) -> DomainResult<Award> {
        let award = self.find_award(id).await?;
        self.permissions
            .require_modify(actor_id, award.user_id, Action::UpdateAnyAward)
            .await?;

        let title = request
            .title
            .as_deref()
            .map(|t| validate_text("Title", t, 1, 200))
            .transpose()?;

        self.awards
            .update_award(id, title.as_deref(), request.description.as_deref())
            .await?;
        self.find_award(id).await
    }

    pub async fn delete_award(&self, actor_id: i64, id: i64) -> DomainResult<()> {
        let award = self.find_award(id).await?;
        self.permissions
            .require_modify(actor_id, award.user_id, Action::DeleteAnyAward)
            .await?;

        self.awards.delete_award(id).await
    }

    async fn find_award(&self, id: i64) -> DomainResult<Award> {
        self.awards
            .get_award(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Award not found".to_string()))
    }
}
