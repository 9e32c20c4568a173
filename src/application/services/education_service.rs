use crate::application::services::PermissionService;
use crate::domain::entities::{CreateEducationRequest, Education, UpdateEducationRequest};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::Action;
use crate::domain::ports::education_repository::EducationRepository;
use crate::shared::utils::validate_text;
use std::sync::Arc;

const TITLE_MAX: usize = 255;

#[derive(Clone)]
pub struct EducationService {
    records: Arc<dyn EducationRepository>,
    permissions: PermissionService,
}

impl EducationService {
    pub fn new(records: Arc<dyn EducationRepository>, permissions: PermissionService) -> Self {
        Self {
            records,
            permissions,
        }
    }

    /// Members see their own history; `view_all_education` lifts the filter.
    pub async fn list_education(
        &self,
        actor_id: i64,
        user_id: Option<i64>,
    ) -> DomainResult<Vec<Education>> {
        let filter = match user_id {
            Some(owner) => {
                self.permissions
                    .require_modify(actor_id, owner, Action::ViewAllEducation)
                    .await?;
                Some(owner)
            }
            None => {
                let view_all = self
                    .permissions
                    .has_permission(actor_id, Action::ViewAllEducation)
                    .await?;
                (!view_all).then_some(actor_id)
            }
        };

        self.records.list_education(filter).await
    }

    pub async fn get_education(&self, actor_id: i64, id: i64) -> DomainResult<Education> {
        let record = self.find_record(id).await?;
        self.permissions
            .require_modify(actor_id, record.user_id, Action::ViewAllEducation)
            .await?;
        Ok(record)
    }

    pub async fn create_education(
        &self,
        actor_id: i64,
        request: CreateEducationRequest,
    ) -> DomainResult<Education> {
        self.permissions
            .require_permission(actor_id, Action::CreateOwnEducation)
            .await?;

        let title = validate_text("Title", &request.title, 1, TITLE_MAX)?;
        let id = self
            .records
            .create_education(actor_id, &title, request.description.as_deref())
            .await?;
        self.find_record(id).await
    }

    pub async fn update_education(
        &self,
        actor_id: i64,
        id: i64,
        request: UpdateEducationRequest,
    ) -> DomainResult<Education> {
        let record = self.find_record(id).await?;
        self.permissions
            .require_modify(actor_id, record.user_id, Action::UpdateAnyEducation)
            .await?;

        let title = request
            .title
            .as_deref()
            .map(|t| validate_text("Title", t, 1, TITLE_MAX))
            .transpose()?;

        self.records
            .update_education(id, title.as_deref(), request.description.as_deref())
            .await?;
        self.find_record(id).await
    }

    pub async fn delete_education(&self, actor_id: i64, id: i64) -> DomainResult<()> {
        let record = self.find_record(id).await?;
        self.permissions
            .require_modify(actor_id, record.user_id, Action::DeleteAnyEducation)
            .await?;

        self.records.delete_education(id).await
    }

    async fn find_record(&self, id: i64) -> DomainResult<Education> {
        self.records
            .get_education(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Education record not found".to_string()))
    }
}
