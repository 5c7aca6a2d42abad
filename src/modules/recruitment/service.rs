use log::info;
use std::sync::Arc;

use crate::{
    api::{
        error,
        pagination::{Page, PageRequest, Sort},
    },
    modules::{
        company::repository::CompanyRepository,
        event::{emitter::EventBus, model::SuggestionEvent},
        recruitment::{
            model::{
                CreateRecruitmentModel, RecruitmentFilter, RecruitmentQuery, RecruitmentValues,
                UpdateRecruitmentModel, DEFAULT_RECRUITMENT_SORT, RECRUITMENT_SORT_FIELDS,
            },
            repository::RecruitmentRepository,
            schema::RecruitmentEntity,
        },
        user::{
            policy::{reconfirm_actor, require_company, require_role, FORBIDDEN},
            repository::UserRepository,
            schema::UserRole,
        },
    },
};

pub const NOT_YOUR_RECRUITMENT: &str = "Recruitment not belonging to your company";

#[derive(Clone)]
pub struct RecruitmentService<R, C, U>
where
    R: RecruitmentRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    recruitment_repo: Arc<R>,
    company_repo: Arc<C>,
    user_repo: Arc<U>,
    events: EventBus,
}

impl<R, C, U> RecruitmentService<R, C, U>
where
    R: RecruitmentRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(
        recruitment_repo: Arc<R>,
        company_repo: Arc<C>,
        user_repo: Arc<U>,
        events: EventBus,
    ) -> Self {
        RecruitmentService { recruitment_repo, company_repo, user_repo, events }
    }

    pub async fn create_recruitment(
        &self,
        actor_id: i64,
        data: CreateRecruitmentModel,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let company_id = self.company_admin(actor_id).await?;

        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Company not found"))?;

        let values = RecruitmentValues::from(data);
        values.check()?;

        let recruitment = self.recruitment_repo.create(company.id, &values).await?;

        info!("Recruitment {} created for company {}", recruitment.id, company.id);
        self.events.suggestion(SuggestionEvent::CreateRecruitment { data: recruitment.clone() });

        Ok(recruitment)
    }

    pub async fn update_recruitment(
        &self,
        id: i64,
        actor_id: i64,
        data: UpdateRecruitmentModel,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let company_id = self.company_admin(actor_id).await?;
        let current = self.owned_recruitment(id, company_id).await?;

        if data.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let values = RecruitmentValues::merge(&current, data);
        values.check()?;

        let recruitment = self.recruitment_repo.update(id, &values).await?;

        info!("Recruitment {id} updated");
        self.events.suggestion(SuggestionEvent::UpdateRecruitment { data: recruitment.clone() });

        Ok(recruitment)
    }

    pub async fn delete_recruitment(&self, id: i64, actor_id: i64) -> Result<(), error::SystemError> {
        let company_id = self.company_admin(actor_id).await?;
        self.owned_recruitment(id, company_id).await?;

        if !self.recruitment_repo.delete(id).await? {
            return Err(error::SystemError::not_found(format!(
                "Recruitment with id {id} not found"
            )));
        }

        info!("Recruitment {id} deleted");
        self.events.suggestion(SuggestionEvent::DeleteRecruitment { id });

        Ok(())
    }

    pub async fn find_one(&self, id: i64) -> Result<RecruitmentEntity, error::SystemError> {
        self.recruitment_repo.find_by_id(id).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("Recruitment with id {id} not found"))
        })
    }

    pub async fn find_all(
        &self,
        query: RecruitmentQuery,
    ) -> Result<Page<RecruitmentEntity>, error::SystemError> {
        let sort =
            Sort::parse(query.sort.as_deref(), RECRUITMENT_SORT_FIELDS, DEFAULT_RECRUITMENT_SORT)?;
        let page = PageRequest::new(query.offset, query.limit, sort);
        let filter = RecruitmentFilter {
            company_id: query.company_id,
            job_type: query.job_type,
            search: query.search.filter(|s| !s.trim().is_empty()),
            open_only: query.open_only.unwrap_or(false),
        };

        let (items, total) = self.recruitment_repo.find_page(&filter, &page).await?;
        Ok(Page::new(items, total, &page))
    }

    async fn company_admin(&self, actor_id: i64) -> Result<i64, error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, FORBIDDEN)?;
        require_role(&actor, &[UserRole::CompanyAdmin], FORBIDDEN)?;
        Ok(company_id)
    }

    async fn owned_recruitment(
        &self,
        id: i64,
        company_id: i64,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let recruitment = self.find_one(id).await?;
        if recruitment.company_id != company_id {
            return Err(error::SystemError::forbidden(NOT_YOUR_RECRUITMENT));
        }
        Ok(recruitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{event::model::EventConfig, recruitment::schema::JobType};
    use crate::test::{MemoryStore, RecordingEmitter};
    use chrono::{Duration, Utc};

    type Svc = RecruitmentService<MemoryStore, MemoryStore, MemoryStore>;

    fn service(store: &Arc<MemoryStore>) -> (Svc, Arc<RecordingEmitter>) {
        let recorder = Arc::new(RecordingEmitter::default());
        let bus = EventBus::new(recorder.clone(), EventConfig::default());
        let svc =
            RecruitmentService::with_dependencies(store.clone(), store.clone(), store.clone(), bus);
        (svc, recorder)
    }

    fn create_model() -> CreateRecruitmentModel {
        CreateRecruitmentModel {
            title: "Backend Engineer".into(),
            content: "Build services".into(),
            min_salary: 1500,
            max_salary: 3000,
            experience: 2,
            job_type: JobType::FullTime,
            deadline: Utc::now() + Duration::days(30),
        }
    }

    #[actix_web::test]
    async fn company_admin_creates_and_event_is_emitted() {
        let store = MemoryStore::new();
        let company = store.seed_company("ACME");
        let admin = store.seed_user(UserRole::CompanyAdmin, Some(company.id));
        let (svc, recorder) = service(&store);

        let recruitment = svc.create_recruitment(admin.id, create_model()).await.unwrap();

        assert_eq!(recruitment.company_id, company.id);
        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "suggestion_queue");
        assert_eq!(events[0].1["type"], "CREATE_RECRUITMENT");
        assert_eq!(events[0].1["data"]["id"], recruitment.id);
    }

    #[actix_web::test]
    async fn create_requires_company_admin() {
        let store = MemoryStore::new();
        let company = store.seed_company("ACME");
        let hr = store.seed_user(UserRole::CompanyHr, Some(company.id));
        let applicant = store.seed_user(UserRole::User, None);
        let (svc, recorder) = service(&store);

        for actor in [hr.id, applicant.id] {
            let err = svc.create_recruitment(actor, create_model()).await.unwrap_err();
            assert!(matches!(err, error::SystemError::Forbidden(_)));
        }

        let err = svc.create_recruitment(999, create_model()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Unauthorized(_)));
        assert!(recorder.events().is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_inverted_salary_range() {
        let store = MemoryStore::new();
        let company = store.seed_company("ACME");
        let admin = store.seed_user(UserRole::CompanyAdmin, Some(company.id));
        let (svc, _) = service(&store);

        let model = CreateRecruitmentModel { min_salary: 5000, max_salary: 100, ..create_model() };
        let err = svc.create_recruitment(admin.id, model).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn update_checks_owner_company_and_merged_values() {
        let store = MemoryStore::new();
        let acme = store.seed_company("ACME");
        let globex = store.seed_company("GLOBEX");
        let admin = store.seed_user(UserRole::CompanyAdmin, Some(acme.id));
        let rival = store.seed_user(UserRole::CompanyAdmin, Some(globex.id));
        let recruitment = store.seed_recruitment(acme.id, Utc::now() + Duration::days(3));
        let (svc, recorder) = service(&store);

        let patch = UpdateRecruitmentModel { title: Some("Staff Engineer".into()), ..Default::default() };
        let err = svc.update_recruitment(recruitment.id, rival.id, patch.clone()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(m) if m == NOT_YOUR_RECRUITMENT));

        let bad = UpdateRecruitmentModel {
            min_salary: Some(recruitment.max_salary + 1),
            ..Default::default()
        };
        let err = svc.update_recruitment(recruitment.id, admin.id, bad).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let updated = svc.update_recruitment(recruitment.id, admin.id, patch).await.unwrap();
        assert_eq!(updated.title, "Staff Engineer");
        assert_eq!(updated.content, recruitment.content);

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1["type"], "UPDATE_RECRUITMENT");
    }

    #[actix_web::test]
    async fn delete_emits_id_only() {
        let store = MemoryStore::new();
        let acme = store.seed_company("ACME");
        let admin = store.seed_user(UserRole::CompanyAdmin, Some(acme.id));
        let recruitment = store.seed_recruitment(acme.id, Utc::now() + Duration::days(3));
        let (svc, recorder) = service(&store);

        svc.delete_recruitment(recruitment.id, admin.id).await.unwrap();

        assert!(store.recruitment(recruitment.id).is_none());
        let events = recorder.events();
        assert_eq!(events[0].1["type"], "DELETE_RECRUITMENT");
        assert_eq!(events[0].1["id"], recruitment.id);
        assert!(events[0].1.get("data").is_none());

        let err = svc.delete_recruitment(recruitment.id, admin.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn find_all_filters_open_recruitments() {
        let store = MemoryStore::new();
        let acme = store.seed_company("ACME");
        store.seed_recruitment(acme.id, Utc::now() + Duration::days(3));
        store.seed_recruitment(acme.id, Utc::now() - Duration::days(3));
        let (svc, _) = service(&store);

        let all = svc.find_all(RecruitmentQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);

        let open = svc
            .find_all(RecruitmentQuery { open_only: Some(true), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(open.total, 1);
        assert!(open.items[0].deadline > Utc::now());
    }
}
