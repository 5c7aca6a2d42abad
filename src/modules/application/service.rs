//! Application lifecycle and the authorization rules around it.
//!
//! Every privileged operation re-reads the actor from the store, then checks
//! company membership and role before touching the application. A vanished
//! actor is 401, a foreign company is 403, a missing application is 404.

use log::{info, warn};
use std::sync::Arc;

use crate::{
    api::{
        error,
        pagination::{Page, PageRequest, Sort},
    },
    modules::{
        application::{
            model::{
                ApplicationDetail, ApplicationFilter, ApplicationListItem, ApplicationQuery,
                CreateApplicationModel, NewApplication, UpdateApplication,
                UpdateApplicationModel, APPLICATION_SORT_FIELDS, DEFAULT_APPLICATION_SORT,
            },
            repository::ApplicationRepository,
            schema::{ApplicationEntity, ApplicationStatus},
        },
        company::repository::CompanyRepository,
        event::{
            emitter::EventBus,
            model::{ApplicationNotice, NotificationEvent},
        },
        file_upload::{repository::FileRepository, service::FileUploadService},
        mail::{mailer::Mailer, template},
        recruitment::{
            repository::RecruitmentRepository, schema::RecruitmentEntity,
            service::NOT_YOUR_RECRUITMENT,
        },
        user::{
            model::UserResponse,
            policy::{reconfirm_actor, require_company, require_role, FORBIDDEN},
            repository::UserRepository,
            schema::{UserEntity, UserRole},
        },
    },
};

pub const APPLICATIONS_RECRUITMENT_USER_KEY: &str = "applications_recruitment_user_key";
pub const NOT_YOUR_APPLICATION: &str = "Application not belonging to user's company";

#[derive(Clone)]
pub struct ApplicationService<A, R, C, U, F>
where
    A: ApplicationRepository + Send + Sync,
    R: RecruitmentRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
    F: FileRepository + Send + Sync,
{
    application_repo: Arc<A>,
    recruitment_repo: Arc<R>,
    company_repo: Arc<C>,
    user_repo: Arc<U>,
    files: Arc<FileUploadService<F>>,
    events: EventBus,
    mailer: Arc<dyn Mailer>,
}

impl<A, R, C, U, F> ApplicationService<A, R, C, U, F>
where
    A: ApplicationRepository + Send + Sync,
    R: RecruitmentRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
    F: FileRepository + Send + Sync,
{
    pub fn with_dependencies(
        application_repo: Arc<A>,
        recruitment_repo: Arc<R>,
        company_repo: Arc<C>,
        user_repo: Arc<U>,
        files: Arc<FileUploadService<F>>,
        events: EventBus,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        ApplicationService {
            application_repo,
            recruitment_repo,
            company_repo,
            user_repo,
            files,
            events,
            mailer,
        }
    }

    pub async fn create(
        &self,
        applicant_id: i64,
        data: CreateApplicationModel,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let applicant = self
            .user_repo
            .find_by_id(applicant_id)
            .await?
            .ok_or_else(|| error::SystemError::bad_request("User not found"))?;

        if applicant.role != UserRole::User {
            return Err(error::SystemError::forbidden("You are not allowed to apply"));
        }

        let recruitment =
            self.recruitment_repo.find_by_id(data.recruitment_id).await?.ok_or_else(|| {
                error::SystemError::bad_request(format!(
                    "Recruitment with id {} not found",
                    data.recruitment_id
                ))
            })?;

        if recruitment.is_expired_at(chrono::Utc::now()) {
            return Err(error::SystemError::bad_request("Recruitment deadline has passed"));
        }

        // someone else's file is reported exactly like a missing one
        let cv = self.files.find_file(data.cv_id).await?.filter(|f| f.user_id == applicant.id);
        let Some(cv) = cv else {
            return Err(error::SystemError::bad_request(format!(
                "CV with id {} not found",
                data.cv_id
            )));
        };

        let already_applied = || {
            error::SystemError::bad_request(format!(
                "{} has already applied to this recruitment",
                applicant.full_name()
            ))
        };

        if self
            .application_repo
            .find_by_recruitment_and_user(recruitment.id, applicant.id)
            .await?
            .is_some()
        {
            return Err(already_applied());
        }

        let new_application = NewApplication {
            recruitment_id: recruitment.id,
            user_id: applicant.id,
            cv_id: cv.id,
            message: data.message,
        };

        let application =
            self.application_repo.create(&new_application).await.map_err(|e| {
                if e.is_conflict_on(APPLICATIONS_RECRUITMENT_USER_KEY) {
                    already_applied()
                } else {
                    e
                }
            })?;

        info!(
            "User {} applied to recruitment {} (application {})",
            applicant.id, recruitment.id, application.id
        );
        Ok(application)
    }

    /// The caller's own application for a recruitment.
    pub async fn find_by_recruitment_and_user(
        &self,
        recruitment_id: i64,
        user_id: i64,
    ) -> Result<ApplicationDetail, error::SystemError> {
        let user = reconfirm_actor(self.user_repo.as_ref(), user_id).await?;

        let application = self
            .application_repo
            .find_by_recruitment_and_user(recruitment_id, user.id)
            .await?
            .ok_or_else(|| {
                error::SystemError::not_found(format!(
                    "{} has not applied to this recruitment",
                    user.full_name()
                ))
            })?;

        if application.user_id != user.id {
            return Err(error::SystemError::forbidden(FORBIDDEN));
        }

        self.with_cv_url(application).await
    }

    /// Company-staff view of every application to one recruitment.
    pub async fn find_by_recruitment(
        &self,
        recruitment_id: i64,
        actor_id: i64,
    ) -> Result<Vec<ApplicationListItem>, error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, FORBIDDEN)?;

        let recruitment =
            self.recruitment_repo.find_by_id(recruitment_id).await?.ok_or_else(|| {
                error::SystemError::not_found(format!(
                    "Recruitment with id {recruitment_id} not found"
                ))
            })?;

        if recruitment.company_id != company_id {
            return Err(error::SystemError::forbidden(NOT_YOUR_RECRUITMENT));
        }

        let rows = self.application_repo.find_by_recruitment(recruitment.id).await?;
        Ok(rows.into_iter().map(ApplicationListItem::from).collect())
    }

    pub async fn get_application_detail(
        &self,
        id: i64,
        actor_id: i64,
    ) -> Result<ApplicationDetail, error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, FORBIDDEN)?;

        let (application, _) = self.application_in_company(id, company_id).await?;
        self.with_cv_url(application).await
    }

    /// Approves or rejects. Repeating the same decision rewrites the same status.
    pub async fn update_application_status(
        &self,
        id: i64,
        actor_id: i64,
        is_approved: bool,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, NOT_YOUR_APPLICATION)?;
        require_role(&actor, &[UserRole::CompanyAdmin, UserRole::CompanyHr], FORBIDDEN)?;

        let (application, recruitment) = self.application_in_company(id, company_id).await?;

        let applicant =
            self.user_repo.find_by_id(application.user_id).await?.ok_or_else(|| {
                error::SystemError::not_found(format!(
                    "User with id {} not found",
                    application.user_id
                ))
            })?;

        let company_name = match self.company_repo.find_by_id(recruitment.company_id).await? {
            Some(company) => company.name,
            None => {
                warn!(
                    "Company {} of recruitment {} not found, review mail omits it",
                    recruitment.company_id, recruitment.id
                );
                String::new()
            }
        };

        let status = ApplicationStatus::reviewed(is_approved);
        let application = self.application_repo.update_status(application.id, status).await?;
        info!("Application {} marked {:?} by user {}", application.id, status, actor.id);

        self.announce_review(&application, recruitment, applicant, &company_name);

        Ok(application)
    }

    /// Content edit without actor checks. Only mounted behind the ADMIN gate.
    pub async fn update_application(
        &self,
        id: i64,
        data: UpdateApplicationModel,
    ) -> Result<ApplicationEntity, error::SystemError> {
        if self.application_repo.find_by_id(id).await?.is_none() {
            return Err(error::SystemError::not_found(format!(
                "Application with id {id} not found"
            )));
        }

        let update =
            UpdateApplication { message: data.message, status: data.status, cv_id: data.cv_id };
        let application = self.application_repo.update(id, &update).await?;

        info!("Application {id} edited");
        Ok(application)
    }

    pub async fn find_all(
        &self,
        query: ApplicationQuery,
    ) -> Result<Page<ApplicationEntity>, error::SystemError> {
        let sort =
            Sort::parse(query.sort.as_deref(), APPLICATION_SORT_FIELDS, DEFAULT_APPLICATION_SORT)?;
        let page = PageRequest::new(query.offset, query.limit, sort);
        let filter = ApplicationFilter {
            user_id: query.user_id,
            recruitment_id: query.recruitment_id,
            status: query.status,
        };

        let (items, total) = self.application_repo.find_page(&filter, &page).await?;
        Ok(Page::new(items, total, &page))
    }

    async fn application_in_company(
        &self,
        id: i64,
        company_id: i64,
    ) -> Result<(ApplicationEntity, RecruitmentEntity), error::SystemError> {
        let application = self.application_repo.find_by_id(id).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("Application with id {id} not found"))
        })?;

        let recruitment = self
            .recruitment_repo
            .find_by_id(application.recruitment_id)
            .await?
            .filter(|r| r.company_id == company_id)
            .ok_or_else(|| error::SystemError::forbidden(NOT_YOUR_APPLICATION))?;

        Ok((application, recruitment))
    }

    async fn with_cv_url(
        &self,
        application: ApplicationEntity,
    ) -> Result<ApplicationDetail, error::SystemError> {
        let cv_url = self.files.resolve_retrieval_url(application.cv_id).await?;
        Ok(ApplicationDetail { application, cv_url })
    }

    /// Publishes the review to the notification queue and mails the applicant.
    /// Neither is awaited for delivery.
    fn announce_review(
        &self,
        application: &ApplicationEntity,
        recruitment: RecruitmentEntity,
        applicant: UserEntity,
        company_name: &str,
    ) {
        let name = applicant.full_name();
        let email = match application.status {
            ApplicationStatus::Approved => {
                template::application_approved(&name, &recruitment.title, company_name)
            }
            _ => template::application_rejected(&name, &recruitment.title, company_name),
        };
        let to = applicant.email.clone();

        let notice = ApplicationNotice {
            application: application.clone(),
            recruitment,
            applicant: UserResponse::from(applicant),
        };
        let event = match application.status {
            ApplicationStatus::Approved => NotificationEvent::Approved { data: notice },
            _ => NotificationEvent::Rejected { data: notice },
        };
        self.events.notification(event);

        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, &email.subject, email.html).await {
                log::error!("Failed to send '{}' to {}: {:?}", email.subject, to, e);
            }
        });
    }
}
