//! In-memory fakes shared by the service tests.
//!
//! `MemoryStore` implements every repository trait over one locked state so a
//! single instance can be handed to a service for all of its generic slots.
//! It mirrors the unique keys and cascades of the SQL schema.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::{
    api::{
        error::{self, DbErrorMeta},
        pagination::{PageRequest, SortDirection},
    },
    modules::{
        application::{
            model::{ApplicationFilter, NewApplication, UpdateApplication},
            repository::ApplicationRepository,
            schema::{ApplicationEntity, ApplicationRow, ApplicationStatus},
        },
        company::{
            model::{CompanyFilter, NewCompany, UpdateCompany},
            repository::CompanyRepository,
            schema::CompanyEntity,
        },
        event::emitter::EventEmitter,
        file_upload::{
            model::NewFile, repository::FileRepository, schema::FileEntity,
            storage::ObjectStorage,
        },
        mail::mailer::Mailer,
        recruitment::{
            model::{RecruitmentFilter, RecruitmentValues},
            repository::RecruitmentRepository,
            schema::{JobType, RecruitmentEntity},
        },
        statistics::{
            repository::StatisticsRepository,
            schema::{RoleCount, StatisticsOverview, StatusCount},
        },
        user::{
            model::{AuthConfig, InsertUser, UpdateUser, UpsertToken},
            repository::{TokenRepository, UserRepository},
            schema::{TokenEntity, UserEntity, UserRole},
        },
    },
};

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        access_token_expiration: 900,
        refresh_token_expiration: 3600,
    }
}

pub fn user_entity(id: i64, role: UserRole, company_id: Option<i64>) -> UserEntity {
    let now = Utc::now();
    UserEntity {
        id,
        email: format!("user{id}@example.com"),
        hash_password: "not-a-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: format!("User{id}"),
        phone: None,
        avatar: None,
        role,
        company_id,
        created_at: now,
        updated_at: now,
    }
}

fn conflict(constraint: &str) -> error::SystemError {
    error::SystemError::Conflict(Some(DbErrorMeta {
        code: Some("23505".to_string()),
        constraint: Some(constraint.to_string()),
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Int(i64),
    Text(String),
    Time(DateTime<Utc>),
}

/// Sorts by `key` (ties broken by id descending) and cuts one page.
fn paginate<T: Clone>(
    mut items: Vec<T>,
    page: &PageRequest,
    key: impl Fn(&T, &str) -> SortKey,
    id: impl Fn(&T) -> i64,
) -> (Vec<T>, i64) {
    let column = page.sort.column;
    items.sort_by(|a, b| {
        let ord = key(a, column).cmp(&key(b, column));
        let ord = match page.sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        match ord {
            Ordering::Equal => id(b).cmp(&id(a)),
            other => other,
        }
    });

    let total = items.len() as i64;
    let items =
        items.into_iter().skip(page.offset as usize).take(page.limit as usize).collect();
    (items, total)
}

fn matches_search(value: &str, search: &Option<String>) -> bool {
    search.as_ref().is_none_or(|q| value.to_lowercase().contains(&q.to_lowercase()))
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, UserEntity>,
    tokens: BTreeMap<i64, TokenEntity>,
    companies: BTreeMap<i64, CompanyEntity>,
    recruitments: BTreeMap<i64, RecruitmentEntity>,
    applications: BTreeMap<i64, ApplicationEntity>,
    files: BTreeMap<i64, FileEntity>,
    hide_application_lookup: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_user(&mut self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        if self.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(conflict("users_email_key"));
        }

        let now = Utc::now();
        let entity = UserEntity {
            id: self.next_id(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            avatar: None,
            role: user.role,
            company_id: user.company_id,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    fn remove_user(&mut self, id: i64) -> bool {
        let removed = self.users.remove(&id).is_some();
        self.tokens.remove(&id);
        self.applications.retain(|_, a| a.user_id != id);
        self.files.retain(|_, f| f.user_id != id);
        removed
    }

    fn remove_recruitment(&mut self, id: i64) -> bool {
        let removed = self.recruitments.remove(&id).is_some();
        self.applications.retain(|_, a| a.recruitment_id != id);
        removed
    }
}

pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { state: Mutex::new(State::default()) })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn seed_user(&self, role: UserRole, company_id: Option<i64>) -> UserEntity {
        let mut state = self.lock();
        let id = state.next_id();
        let user = user_entity(id, role, company_id);
        state.users.insert(id, user.clone());
        user
    }

    pub fn seed_user_with_email(
        &self,
        email: &str,
        role: UserRole,
        company_id: Option<i64>,
    ) -> UserEntity {
        let mut state = self.lock();
        let id = state.next_id();
        let user = UserEntity { email: email.to_string(), ..user_entity(id, role, company_id) };
        state.users.insert(id, user.clone());
        user
    }

    pub fn seed_company(&self, code: &str) -> CompanyEntity {
        let mut state = self.lock();
        let now = Utc::now();
        let company = CompanyEntity {
            id: state.next_id(),
            code: code.to_string(),
            name: format!("{code} Inc"),
            description: "A company".to_string(),
            address: "1 Main St".to_string(),
            logo: None,
            created_at: now,
            updated_at: now,
        };
        state.companies.insert(company.id, company.clone());
        company
    }

    pub fn seed_recruitment(&self, company_id: i64, deadline: DateTime<Utc>) -> RecruitmentEntity {
        let mut state = self.lock();
        let now = Utc::now();
        let recruitment = RecruitmentEntity {
            id: state.next_id(),
            company_id,
            title: "Backend Engineer".to_string(),
            content: "Build and run services".to_string(),
            min_salary: 1000,
            max_salary: 2000,
            experience: 1,
            job_type: JobType::FullTime,
            deadline,
            created_at: now,
            updated_at: now,
        };
        state.recruitments.insert(recruitment.id, recruitment.clone());
        recruitment
    }

    pub fn seed_file(&self, user_id: i64) -> FileEntity {
        let mut state = self.lock();
        let id = state.next_id();
        let file = FileEntity {
            id,
            key: format!("cv/{user_id}/{id}.pdf"),
            name: "resume.pdf".to_string(),
            size: 1024,
            content_type: "application/pdf".to_string(),
            user_id,
            created_at: Utc::now(),
        };
        state.files.insert(id, file.clone());
        file
    }

    pub fn user(&self, id: i64) -> Option<UserEntity> {
        self.lock().users.get(&id).cloned()
    }

    pub fn set_company(&self, user_id: i64, company_id: Option<i64>) {
        if let Some(user) = self.lock().users.get_mut(&user_id) {
            user.company_id = company_id;
        }
    }

    pub fn token_count(&self, user_id: i64) -> usize {
        self.lock().tokens.values().filter(|t| t.user_id == user_id).count()
    }

    pub fn token_of(&self, user_id: i64) -> Option<TokenEntity> {
        self.lock().tokens.get(&user_id).cloned()
    }

    pub fn company_count(&self) -> usize {
        self.lock().companies.len()
    }

    pub fn recruitment(&self, id: i64) -> Option<RecruitmentEntity> {
        self.lock().recruitments.get(&id).cloned()
    }

    pub fn application(&self, id: i64) -> Option<ApplicationEntity> {
        self.lock().applications.get(&id).cloned()
    }

    pub fn application_count(&self) -> usize {
        self.lock().applications.len()
    }

    pub fn applications_of(&self, recruitment_id: i64) -> Vec<ApplicationEntity> {
        self.lock()
            .applications
            .values()
            .filter(|a| a.recruitment_id == recruitment_id)
            .cloned()
            .collect()
    }

    pub fn file(&self, id: i64) -> Option<FileEntity> {
        self.lock().files.get(&id).cloned()
    }

    /// Makes the existence pre-check miss so only the unique key can catch
    /// a duplicate application.
    pub fn hide_applications_from_lookup(&self) {
        self.lock().hide_application_lookup = true;
    }

    /// Removes the company row alone, leaving its staff and recruitments.
    pub fn forget_company(&self, id: i64) {
        self.lock().companies.remove(&id);
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_company_and_role(
        &self,
        company_id: i64,
        role: UserRole,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| u.company_id == Some(company_id) && u.role == role)
            .cloned()
            .collect())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        self.lock().insert_user(user)
    }

    async fn update(&self, id: i64, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.lock();
        let entity =
            state.users.get_mut(&id).ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if let Some(first_name) = &user.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &user.last_name {
            entity.last_name = last_name.clone();
        }
        if let Some(phone) = &user.phone {
            entity.phone = phone.clone();
        }
        if let Some(avatar) = &user.avatar {
            entity.avatar = avatar.clone();
        }
        entity.updated_at = Utc::now();

        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        Ok(self.lock().remove_user(id))
    }
}

#[async_trait::async_trait]
impl TokenRepository for MemoryStore {
    async fn upsert(&self, token: &UpsertToken) -> Result<TokenEntity, error::SystemError> {
        let mut state = self.lock();
        let now = Utc::now();

        let (id, created_at) = match state.tokens.get(&token.user_id) {
            Some(existing) => (existing.id, existing.created_at),
            None => (state.next_id(), now),
        };

        let entity = TokenEntity {
            id,
            user_id: token.user_id,
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: token.expires_at,
            created_at,
            updated_at: now,
        };
        state.tokens.insert(token.user_id, entity.clone());
        Ok(entity)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<TokenEntity>, error::SystemError> {
        Ok(self.token_of(user_id))
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<bool, error::SystemError> {
        Ok(self.lock().tokens.remove(&user_id).is_some())
    }
}

#[async_trait::async_trait]
impl CompanyRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<CompanyEntity>, error::SystemError> {
        Ok(self.lock().companies.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CompanyEntity>, error::SystemError> {
        Ok(self.lock().companies.values().find(|c| c.code == code).cloned())
    }

    async fn find_page(
        &self,
        filter: &CompanyFilter,
        page: &PageRequest,
    ) -> Result<(Vec<CompanyEntity>, i64), error::SystemError> {
        let items: Vec<_> = self
            .lock()
            .companies
            .values()
            .filter(|c| matches_search(&c.name, &filter.search))
            .cloned()
            .collect();

        Ok(paginate(
            items,
            page,
            |c, column| match column {
                "name" => SortKey::Text(c.name.clone()),
                "code" => SortKey::Text(c.code.clone()),
                "created_at" => SortKey::Time(c.created_at),
                _ => SortKey::Int(c.id),
            },
            |c| c.id,
        ))
    }

    async fn create_with_admin(
        &self,
        company: &NewCompany,
        admin: &InsertUser,
    ) -> Result<(CompanyEntity, UserEntity), error::SystemError> {
        let mut state = self.lock();

        if state.companies.values().any(|c| c.code == company.code) {
            return Err(conflict("companies_code_key"));
        }
        if state.users.values().any(|u| u.email.eq_ignore_ascii_case(&admin.email)) {
            return Err(conflict("users_email_key"));
        }

        let now = Utc::now();
        let entity = CompanyEntity {
            id: state.next_id(),
            code: company.code.clone(),
            name: company.name.clone(),
            description: company.description.clone(),
            address: company.address.clone(),
            logo: company.logo.clone(),
            created_at: now,
            updated_at: now,
        };
        state.companies.insert(entity.id, entity.clone());

        let admin = state.insert_user(&InsertUser { company_id: Some(entity.id), ..admin.clone() })?;
        Ok((entity, admin))
    }

    async fn update(
        &self,
        id: i64,
        company: &UpdateCompany,
    ) -> Result<CompanyEntity, error::SystemError> {
        let mut state = self.lock();
        let entity = state.companies.get_mut(&id).ok_or_else(|| {
            error::SystemError::not_found(format!("Company with id {id} not found"))
        })?;

        if let Some(name) = &company.name {
            entity.name = name.clone();
        }
        if let Some(description) = &company.description {
            entity.description = description.clone();
        }
        if let Some(address) = &company.address {
            entity.address = address.clone();
        }
        if let Some(logo) = &company.logo {
            entity.logo = logo.clone();
        }
        entity.updated_at = Utc::now();

        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let mut state = self.lock();
        if state.companies.remove(&id).is_none() {
            return Ok(false);
        }

        let staff: Vec<i64> =
            state.users.values().filter(|u| u.company_id == Some(id)).map(|u| u.id).collect();
        for user_id in staff {
            state.remove_user(user_id);
        }

        let recruitments: Vec<i64> =
            state.recruitments.values().filter(|r| r.company_id == id).map(|r| r.id).collect();
        for recruitment_id in recruitments {
            state.remove_recruitment(recruitment_id);
        }

        Ok(true)
    }
}

#[async_trait::async_trait]
impl RecruitmentRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<RecruitmentEntity>, error::SystemError> {
        Ok(self.recruitment(id))
    }

    async fn find_page(
        &self,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<RecruitmentEntity>, i64), error::SystemError> {
        let now = Utc::now();
        let items: Vec<_> = self
            .lock()
            .recruitments
            .values()
            .filter(|r| filter.company_id.is_none_or(|id| r.company_id == id))
            .filter(|r| filter.job_type.is_none_or(|t| r.job_type == t))
            .filter(|r| matches_search(&r.title, &filter.search))
            .filter(|r| !filter.open_only || !r.is_expired_at(now))
            .cloned()
            .collect();

        Ok(paginate(
            items,
            page,
            |r, column| match column {
                "title" => SortKey::Text(r.title.clone()),
                "deadline" => SortKey::Time(r.deadline),
                "min_salary" => SortKey::Int(r.min_salary),
                "max_salary" => SortKey::Int(r.max_salary),
                "created_at" => SortKey::Time(r.created_at),
                _ => SortKey::Int(r.id),
            },
            |r| r.id,
        ))
    }

    async fn create(
        &self,
        company_id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let mut state = self.lock();
        if !state.companies.contains_key(&company_id) {
            return Err(error::SystemError::bad_request(
                "Referenced record does not exist or is still in use",
            ));
        }

        let now = Utc::now();
        let entity = RecruitmentEntity {
            id: state.next_id(),
            company_id,
            title: values.title.clone(),
            content: values.content.clone(),
            min_salary: values.min_salary,
            max_salary: values.max_salary,
            experience: values.experience,
            job_type: values.job_type,
            deadline: values.deadline,
            created_at: now,
            updated_at: now,
        };
        state.recruitments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(
        &self,
        id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let mut state = self.lock();
        let entity = state.recruitments.get_mut(&id).ok_or_else(|| {
            error::SystemError::not_found(format!("Recruitment with id {id} not found"))
        })?;

        entity.title = values.title.clone();
        entity.content = values.content.clone();
        entity.min_salary = values.min_salary;
        entity.max_salary = values.max_salary;
        entity.experience = values.experience;
        entity.job_type = values.job_type;
        entity.deadline = values.deadline;
        entity.updated_at = Utc::now();

        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        Ok(self.lock().remove_recruitment(id))
    }
}

#[async_trait::async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationEntity>, error::SystemError> {
        Ok(self.application(id))
    }

    async fn find_by_recruitment_and_user(
        &self,
        recruitment_id: i64,
        user_id: i64,
    ) -> Result<Option<ApplicationEntity>, error::SystemError> {
        let state = self.lock();
        if state.hide_application_lookup {
            return Ok(None);
        }

        Ok(state
            .applications
            .values()
            .find(|a| a.recruitment_id == recruitment_id && a.user_id == user_id)
            .cloned())
    }

    async fn find_by_recruitment(
        &self,
        recruitment_id: i64,
    ) -> Result<Vec<ApplicationRow>, error::SystemError> {
        let state = self.lock();
        let rows = state
            .applications
            .values()
            .rev()
            .filter(|a| a.recruitment_id == recruitment_id)
            .filter_map(|a| {
                let user = state.users.get(&a.user_id)?;
                let file = state.files.get(&a.cv_id)?;
                Some(ApplicationRow {
                    application: a.clone(),
                    applicant_email: user.email.clone(),
                    applicant_first_name: user.first_name.clone(),
                    applicant_last_name: user.last_name.clone(),
                    applicant_phone: user.phone.clone(),
                    applicant_avatar: user.avatar.clone(),
                    cv_name: file.name.clone(),
                    cv_size: file.size,
                    cv_content_type: file.content_type.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn find_page(
        &self,
        filter: &ApplicationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<ApplicationEntity>, i64), error::SystemError> {
        let items: Vec<_> = self
            .lock()
            .applications
            .values()
            .filter(|a| filter.user_id.is_none_or(|id| a.user_id == id))
            .filter(|a| filter.recruitment_id.is_none_or(|id| a.recruitment_id == id))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();

        Ok(paginate(
            items,
            page,
            |a, column| match column {
                "status" => SortKey::Text(format!("{:?}", a.status).to_uppercase()),
                "created_at" => SortKey::Time(a.created_at),
                "updated_at" => SortKey::Time(a.updated_at),
                _ => SortKey::Int(a.id),
            },
            |a| a.id,
        ))
    }

    async fn create(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let mut state = self.lock();

        if state.applications.values().any(|a| {
            a.recruitment_id == application.recruitment_id && a.user_id == application.user_id
        }) {
            return Err(conflict("applications_recruitment_user_key"));
        }

        let now = Utc::now();
        let entity = ApplicationEntity {
            id: state.next_id(),
            recruitment_id: application.recruitment_id,
            user_id: application.user_id,
            cv_id: application.cv_id,
            message: application.message.clone(),
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.applications.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let update = UpdateApplication { status: Some(status), ..Default::default() };
        ApplicationRepository::update(self, id, &update).await
    }

    async fn update(
        &self,
        id: i64,
        application: &UpdateApplication,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let mut state = self.lock();
        let entity = state.applications.get_mut(&id).ok_or_else(|| {
            error::SystemError::not_found(format!("Application with id {id} not found"))
        })?;

        if let Some(message) = &application.message {
            entity.message = message.clone();
        }
        if let Some(status) = application.status {
            entity.status = status;
        }
        if let Some(cv_id) = application.cv_id {
            entity.cv_id = cv_id;
        }
        entity.updated_at = Utc::now();

        Ok(entity.clone())
    }
}

#[async_trait::async_trait]
impl FileRepository for MemoryStore {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError> {
        let mut state = self.lock();
        let entity = FileEntity {
            id: state.next_id(),
            key: file.key.clone(),
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            user_id: file.user_id,
            created_at: Utc::now(),
        };
        state.files.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileEntity>, error::SystemError> {
        Ok(self.file(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let mut state = self.lock();
        if state.applications.values().any(|a| a.cv_id == id) {
            return Err(error::SystemError::bad_request(
                "Referenced record does not exist or is still in use",
            ));
        }
        Ok(state.files.remove(&id).is_some())
    }
}

#[async_trait::async_trait]
impl StatisticsRepository for MemoryStore {
    async fn overview(&self) -> Result<StatisticsOverview, error::SystemError> {
        let state = self.lock();
        let now = Utc::now();

        let mut roles: Vec<RoleCount> = Vec::new();
        for user in state.users.values() {
            match roles.iter_mut().find(|c| c.role == user.role) {
                Some(c) => c.count += 1,
                None => roles.push(RoleCount { role: user.role, count: 1 }),
            }
        }

        let mut statuses: Vec<StatusCount> = Vec::new();
        for application in state.applications.values() {
            match statuses.iter_mut().find(|c| c.status == application.status) {
                Some(c) => c.count += 1,
                None => statuses.push(StatusCount { status: application.status, count: 1 }),
            }
        }

        Ok(StatisticsOverview {
            users_by_role: roles,
            total_companies: state.companies.len() as i64,
            total_recruitments: state.recruitments.len() as i64,
            open_recruitments: state.recruitments.values().filter(|r| !r.is_expired_at(now)).count()
                as i64,
            applications_by_status: statuses,
        })
    }
}

/// Object store kept in a map; presigned URLs are deterministic.
#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for FakeStorage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<(), error::SystemError> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), bytes);
        Ok(())
    }

    async fn presign_get_object(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, error::SystemError> {
        Ok(format!("https://storage.test/{key}?expires_in={}", expires_in.as_secs()))
    }

    async fn delete_object(&self, key: &str) -> Result<(), error::SystemError> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingEmitter {
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl EventEmitter for RecordingEmitter {
    fn publish(&self, destination: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((destination.to_string(), payload));
    }
}

/// Records `(to, subject, html)` of every mail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    delivered: Notify,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Waits until at least `count` mails were sent by background tasks.
    pub async fn wait_for(&self, count: usize) -> Vec<(String, String, String)> {
        loop {
            let delivered = self.delivered.notified();
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            delivered.await;
        }
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), error::SystemError> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((to.to_string(), subject.to_string(), html));
        self.delivered.notify_waiters();
        Ok(())
    }
}
