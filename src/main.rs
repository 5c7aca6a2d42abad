use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::{
    configs::{build_s3_client, connect_database, connect_redis, run_migrations},
    middlewares::{authentication, authorization},
    modules::{
        application::{repository_pg::ApplicationRepositoryPg, service::ApplicationService},
        company::{repository_pg::CompanyRepositoryPg, service::CompanyService},
        event::{
            emitter::{DestinationRegistry, EventBus, RedisEventEmitter},
            model::EventConfig,
        },
        file_upload::{
            model::UploadConfig,
            repository_pg::FileRepositoryPg,
            service::FileUploadService,
            storage::{ObjectStorage, S3Storage},
        },
        mail::mailer::{MailConfig, build_mailer},
        recruitment::{repository_pg::RecruitmentRepositoryPg, service::RecruitmentService},
        statistics::{repository_pg::StatisticsRepositoryPg, service::StatisticsService},
        user::{
            model::AuthConfig,
            repository_pg::{TokenRepositoryPg, UserRepositoryPg},
            schema::UserRole,
            service::UserService,
        },
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    log::info!("Environment variables loaded");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> actix_web::HttpResponse {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => actix_web::HttpResponse::Ok().body("Server is running"),
        Err(e) => {
            tracing::error!("Health check failed: {:?}", e);
            actix_web::HttpResponse::ServiceUnavailable().body("Database unavailable")
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;
    run_migrations(&db_pool).await.map_err(|_| std::io::Error::other("Database migration error"))?;

    let redis_pool = connect_redis().map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let token_repo = Arc::new(TokenRepositoryPg::new(db_pool.clone()));
    let company_repo = Arc::new(CompanyRepositoryPg::new(db_pool.clone()));
    let recruitment_repo = Arc::new(RecruitmentRepositoryPg::new(db_pool.clone()));
    let application_repo = Arc::new(ApplicationRepositoryPg::new(db_pool.clone()));
    let file_repo = Arc::new(FileRepositoryPg::new(db_pool.clone()));
    let statistics_repo = Arc::new(StatisticsRepositoryPg::new(db_pool.clone()));

    let storage: Arc<dyn ObjectStorage> =
        Arc::new(S3Storage::new(build_s3_client().await, ENV.s3_bucket.clone()));

    let registry = Arc::new(DestinationRegistry::new(redis_pool));
    let events = EventBus::new(
        Arc::new(RedisEventEmitter::new(registry)),
        EventConfig {
            suggestion_queue: ENV.suggestion_queue.clone(),
            notification_queue: ENV.notification_queue.clone(),
        },
    );

    let mailer = build_mailer(MailConfig {
        api_key: ENV.brevo_api_key.clone(),
        sender_email: ENV.mail_sender_email.clone(),
        sender_name: ENV.mail_sender_name.clone(),
    })
    .map_err(|_| std::io::Error::other("Mail client error"))?;

    let user_service = UserService::with_dependencies(
        user_repo.clone(),
        token_repo,
        AuthConfig {
            jwt_secret: ENV.jwt_secret.clone(),
            access_token_expiration: ENV.access_token_expiration,
            refresh_token_expiration: ENV.refresh_token_expiration,
        },
    );
    let company_service =
        CompanyService::with_dependencies(company_repo.clone(), user_repo.clone());
    let recruitment_service = RecruitmentService::with_dependencies(
        recruitment_repo.clone(),
        company_repo.clone(),
        user_repo.clone(),
        events.clone(),
    );
    let file_service = Arc::new(FileUploadService::new(
        file_repo,
        storage,
        UploadConfig {
            max_file_size: ENV.max_upload_size,
            url_expiration: Duration::from_secs(ENV.cv_url_expiration),
            ..UploadConfig::default()
        },
    ));
    let application_service = ApplicationService::with_dependencies(
        application_repo,
        recruitment_repo,
        company_repo,
        user_repo,
        file_service.clone(),
        events,
        mailer,
    );
    let statistics_service = StatisticsService::with_dependencies(statistics_repo);

    tracing::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(company_service.clone()))
            .app_data(web::Data::new(recruitment_service.clone()))
            .app_data(web::Data::new(application_service.clone()))
            .app_data(web::Data::new(statistics_service.clone()))
            .app_data(web::Data::from(file_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .configure(modules::company::route::public_api_configure)
                    .configure(modules::recruitment::route::public_api_configure)
                    .service(
                        web::scope("/system")
                            .wrap(from_fn(authorization(vec![UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::company::route::system_configure)
                            .configure(modules::application::route::system_configure)
                            .configure(modules::statistics::route::system_configure),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(from_fn(authorization(vec![
                                UserRole::CompanyAdmin,
                                UserRole::CompanyHr,
                            ])))
                            .wrap(from_fn(authentication))
                            .configure(modules::company::route::admin_configure)
                            .configure(modules::recruitment::route::admin_configure)
                            .configure(modules::application::route::admin_configure),
                    )
                    .service(
                        web::scope("/applications")
                            .wrap(from_fn(authorization(vec![UserRole::User])))
                            .wrap(from_fn(authentication))
                            .configure(modules::application::route::configure),
                    )
                    .service(
                        web::scope("")
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::file_upload::route::configure),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
