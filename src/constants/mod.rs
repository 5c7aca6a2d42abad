pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub s3_bucket: String,
    pub aws_region: String,
    pub aws_endpoint_url: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub cv_url_expiration: u64,
    pub max_upload_size: usize,
    pub suggestion_queue: String,
    pub notification_queue: String,
    pub brevo_api_key: Option<String>,
    pub mail_sender_email: String,
    pub mail_sender_name: String,
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let access_token_expiration = std::env::var("ACCESS_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .expect("ACCESS_TOKEN_EXPIRATION must be a valid u64 integer");
        let refresh_token_expiration = std::env::var("REFRESH_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .expect("REFRESH_TOKEN_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let s3_bucket = std::env::var("S3_BUCKET")
            .expect("S3_BUCKET must be set in .env file or environment variable");
        let aws_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let cv_url_expiration = std::env::var("CV_URL_EXPIRATION")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .expect("CV_URL_EXPIRATION must be a valid u64 integer");
        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_SIZE must be a valid usize integer");

        let suggestion_queue =
            std::env::var("SUGGESTION_QUEUE").unwrap_or_else(|_| "suggestion_queue".to_string());
        let notification_queue = std::env::var("NOTIFICATION_QUEUE")
            .unwrap_or_else(|_| "notification_queue".to_string());

        let mail_sender_email =
            std::env::var("MAIL_SENDER_EMAIL").unwrap_or_else(|_| "no-reply@localhost".to_string());
        let mail_sender_name =
            std::env::var("MAIL_SENDER_NAME").unwrap_or_else(|_| "Recruitment".to_string());

        Env {
            jwt_secret,
            access_token_expiration,
            refresh_token_expiration,
            database_url,
            redis_url,
            frontend_url,
            ip,
            port,
            s3_bucket,
            aws_region,
            aws_endpoint_url: optional("AWS_ENDPOINT_URL"),
            aws_access_key_id: optional("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional("AWS_SECRET_ACCESS_KEY"),
            cv_url_expiration,
            max_upload_size,
            suggestion_queue,
            notification_queue,
            brevo_api_key: optional("BREVO_API_KEY"),
            mail_sender_email,
            mail_sender_name,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
