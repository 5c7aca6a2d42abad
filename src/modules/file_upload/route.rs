use crate::modules::file_upload::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/files").service(upload_file).service(get_file).service(delete_file));
}
