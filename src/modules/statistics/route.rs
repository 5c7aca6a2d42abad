use crate::modules::statistics::handle::*;
use actix_web::web::{scope, ServiceConfig};

/// Mounted under `/system` (platform administrators).
pub fn system_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/statistics").service(get_statistics));
}
