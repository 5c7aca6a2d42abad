use crate::modules::application::handle::*;
use actix_web::web::{scope, ServiceConfig};

/// Mounted under `/applications` for applicants.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(create_application).service(get_own_application);
}

/// Mounted under `/admin` (company staff).
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/applications")
            .service(get_application_detail)
            .service(approve_application)
            .service(reject_application),
    );
}

/// Mounted under `/system` (platform administrators).
pub fn system_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/applications").service(list_applications).service(update_application));
}
