use crate::modules::company::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/companies").service(list_companies).service(get_company));
}

/// Mounted under `/admin` (company staff).
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/company").service(update_own_company)).service(
        scope("/hrs").service(create_company_hr).service(list_company_hrs).service(delete_company_hr),
    );
}

/// Mounted under `/system` (platform administrators).
pub fn system_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/companies").service(create_company).service(delete_company));
}
