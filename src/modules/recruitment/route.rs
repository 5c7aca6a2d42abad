use crate::modules::{
    application::handle::list_recruitment_applications, recruitment::handle::*,
};
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/recruitments").service(list_recruitments).service(get_recruitment));
}

/// Mounted under `/admin`. The applications listing shares the `/recruitments`
/// prefix, so it is registered in the same scope.
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/recruitments")
            .service(create_recruitment)
            .service(update_recruitment)
            .service(delete_recruitment)
            .service(list_recruitment_applications),
    );
}
