use actix_web::{
    web::{self, Data},
    HttpResponse,
};

use crate::core::services::HealthService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)));
}

async fn health(service: Data<HealthService>) -> HttpResponse {
    HttpResponse::Ok().json(service.report())
}
