pub mod employee;

use actix_web::{error, web};

use crate::errors::AppError;

/// Registers the employee routes together with extractor configs that turn
/// malformed bodies and paths into the JSON error shape used everywhere else.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::Deserialize(inner) => {
                format!("Invalid or missing employee data: {}", inner)
            }
            other => format!("Invalid request body: {}", other),
        };
        log::debug!("Rejected request body: {}", err);
        AppError::BadRequest(message).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected query string: {}", err);
        AppError::BadRequest(format!("Invalid query parameters: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {}", err);
        AppError::BadRequest("Invalid employee ID in path".to_string()).into()
    }))
    .service(
        web::resource("/save_employees")
            .route(web::post().to(employee::save_employees)),
    )
    .service(
        web::resource("/fetch_employees")
            .route(web::get().to(employee::fetch_employees)),
    )
    .service(
        web::resource("/update_employees/{id}")
            .route(web::put().to(employee::update_employee)),
    )
    .service(
        web::resource("/delete_employees")
            .route(web::delete().to(employee::delete_employees)),
    )
    .service(
        web::resource("/get_employee")
            .route(web::get().to(employee::get_employee)),
    );
}
