use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use employee_contacts_backend::config::Config;
use employee_contacts_backend::db;
use employee_contacts_backend::handlers;
use employee_contacts_backend::repository::employee::EmployeeRepository;
use employee_contacts_backend::store::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    // Initialize the database pool
    let pool = db::create_pool(&config).await.map_err(|err| {
        error!("Failed to connect to the database: {}", err);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, err)
    })?;
    info!("Connected to the database {} at {}:{}", config.db_name, config.db_host, config.db_port);

    db::schema::bootstrap(&pool).await.map_err(|err| {
        error!("Schema bootstrap failed: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;

    let repository = web::Data::new(EmployeeRepository::new(Arc::new(PgStore::new(pool.clone()))));

    info!("Starting server at {}:{}", config.host, config.port);

    // Start the HTTP server
    let result = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(repository.clone())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    pool.close().await;
    info!("Server stopped, database pool closed");

    result
}
