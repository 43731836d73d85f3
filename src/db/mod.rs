use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::Config;

pub mod schema;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name);

    PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}
