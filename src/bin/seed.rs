//! Creates the schema and loads demo employees into an empty database.

use log::{error, info};

use employee_contacts_backend::config::Config;
use employee_contacts_backend::db;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        error!("Seeding failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config).await?;

    db::schema::bootstrap(&pool).await?;
    let inserted = db::schema::seed(&pool).await?;
    info!("Inserted {} demo employees", inserted);

    pool.close().await;
    Ok(())
}
