use clinic_slots_api::config::ApiConfig;
use clinic_slots_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Failed to load API configuration")?;

    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Failed to connect to the scheduling database")?;

    // Tables are created idempotently, so the server can start against an empty database
    initialize_database(&db_pool).await?;

    clinic_slots_api::start_server(config, db_pool).await
}
