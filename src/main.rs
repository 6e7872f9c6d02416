use std::env;

use config::Config;
use dotenvy::dotenv;

use agency_desk::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config_path = env::var("AGENCY_DESK_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    let server_config: ServerConfig = Config::builder()
        .add_source(config::File::with_name(&config_path).required(false))
        .add_source(config::Environment::default())
        .build()
        .and_then(|settings| settings.try_deserialize())
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    agency_desk::run(server_config).await
}
