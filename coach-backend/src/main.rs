use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod agents;
mod ai;
mod coaching;
mod config;
mod controllers;
mod db;
mod models;

use ai::OpenAIClient;
use coaching::Orchestrator;
use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize database: {}", e)))?;
    let db = Arc::new(db);

    let client = OpenAIClient::from_config(&config.llm).map_err(std::io::Error::other)?;
    log::info!("Language model client ready (model: {})", client.model());

    // Agent registry is fixed for the lifetime of the process
    log::info!("Initializing agent registry");
    let registry = Arc::new(agents::create_default_registry(Arc::new(client)));
    log::info!("Registered {} agent domains: {:?}", registry.len(), registry.domains());

    let orchestrator = Arc::new(Orchestrator::new(
        db.clone(),
        registry,
        Duration::from_secs(config.agent_timeout_secs),
    ));
    log::info!("Agent timeout: {}s", config.agent_timeout_secs);

    log::info!("Starting coaching backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
                orchestrator: Arc::clone(&orchestrator),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::coaching::config)
            .configure(controllers::assignments::config)
            .configure(controllers::agent_states::config)
            .configure(controllers::executions::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
