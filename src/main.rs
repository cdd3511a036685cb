use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use roomsplit::{config::Config, handlers, ledger::Ledger};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("roomsplit={},actix_web=info", config.log.level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(self_id = %config.household.self_id, "Configuration loaded");

    let ledger = web::Data::new(Ledger::new(&config.household));

    info!(
        "Using the following address: {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(ledger.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
