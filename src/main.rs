use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

use tasklet::auth::{AuthMiddleware, TokenCodec};
use tasklet::config::Config;
use tasklet::routes::{self, health};
use tasklet::services::TaskService;
use tasklet::store::PgTaskStore;

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("{}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            log::error!("failed to connect to database: {}", e);
            io::Error::new(io::ErrorKind::ConnectionRefused, e)
        })?;

    let codec = web::Data::new(TokenCodec::from_config(&config.auth));
    let service = web::Data::new(TaskService::new(Arc::new(PgTaskStore::new(pool))));
    let cors_origins = config.cors_allowed_origins.clone();

    log::info!(
        "Starting tasklet ({:?}) at {}",
        config.app_env,
        config.server_url()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(codec.clone())
            .app_data(service.clone())
            .wrap(cors(&cors_origins))
            .wrap(Logger::default())
            .service(health::root)
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
