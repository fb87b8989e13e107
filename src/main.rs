use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use media_analyzer::api::{configure_routes, AppState};
use media_analyzer::{banner, config};
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Make sure ANALYZER_FUNCTION_URL or ANALYZER_CONFIG is set in your environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load app configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let bind = (app_config.server.host.clone(), app_config.server.port);
    log::info!("Remote analysis function: {}", app_config.backend.function_url);
    log::info!("Submission policy: {:?}", app_config.submission_policy);

    let state = AppState::new(app_config);

    let sweeper = state.clone();
    actix_rt::spawn(async move {
        let mut ticker = actix_rt::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            sweeper.prune_idle_views().await;
        }
    });

    println!("🚀 Starting server...");
    println!("🎧 Form available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
