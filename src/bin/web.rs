//! Single binary web server: HTML page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `AppConfig` for the environment variables.

use actix_files::Files;
use actix_web::{cookie::Key, web::Data, App, HttpServer};
use tennis_ladder::{
    web, AppConfig, CsvTableStore, LeagueService, LogNotifier, Notifier, OutboxNotifier,
    SmtpNotifier,
};
use tokio::sync::Mutex;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let store = CsvTableStore::new(&config.data_dir);
    let notifier: Box<dyn Notifier> = match (&config.smtp, &config.outbox) {
        (Some(smtp), _) => {
            log::info!("Sending email through {}:{}", smtp.host, smtp.port);
            Box::new(
                SmtpNotifier::new(smtp)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
            )
        }
        (None, Some(path)) => Box::new(OutboxNotifier::new(path)),
        (None, None) => Box::new(LogNotifier),
    };
    let service = LeagueService::open(Box::new(store), notifier, config.league.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!(
        "Loaded league from {} ({} players)",
        config.data_dir.display(),
        service.league().rankings.len()
    );

    let state = Data::new(Mutex::new(service));
    // New key per start: sessions only hold the "I am" selection.
    let key = Key::generate();

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(web::session_middleware(key.clone()))
            .configure(web::configure)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}
