mod config;
mod gitlab;
mod hooks;
mod http;
mod notifier;

use actix::Actor;
use actix_web::{middleware::Logger, web, App, HttpServer};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use crate::notifier::Notification;

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .finish(),
    )?;

    let config = config::Config::from_env()?;
    let notifier = notifier::Notifier::new(config.notifier())
        .start()
        .recipient::<Notification>();

    let max_payload_bytes = config.max_payload_bytes;
    tracing::info!("Listening at {}", config.listen_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::PayloadConfig::new(max_payload_bytes))
            .wrap(Logger::default())
            .service(hooks::resource())
    })
    .bind(config.listen_addr)?
    .run()
    .await
    .map_err(Into::into)
}
