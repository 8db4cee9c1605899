use actix_web::{middleware, web, App, HttpServer};
use anyhow::anyhow;
use framegen::context::AppContext;
use framegen::server::{routes, WebError};
use framegen::settings::Settings;
use std::env;

use tracing::info;
use tracing_subscriber;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,actix_web=info");
    }
    tracing_subscriber::fmt::init();

    let settings = Settings::load()?;
    info!("{} backend ver. {}", settings.app_name, settings.version);

    let port = settings.port;

    // Models load before the listener binds; a missing asset aborts startup
    // here with the offending path in the message.
    let ctx = web::Data::new(AppContext::initialize(settings)?);

    info!("listening on 0.0.0.0:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(ctx.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                WebError::input(anyhow!("malformed JSON payload: {err}")).into()
            }))
            .wrap(middleware::Logger::default())
            .service(routes::home)
            .service(
                web::scope("/vision")
                    .service(routes::yolo_frame_gen)
                    .service(routes::yolo_active)
                    .service(routes::media_frame_gen)
                    .service(routes::media_active),
            )
            .service(web::scope("/api").service(routes::health_check))
    })
    .bind(format!("0.0.0.0:{port}"))?
    .run()
    .await?;

    Ok(())
}
