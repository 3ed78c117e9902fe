mod config;
mod services;
mod store;

use crate::config::{load_settings, Settings};
use crate::store::BandStore;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::fs;
use std::io;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

/// Registers the API, the public pages and the uploaded files.
pub fn configure_app(cfg: &mut web::ServiceConfig, settings: &Settings) {
    cfg.app_data(web::JsonConfig::default().limit(settings.max_upload_bytes))
        .service(services::bands::configure_routes())
        .service(services::slides::configure_routes())
        .service(services::reorder::configure_routes())
        .service(services::uploads::configure_routes())
        .service(services::pages::configure_routes())
        .service(Files::new(
            services::uploads::PUBLIC_PREFIX,
            &settings.upload_dir,
        ));
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let settings = load_settings();
    let url = settings.url();

    fs::create_dir_all(&settings.upload_dir)?;
    let store = match BandStore::open(&settings.database_path) {
        Ok(store) => web::Data::new(store),
        Err(e) => {
            error!(
                "Cannot open band store at {}: {}",
                settings.database_path.display(),
                e
            );
            return Err(io::Error::other(e.to_string()));
        }
    };

    if settings.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    info!("Server running at {}", url);

    let bind = (settings.host.clone(), settings.port);
    let shared_settings = web::Data::new(settings);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(shared_settings.clone())
            .configure(|cfg| configure_app(cfg, &shared_settings))
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
