#[macro_use]
extern crate rocket;

use std::path::Path;
use std::process;
use std::sync::Arc;

use rocket::data::{Limits, ToByteUnit};
use rocket::fs::FileServer;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};

mod boot;
mod catalog;
mod community;
mod config;
mod db;
mod media;
mod models;
mod render;
mod routes;
mod store;


use catalog::pages::Catalogs;
use community::PostBoard;
use config::SiteConfig;
use store::Store;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Trail not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the server around an opened store.
pub fn build(config: SiteConfig, store: Arc<dyn Store>) -> Rocket<Build> {
    let upload_mb = config.max_upload_mb.max(1) as u64;
    // A photo past "file" is truncated, not rejected. "data-form" leaves
    // room for the truncated part and the rest of the form.
    let limits = Limits::default()
        .limit("file", (upload_mb + 1).mebibytes())
        .limit("data-form", ((upload_mb + 1) * 4).mebibytes())
        .limit("json", (upload_mb * 2 + 1).mebibytes());
    let figment = rocket::Config::figment().merge(("limits", limits));

    let board = PostBoard::new(store.clone(), &config.posts_key, config.image_limits());
    let catalogs = Catalogs::load(&config);
    let static_dir = config.static_dir.clone();

    let mut app = rocket::custom(figment)
        .manage(store)
        .manage(board)
        .manage(catalogs)
        .manage(config);

    if Path::new(&static_dir).is_dir() {
        app = app.mount("/static", FileServer::from(&static_dir));
    } else {
        log::warn!("Static directory {} missing, /static not mounted", static_dir);
    }

    app.mount("/", routes::public::routes())
        .mount("/", routes::community::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
        .register("/community", routes::community::catchers())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = match SiteConfig::load() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    // Boot check: create directories, warn on missing files
    boot::run(&config);

    let store = match store::open(&config) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to open {:?} store: {}", config.backend, e);
            process::exit(1);
        }
    };

    build(config, store)
}
