mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

pub use config::Config;

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // Configure logging with environment variable support
    // RUST_LOG environment variable can be used for fine-grained control per module:
    // Examples:
    //   RUST_LOG=debug                                       - Set all to debug
    //   RUST_LOG=prompt_gallery_accounts=debug               - Set this crate to debug
    //   RUST_LOG=info,prompt_gallery_accounts::routes=debug  - Global info, routes at debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // try_init: tests build several Rocket instances in one process
    if json_format {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    // Validate that wildcard origins are not combined with credentials
    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options].into_iter().map(From::from).collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

fn get_swagger_config(openapi_url: &str) -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: openapi_url.to_string(),
        ..Default::default()
    }
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    if !config.email.enabled {
        tracing::warn!("Email dispatch is disabled; verification emails will not be sent");
    }

    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let (auth_routes, auth_openapi) = app_routes::auth::routes();
    let (health_routes, health_openapi) = app_routes::health::routes();

    let openapi_docs = match marge_spec_list(&[("/", auth_openapi), ("/health", health_openapi)]) {
        Ok(docs) => docs,
        Err(err) => panic!("Could not merge OpenAPI spec: {}", err),
    };
    let settings = rocket_okapi::settings::OpenApiSettings::default();

    rocket::custom(figment)
        .attach(cors)
        .attach(RequestLogger) // Attach request/response logging middleware
        .attach(stage_db(config.database.clone()))
        .manage(config)
        .mount("/", auth_routes)
        .mount("/health", health_routes)
        .mount("/", vec![get_openapi_route(openapi_docs, &settings)])
        .mount("/docs", make_swagger_ui(&get_swagger_config("/openapi.json")))
        .register(
            "/",
            catchers![
                app_routes::error::unauthorized,
                app_routes::error::not_found,
                app_routes::error::unprocessable_entity,
                app_routes::error::too_many_requests,
                app_routes::error::internal_error,
            ],
        )
}
