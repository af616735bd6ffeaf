use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use taskforge::auth::{PasswordHasher, TokenIssuer};
use taskforge::config::Config;
use taskforge::routes::{self, health};
use taskforge::store::PgStore;
use taskforge::Services;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const USAGE: &str = "Usage:\n  taskforge [serve]          Apply migrations and start the server (default)\n  taskforge migrate [up|down]  Apply or revert database migrations";

fn fatal<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |e| {
        log::error!("{}: {}", context, e);
        io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
    }
}

async fn connect(database_url: &str) -> io::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(fatal("Failed to connect to database"))
}

async fn migrate(direction: &str) -> io::Result<()> {
    let database_url = Config::database_url_from_env().map_err(fatal("Invalid configuration"))?;
    let pool = connect(&database_url).await?;

    match direction {
        "up" => {
            MIGRATOR
                .run(&pool)
                .await
                .map_err(fatal("Failed to apply migrations"))?;
            log::info!("Migrations applied successfully");
        }
        "down" => {
            MIGRATOR
                .undo(&pool, 0)
                .await
                .map_err(fatal("Failed to revert migrations"))?;
            log::info!("Migrations reverted successfully");
        }
        other => {
            eprintln!("{}", USAGE);
            return Err(fatal("Invalid migration direction")(other));
        }
    }
    Ok(())
}

async fn serve() -> io::Result<()> {
    // A missing or blank JWT_SECRET stops the process here, before any request is served.
    let config = Config::from_env().map_err(fatal("Invalid configuration"))?;
    let pool = connect(&config.database_url).await?;
    MIGRATOR
        .run(&pool)
        .await
        .map_err(fatal("Migration failed"))?;

    let services = Services::new(
        Arc::new(PgStore::new(pool)),
        PasswordHasher::new(config.bcrypt_cost),
        TokenIssuer::new(&config.jwt_secret),
    )
    .map_err(fatal("Failed to initialise services"))?;

    log::info!("Starting TaskForge server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(health::ping)
            .service(web::scope("/api").configure(routes::config))
    })
    .shutdown_timeout(10)
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if dotenv::dotenv().is_err() {
        eprintln!("No .env file found, relying on environment variables");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve") => serve().await,
        Some("migrate") => migrate(args.get(1).map(String::as_str).unwrap_or("up")).await,
        Some(_) => {
            eprintln!("{}", USAGE);
            Err(io::Error::new(io::ErrorKind::InvalidInput, "unknown command"))
        }
    }
}
