use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use linkboard::graphql::build_schema;
use linkboard::handlers::{self, HealthState};
use linkboard::services::EmailService;
use linkboard::session::{PasswordResetStore, SessionStore};
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match linkboard::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting linkboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to run migrations: {}", e),
            )
        })?;

    tracing::info!("Connected to database, migrations applied");

    // Redis backs sessions and password reset tokens
    let redis_client = redis::Client::open(config.redis.url.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Invalid Redis URL: {}", e)))?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to connect to Redis: {}", e),
        )
    })?;

    tracing::info!("Connected to Redis");

    let sessions = SessionStore::new(redis_manager.clone(), config.session.clone());
    let reset_tokens = PasswordResetStore::new(redis_manager.clone());
    let email = EmailService::new(config.smtp.clone());

    let schema = build_schema(db_pool.clone(), sessions.clone(), reset_tokens, email);

    let schema_data = web::Data::new(schema);
    let sessions_data = web::Data::new(sessions);
    let health_state = web::Data::new(HealthState::new(db_pool, redis_manager));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let graphiql_enabled = !config.is_production();
    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        let app = App::new()
            .app_data(schema_data.clone())
            .app_data(sessions_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health))
            .route("/graphql", web::post().to(handlers::graphql));

        if graphiql_enabled {
            app.route("/graphql", web::get().to(handlers::graphiql))
        } else {
            app
        }
    })
    .bind(&bind_address)?
    .run()
    .await
}
