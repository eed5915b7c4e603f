mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{AppConfig, StorageSettings},
    domain::services::blob_store::BlobStore,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher, aws_s3_provider::AwsS3Provider,
        base64_image_decoder::Base64ImageDecoder, local_blob_store::LocalBlobStore,
        s3_blob_store::S3BlobStore,
        user_registration_repository::PostgresUserRegistrationRepository,
    },
    presentation::handlers::user_handler::create_user_router,
    usecase::register_user_usecase::RegisterUserUsecase,
};

/// Pick the media backend once for the lifetime of the process
fn build_blob_store(settings: &StorageSettings) -> Arc<dyn BlobStore> {
    match settings {
        StorageSettings::Local { root, url_prefix } => {
            info!("Storing uploads on disk under {}", root.display());
            Arc::new(LocalBlobStore::new(root.clone(), url_prefix))
        }
        StorageSettings::S3(s3) => {
            info!("Storing uploads in S3 bucket {} ({})", s3.bucket, s3.region);
            Arc::new(S3BlobStore::new(AwsS3Provider::new(s3)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "registration_api=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    debug!("Loaded configuration: {:?}", config);

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(true);
    let db = Database::connect(opt).await?;
    info!("Database connection established");

    let register_user_usecase = RegisterUserUsecase::new(
        PostgresUserRegistrationRepository::new(db),
        Argon2PasswordHasher::new(),
        Base64ImageDecoder::new(),
        build_blob_store(&config.storage),
        &config.registration,
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/api",
            create_user_router(register_user_usecase, config.max_body_bytes),
        );

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
