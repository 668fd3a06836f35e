use std::process::ExitCode;
use std::sync::Arc;

use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use study_genius::adapters::ai::{GeminiConfig, GeminiImageEditor};
use study_genius::adapters::auth::{SupabaseAuthClient, SupabaseAuthConfig};
use study_genius::adapters::http::{create_router, AppHandlers};
use study_genius::adapters::postgres::{PostgresExamRepository, PostgresProfileRepository};
use study_genius::application::{
    AppStore, BootstrapOutcome, EditDraftHandler, EditImageHandler, OpenGroupHandler,
    PublishExamHandler, RegisterHandler, SessionBootstrapHandler, SessionWatcher, SignInHandler,
    SignOutHandler, UpdateProfileHandler,
};
use study_genius::config::{AppConfig, ConfigError, ValidationError};
use study_genius::domain::foundation::AuthError;
use study_genius::ports::{AuthBackend, ExamRepository, ImageEditError, ProfileRepository};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Auth client setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Image editor setup failed: {0}")]
    Image(#[from] ImageEditError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "StudyGenius stopped");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;
    let addr = config.server.socket_addr()?;
    tracing::info!(environment = ?config.server.environment, "StudyGenius starting");

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    let auth: Arc<dyn AuthBackend> = Arc::new(SupabaseAuthClient::new(
        SupabaseAuthConfig::new(
            config.supabase.url.clone(),
            Secret::new(config.supabase.anon_key.clone()),
        )
        .with_timeout(config.supabase.timeout()),
    )?);
    let profiles: Arc<dyn ProfileRepository> =
        Arc::new(PostgresProfileRepository::new(pool.clone()));
    let exams: Arc<dyn ExamRepository> = Arc::new(PostgresExamRepository::new(pool));

    let store = Arc::new(AppStore::new());
    let call_timeout = config.flows.call_timeout();

    let bootstrap = Arc::new(SessionBootstrapHandler::new(
        auth.clone(),
        profiles.clone(),
        store.clone(),
        call_timeout,
    ));
    match bootstrap.handle().await {
        BootstrapOutcome::Authenticated(user) => {
            tracing::info!(user_id = %user.id, "Restored existing session")
        }
        BootstrapOutcome::Failed(reason) => {
            tracing::warn!(reason = %reason, "Session bootstrap failed; starting signed out")
        }
        _ => tracing::info!("Starting signed out"),
    }
    let watcher = SessionWatcher::spawn(auth.as_ref(), bootstrap, store.clone());

    let mut handlers = AppHandlers::new(
        store.clone(),
        Arc::new(SignInHandler::new(
            auth.clone(),
            profiles.clone(),
            store.clone(),
            call_timeout,
        )),
        Arc::new(RegisterHandler::new(
            auth.clone(),
            profiles.clone(),
            store.clone(),
            call_timeout,
        )),
        Arc::new(SignOutHandler::new(auth, store.clone(), call_timeout)),
        Arc::new(OpenGroupHandler::new(exams.clone(), store.clone(), call_timeout)),
        Arc::new(EditDraftHandler::new(store.clone())),
        Arc::new(PublishExamHandler::new(exams, store.clone(), call_timeout)),
        Arc::new(UpdateProfileHandler::new(profiles, store.clone(), call_timeout)),
    );

    match config.ai.gemini_api_key.as_deref().filter(|_| config.ai.has_gemini()) {
        Some(api_key) => {
            let editor = GeminiImageEditor::new(
                GeminiConfig::new(api_key)
                    .with_model(config.ai.gemini_model.clone())
                    .with_base_url(config.ai.gemini_base_url.clone())
                    .with_timeout(config.ai.timeout()),
            )?;
            handlers = handlers.with_image_editor(Arc::new(EditImageHandler::new(
                Arc::new(editor),
                store.clone(),
                config.flows.image_timeout(),
            )));
        }
        None => tracing::warn!("No Gemini API key configured; image editing disabled"),
    }

    let router = create_router(handlers, &config.server);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    watcher.shutdown().await;
    tracing::info!("Shut down");
    served.map_err(StartupError::from)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
