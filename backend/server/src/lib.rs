//! Contact form service.
//!
//! Renders a contact form, checks what visitors send back and files every valid
//! submission as a JSON document under the next integer id.
//!
//!
//!
//! # Routes
//! - `GET /`: empty form
//! - `POST /submit`: urlencoded form body
//!   - honeypot filled: "Salut le bot!", nothing stored
//!   - invalid fields: form again, every problem listed
//!   - valid: stored, thank you page echoing the submission
//! - `GET /submit`: redirect to `/`
//!
//!
//!
//! # Form Fields
//!
//! | Field     | Meaning                      | Rule                                 |
//! |-----------|------------------------------|--------------------------------------|
//! | `prenom`  | given name                   | 3 to 15 ASCII letters                |
//! | `nom`     | family name                  | 3 to 15 ASCII letters                |
//! | `email`   | email address                | address pattern, no `..`             |
//! | `pays`    | country                      | not empty                            |
//! | `genre`   | gender, `H` or `F`           | one of the two codes                 |
//! | `message` | free text                    | not empty                            |
//! | `sujets`  | topics, repeated             | none ticked means `["Other"]`        |
//! | `spam`    | hidden honeypot              | must stay empty                      |
//!
//!
//!
//! # Configuration
//!
//! | Variable          | Default                  |
//! |-------------------|--------------------------|
//! | `RUST_PORT`       | `8080`                   |
//! | `RUST_STORE`      | `redis` (or `memory`)    |
//! | `REDIS_URL`       | `redis://127.0.0.1:6379` |
//! | `RUST_COLLECTION` | `formulaire`             |
//!
//! Logging follows `RUST_LOG`.
//! ```sh
//! RUST_LOG=info,server=debug cargo run -p contact
//! ```
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod form;
pub mod memory;
pub mod models;
pub mod pages;
pub mod routes;
pub mod state;
pub mod utils;

use config::{Config, StoreKind};
use database::{RecordStore, RedisStore};
use error::StartupError;
use memory::MemoryStore;
use routes::{index_handler, submit_handler, submit_redirect_handler};
use state::AppState;

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    match config.store {
        StoreKind::Redis => {
            let store = RedisStore::connect(&config.redis_url, &config.collection).await?;
            serve(AppState::new(config, store)).await
        }
        StoreKind::Memory => {
            info!("Using in-memory store, submissions are lost on shutdown");
            serve(AppState::new(config, MemoryStore::new())).await
        }
    }
}

pub fn app<S: RecordStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(
            "/submit",
            post(submit_handler::<S>).get(submit_redirect_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve<S: RecordStore>(state: Arc<AppState<S>>) -> Result<(), StartupError> {
    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
