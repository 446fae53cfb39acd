//! HTTP surface over the message and product collections.
//!
//! | Method   | Path                        | Body                         |
//! |----------|-----------------------------|------------------------------|
//! | `POST`   | `/contact`                  | JSON `{name, email, message}`|
//! | `GET`    | `/api/messages`             |                              |
//! | `PATCH`  | `/api/messages/:index/read` | JSON `{read}`                |
//! | `GET`    | `/products`                 |                              |
//! | `POST`   | `/products`                 | multipart fields + `images`  |
//! | `PUT`    | `/products/:index`          | multipart fields + `images`  |
//! | `DELETE` | `/products/:index`          |                              |
//!
//! Saved images are served under `/images`; a configured public directory
//! answers every other path. Errors are `{"error": "..."}` with a 4xx status
//! for bad input and 5xx for storage failures.

/// Error rendering.
pub mod error;
/// Body decoding helpers.
pub mod form;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    collections::{Collections, MessageCollection, ProductCollection},
    config::ServerConfig,
    runtime::handle::{spawn_collection, CollectionHandle, RuntimeConfig},
};

use error::ServeError;

/// Worker handles shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Message collection worker.
    pub messages: CollectionHandle<MessageCollection>,
    /// Product collection worker.
    pub products: CollectionHandle<ProductCollection>,
}

impl AppState {
    /// Moves each collection onto its own single-writer worker.
    pub fn spawn(collections: Collections, runtime: &RuntimeConfig) -> Self {
        Self {
            messages: spawn_collection(collections.messages, runtime.clone()),
            products: spawn_collection(collections.products, runtime.clone()),
        }
    }

    /// Stops both workers after their queued jobs. Returns `false` if either
    /// was already gone.
    pub async fn shutdown(&self) -> bool {
        let mut clean = true;
        if let Err(err) = self.messages.shutdown().await {
            tracing::warn!(error = %err, kind = "message", "collection worker did not stop cleanly");
            clean = false;
        }
        if let Err(err) = self.products.shutdown().await {
            tracing::warn!(error = %err, kind = "product", "collection worker did not stop cleanly");
            clean = false;
        }
        clean
    }
}

/// Builds the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let images_mount = format!("/{}", config.store.asset_prefix.trim_matches('/'));

    let mut app = Router::new()
        .route("/contact", post(handlers::submit_message))
        .route("/api/messages", get(handlers::list_messages))
        .route("/api/messages/:index/read", patch(handlers::mark_read))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:index",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .nest_service(&images_mount, ServeDir::new(config.store.images_path()));

    if let Some(public_dir) = &config.public_dir {
        app = app.fallback_service(ServeDir::new(public_dir));
    }

    app.layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Opens the collections, starts their workers and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let collections = Collections::open(&config.store)?;
    let state = AppState::spawn(collections, &config.runtime);
    let app = router(state.clone(), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        data_dir = %config.store.data_dir.display(),
        "shelfstore listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    tracing::info!("shelfstore stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
