//! Read-only HTTP surface of the Vanguard statistics engine.
//!
//! | Endpoint | Query |
//! |---|---|
//! | `GET /statistics/descriptive` | descriptive statistics of light, triumph and play time |
//! | `GET /statistics/distribution` | light level histogram |
//! | `GET /statistics/class-comparison` | light level per class with box-plot data |
//! | `GET /statistics/correlation` | light level vs triumph score |
//! | `GET /statistics/hypothesis-tests` | one-way ANOVA of light level across classes |
//! | `GET /statistics/filtered-count` | filtered count with a median percentile profile |
//! | `GET /statistics/profile/{player_id}` | percentile profile of one player |
//! | `GET /health` | liveness |

use std::io;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/statistics/descriptive", get(handlers::descriptive))
        .route("/statistics/distribution", get(handlers::distribution))
        .route("/statistics/class-comparison", get(handlers::class_comparison))
        .route("/statistics/correlation", get(handlers::correlation))
        .route("/statistics/hypothesis-tests", get(handlers::hypothesis_tests))
        .route("/statistics/filtered-count", get(handlers::filtered_count))
        .route("/statistics/profile/{player_id}", get(handlers::profile))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves requests on `listener` until Ctrl-C is received.
pub async fn serve(listener: TcpListener, state: AppState) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Vanguard statistics: http://{addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
