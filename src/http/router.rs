//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::http::handlers::{attendance, classes, fallback, students};
use crate::http::state::AppState;
use crate::store::Store;

/// Axum router wrapper that hosts the roster API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            router: build_router(AppState::new(store)),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves until Ctrl-C or SIGTERM, letting in-flight requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), AppError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Bind { addr, source })?;
        tracing::info!(%addr, "listening");
        self.serve_on(listener).await
    }

    pub async fn serve_on(self, listener: TcpListener) -> Result<(), AppError> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AppError::Serve)?;
        tracing::info!("server stopped");
        Ok(())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/class",
            get(classes::list_classes).post(classes::create_class),
        )
        .route(
            "/class/{id}",
            get(classes::get_class)
                .patch(classes::patch_class)
                .delete(classes::delete_class),
        )
        .route(
            "/student",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/student/{id}",
            get(students::get_student)
                .patch(students::patch_student)
                .delete(students::delete_student),
        )
        .route(
            "/attendance",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route(
            "/attendance/{id}",
            get(attendance::get_attendance)
                .patch(attendance::patch_attendance)
                .delete(attendance::delete_attendance),
        )
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
