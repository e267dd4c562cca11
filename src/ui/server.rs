//! HTTP server for the whitelist front end.
//!
//! # Responsibilities
//! - Render the page from the current session snapshot
//! - Turn form posts into controller actions
//! - Expose the snapshot as JSON
//! - Show wrong-network alerts on the next page render
//! - Connect the wallet on mount when configured to
//!
//! # Routes
//! - `GET /` page
//! - `POST /connect`, `POST /join` trigger actions and redirect to `/`
//! - `GET /api/state` JSON snapshot

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tower_http::trace::TraceLayer;

use crate::blockchain::WalletTransport;
use crate::config::UiConfig;
use crate::lifecycle::ShutdownListener;
use crate::session::{Notice, SessionController, SessionStatus, WhitelistSessionState};
use crate::ui::view::render_page;

/// Application state injected into handlers.
pub struct AppState<T: WalletTransport> {
    pub controller: SessionController<T>,
    /// Notices not yet shown; drained on every page render.
    pub notices: Arc<Mutex<mpsc::UnboundedReceiver<Notice>>>,
}

impl<T: WalletTransport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            notices: self.notices.clone(),
        }
    }
}

/// Body of `GET /api/state`.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub status: SessionStatus,
    #[serde(flatten)]
    pub state: WhitelistSessionState,
    /// Whitelist capacity, when it could be read.
    pub max_whitelisted_addresses: Option<u32>,
}

/// HTTP server for the front end.
pub struct UiServer<T: WalletTransport> {
    router: Router,
    state: AppState<T>,
    auto_connect: bool,
}

impl<T: WalletTransport> UiServer<T> {
    pub fn new(
        controller: SessionController<T>,
        notices: mpsc::UnboundedReceiver<Notice>,
        config: &UiConfig,
    ) -> Self {
        let state = AppState {
            controller,
            notices: Arc::new(Mutex::new(notices)),
        };
        let router = Self::build_router(state.clone());
        Self {
            router,
            state,
            auto_connect: config.auto_connect,
        }
    }

    fn build_router(state: AppState<T>) -> Router {
        Router::new()
            .route("/", get(index::<T>))
            .route("/connect", post(connect::<T>))
            .route("/join", post(join::<T>))
            .route("/api/state", get(api_state::<T>))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until `shutdown` resolves.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "UI server starting");

        if self.auto_connect {
            let controller = self.state.controller.clone();
            tokio::spawn(async move {
                // Failures are reported through notices.
                let _ = controller.connect_wallet().await;
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("UI server stopped");
        Ok(())
    }
}

/// Drain queued notices and return the latest alert.
///
/// Errors are already logged by the controller and are dropped here.
async fn take_alert(notices: &Mutex<mpsc::UnboundedReceiver<Notice>>) -> Option<String> {
    let mut notices = notices.lock().await;
    let mut alert = None;
    while let Ok(notice) = notices.try_recv() {
        if let Notice::Alert(text) = notice {
            tracing::warn!(alert = %text, "User alert raised");
            alert = Some(text);
        }
    }
    alert
}

async fn index<T: WalletTransport>(State(state): State<AppState<T>>) -> Html<String> {
    let alert = take_alert(&state.notices).await;
    let snapshot = state.controller.state();
    Html(render_page(&snapshot, alert.as_deref()))
}

async fn connect<T: WalletTransport>(State(state): State<AppState<T>>) -> Redirect {
    // A wrong-network alert is queued before this returns.
    if let Err(e) = state.controller.connect_wallet().await {
        tracing::debug!(error = %e, "Connect request failed");
    }
    Redirect::to("/")
}

async fn join<T: WalletTransport>(State(state): State<AppState<T>>) -> Redirect {
    if state.controller.state().loading {
        tracing::debug!("Join ignored, a transaction is already in flight");
        return Redirect::to("/");
    }

    // Confirmation can take a while; the page shows "Loading..." meanwhile.
    let controller = state.controller.clone();
    tokio::spawn(async move {
        let _ = controller.join_whitelist().await;
    });
    Redirect::to("/")
}

async fn api_state<T: WalletTransport>(State(state): State<AppState<T>>) -> Json<StateResponse> {
    let snapshot = state.controller.state();
    let max_whitelisted_addresses = if snapshot.wallet_connected {
        state.controller.capacity().await.ok()
    } else {
        None
    };

    Json(StateResponse {
        status: snapshot.status(),
        state: snapshot,
        max_whitelisted_addresses,
    })
}
