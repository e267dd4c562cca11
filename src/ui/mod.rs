//! Web front end.
//!
//! # Data Flow
//! ```text
//! browser → server.rs (axum routes) → SessionController
//!                ↑                           │
//!                └── view.rs (HTML) ◀── state snapshot
//! ```

pub mod server;
pub mod view;

pub use server::{AppState, StateResponse, UiServer};
pub use view::{render_button, render_page, ButtonView};
