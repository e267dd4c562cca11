//! Whitelist session subsystem.
//!
//! # Data Flow
//! ```text
//! user action (connect / join)
//!     → controller.rs (gateway acquire, contract call, await receipt)
//!     → SessionEvent
//!     → state.rs reducer
//!     → watch channel snapshot → UI re-renders
//! ```

pub mod controller;
pub mod state;

pub use controller::{Notice, SessionController, SessionError, SessionResult};
pub use state::{SessionEvent, SessionStatus, WhitelistSessionState};
