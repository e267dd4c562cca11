//! Session state and its reducer.
//!
//! The controller never writes fields directly; it feeds [`SessionEvent`]s
//! through [`WhitelistSessionState::apply`], which keeps the invariant
//! `joined_whitelist ⇒ wallet_connected`.

use serde::Serialize;

/// UI-relevant status of one front-end session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WhitelistSessionState {
    pub wallet_connected: bool,
    pub joined_whitelist: bool,
    /// A whitelist transaction is waiting to be mined.
    pub loading: bool,
    pub whitelisted_count: u32,
}

/// Completed asynchronous step reported to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The gateway handed out an accessor on the required network.
    WalletConnected,
    /// `whitelistedAddresses(signer)` returned.
    MembershipLoaded(bool),
    /// `numAddressesWhitelisted()` returned.
    CountLoaded(u32),
    /// `addAddressToWhitelist()` was broadcast.
    TransactionSubmitted,
    /// The whitelist transaction stopped being in flight, whatever the outcome.
    TransactionSettled,
    /// The whitelist transaction was confirmed.
    JoinedWhitelist,
}

/// Coarse view of the state, in the precedence the page renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Disconnected,
    Connected,
    Loading,
    Joined,
}

impl WhitelistSessionState {
    /// Apply one event. Membership events are ignored while disconnected.
    pub fn apply(self, event: SessionEvent) -> Self {
        let mut next = self;
        match event {
            SessionEvent::WalletConnected => next.wallet_connected = true,
            SessionEvent::MembershipLoaded(joined) => {
                if self.wallet_connected {
                    next.joined_whitelist = joined;
                }
            }
            SessionEvent::CountLoaded(count) => next.whitelisted_count = count,
            SessionEvent::TransactionSubmitted => next.loading = true,
            SessionEvent::TransactionSettled => next.loading = false,
            SessionEvent::JoinedWhitelist => {
                if self.wallet_connected {
                    next.joined_whitelist = true;
                }
            }
        }
        next
    }

    pub fn status(&self) -> SessionStatus {
        if !self.wallet_connected {
            SessionStatus::Disconnected
        } else if self.joined_whitelist {
            SessionStatus::Joined
        } else if self.loading {
            SessionStatus::Loading
        } else {
            SessionStatus::Connected
        }
    }

    /// `joined_whitelist ⇒ wallet_connected`
    pub fn is_consistent(&self) -> bool {
        !self.joined_whitelist || self.wallet_connected
    }
}
