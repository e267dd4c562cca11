//! Page rendering from a session snapshot.

use crate::session::{SessionStatus, WhitelistSessionState};

/// The single control shown under the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonView {
    ConnectWallet,
    Loading,
    JoinWhitelist,
    Joined,
}

impl ButtonView {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonView::ConnectWallet => "Connect Your Wallet",
            ButtonView::Loading => "Loading...",
            ButtonView::JoinWhitelist => "Join the Whitelist",
            ButtonView::Joined => "Thanks for Joining the Whitelist!",
        }
    }

    /// Form target, if the control does anything.
    pub fn action(&self) -> Option<&'static str> {
        match self {
            ButtonView::ConnectWallet => Some("/connect"),
            ButtonView::JoinWhitelist => Some("/join"),
            ButtonView::Loading | ButtonView::Joined => None,
        }
    }
}

pub fn render_button(state: &WhitelistSessionState) -> ButtonView {
    match state.status() {
        SessionStatus::Disconnected => ButtonView::ConnectWallet,
        SessionStatus::Joined => ButtonView::Joined,
        SessionStatus::Loading => ButtonView::Loading,
        SessionStatus::Connected => ButtonView::JoinWhitelist,
    }
}

pub fn joined_message(count: u32) -> String {
    format!("{} have already joined the Whitelist", count)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_control(button: ButtonView) -> String {
    match button.action() {
        Some(action) => format!(
            r#"<form method="post" action="{}"><button class="button" type="submit">{}</button></form>"#,
            action,
            button.label()
        ),
        None if button == ButtonView::Loading => {
            format!(r#"<button class="button" disabled>{}</button>"#, button.label())
        }
        None => format!(r#"<div class="description">{}</div>"#, button.label()),
    }
}

/// Full HTML page. `alert` is shown once above the content.
pub fn render_page(state: &WhitelistSessionState, alert: Option<&str>) -> String {
    let alert_html = alert
        .map(|text| format!(r#"<div class="alert" role="alert">{}</div>"#, escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Whitelist Dapp</title>
<meta name="description" content="Whitelist-Dapp">
</head>
<body>
{alert}
<main>
<h1 class="title">Welcome to Crypto Devs!</h1>
<div class="description">Its an NFT collection for developers in Crypto.</div>
<div class="description">{joined}</div>
{control}
</main>
<footer>Made with &#10084; by Crypto Devs</footer>
</body>
</html>
"#,
        alert = alert_html,
        joined = joined_message(state.whitelisted_count),
        control = render_control(render_button(state)),
    )
}
