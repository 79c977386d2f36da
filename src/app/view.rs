//! Plain-text rendering of [`AppState`].

use crate::app::state::AppState;

const MESSAGE_PLACEHOLDER: &str = "A fetched message will show here";

/// Render the state as the lines shown after each command.
pub fn render(state: &AppState) -> String {
    let message = if state.message.is_empty() {
        MESSAGE_PLACEHOLDER
    } else {
        state.message.as_str()
    };

    let mut out = format!("Message:     {}\nWallet:      {}\n", message, state.wallet_status);
    if let Some(update) = &state.last_update {
        out.push_str(&format!("Last update: {}\n", update));
    }
    if let Some(notice) = &state.notice {
        out.push_str(&format!("Notice:      {}\n", notice));
    }
    out
}
