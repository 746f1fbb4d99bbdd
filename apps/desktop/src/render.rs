//! Text and JSON views of the store state.

use std::fmt::Write;

use element_store::{Notification, StoreState};
use shared::domain::{ElementField, PeriodicElement};

pub fn render_state(state: &StoreState, json: bool) -> String {
    let rows = state.filtered_elements();
    if json {
        return serde_json::to_string_pretty(&rows).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"));
    }

    let mut out = render_table(&rows, state);
    if state.loading {
        out.push_str("loading...\n");
    }
    out
}

fn render_table(rows: &[PeriodicElement], state: &StoreState) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>4} ", "id");
    for field in ElementField::ALL {
        let _ = write!(out, "{:<12}", field.as_str());
    }
    out.push('\n');

    for element in rows {
        let marker = if state.selected == Some(element.id) { '*' } else { ' ' };
        let _ = write!(out, "{:>3}{marker} ", element.id);
        for field in ElementField::ALL {
            let _ = write!(out, "{:<12}", element.field_text(field));
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} of {} rows{}",
        rows.len(),
        state.elements.len(),
        if state.search_term.is_empty() {
            String::new()
        } else {
            format!(" matching '{}'", state.search_term)
        }
    );
    out
}

pub fn render_notification(notification: &Notification, json: bool) -> String {
    if json {
        if let Ok(encoded) = serde_json::to_string(notification) {
            return encoded;
        }
    }
    format!("! {}  [{}]", notification.message, notification.action)
}
