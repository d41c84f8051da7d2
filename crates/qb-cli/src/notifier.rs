use qb_core::enums::Severity;
use qb_page::{Notification, Notifier};

use crate::ui;

/// Shows page notifications on stderr.
#[derive(Debug, Clone, Copy)]
pub struct StderrNotifier {
    color: bool,
}

impl StderrNotifier {
    #[must_use]
    pub fn from_prefs() -> Self {
        Self {
            color: ui::prefs().color,
        }
    }
}

impl Notifier for StderrNotifier {
    fn show(&self, notification: Notification) {
        eprintln!("{}", format_notification(&notification, self.color));
    }
}

fn ansi_code(severity: Severity) -> &'static str {
    match severity.color() {
        "red" => "31",
        "blue" => "34",
        _ => "0",
    }
}

/// One line: icon, title, message. The title is colored by severity.
#[must_use]
pub fn format_notification(notification: &Notification, color: bool) -> String {
    let glyph = notification.icon.glyph();
    let title = &notification.title;
    if color {
        let code = ansi_code(notification.severity);
        format!(
            "\u{1b}[{code}m{glyph} {title}\u{1b}[0m {}",
            notification.message
        )
    } else {
        format!("{glyph} {title} {}", notification.message)
    }
}
