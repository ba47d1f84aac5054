//! Modal message box rendered by `message_box.html`.
//!
//! The page gets a `showMessageBox(title, content, primaryText, showSecondary,
//! secondaryText)` call once loaded and answers through the
//! `message_box_result` command. Closing the window counts as "cancelled".

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde_json::Value;
use tauri::{AppHandle, Manager, State, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::error::Result;
use crate::script;

pub const MESSAGE_BOX_PAGE: &str = "message_box.html";
pub const LABEL_PREFIX: &str = "message-box-";
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub content: String,
    pub primary_button_text: String,
    pub title: String,
    pub show_secondary_button: bool,
    pub secondary_button_text: String,
}

impl MessageBox {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            primary_button_text: "OK".to_string(),
            title: String::new(),
            show_secondary_button: false,
            secondary_button_text: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn primary_button(mut self, text: impl Into<String>) -> Self {
        self.primary_button_text = text.into();
        self
    }

    /// Shows a second button; clicking it answers `false`.
    pub fn secondary_button(mut self, text: impl Into<String>) -> Self {
        self.show_secondary_button = true;
        self.secondary_button_text = text.into();
        self
    }

    /// The `showMessageBox(...)` call for the page.
    pub fn script(&self) -> String {
        script::build_call(
            "showMessageBox",
            &[
                Value::String(self.title.clone()),
                Value::String(self.content.clone()),
                Value::String(self.primary_button_text.clone()),
                Value::Bool(self.show_secondary_button),
                Value::String(self.secondary_button_text.clone()),
            ],
        )
    }
}

/// Callers waiting on an open message box, keyed by window label.
#[derive(Default)]
pub struct MessageBoxRegistry {
    pending: Mutex<HashMap<String, Sender<bool>>>,
    next_id: AtomicU64,
}

impl MessageBoxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh window label and the channel its answer arrives on.
    pub fn register(&self) -> (String, Receiver<bool>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let label = format!("{LABEL_PREFIX}{id}");
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.pending.lock().insert(label.clone(), tx);
        (label, rx)
    }

    /// Delivers `accepted` to whoever waits on `label`. Only the first answer
    /// counts; returns `false` when nobody was waiting.
    pub fn resolve(&self, label: &str, accepted: bool) -> bool {
        match self.pending.lock().remove(label) {
            Some(tx) => tx.send(accepted).is_ok(),
            None => false,
        }
    }

    pub fn forget(&self, label: &str) {
        self.pending.lock().remove(label);
    }

    pub fn is_pending(&self, label: &str) -> bool {
        self.pending.lock().contains_key(label)
    }
}

pub fn is_message_box_label(label: &str) -> bool {
    label.starts_with(LABEL_PREFIX)
}

/// Blocks until an answer arrives, polling `is_open` every [`POLL_INTERVAL`].
/// A box that disappears without answering yields `false`.
pub fn wait_for_answer(rx: &Receiver<bool>, mut is_open: impl FnMut() -> bool) -> bool {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(accepted) => return accepted,
            Err(RecvTimeoutError::Timeout) => {
                if !is_open() {
                    return rx.try_recv().unwrap_or(false);
                }
            }
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

/// Opens the message box window and waits for the user. Blocks the calling
/// thread, so never call it from the event loop thread.
pub(crate) fn show(
    app: &AppHandle,
    window_title: &str,
    message_box: &MessageBox,
    debug: bool,
) -> Result<bool> {
    let registry = app.state::<MessageBoxRegistry>();
    let (label, rx) = registry.register();

    let call = message_box.script();
    if debug {
        log::debug!("{}", call);
    }

    let built = WebviewWindowBuilder::new(app, &label, WebviewUrl::App(MESSAGE_BOX_PAGE.into()))
        .title(window_title)
        .fullscreen(true)
        .decorations(false)
        .transparent(true)
        .resizable(false)
        .initialization_script(&script::on_dom_ready(&call))
        .build();
    if let Err(e) = built {
        registry.forget(&label);
        return Err(e.into());
    }

    let accepted = wait_for_answer(&rx, || app.get_webview_window(&label).is_some());
    registry.forget(&label);

    let destroyed: Result<()> = match app.get_webview_window(&label) {
        Some(window) => window.destroy().map_err(Into::into),
        None => Ok(()),
    };
    Ok(settle(&label, accepted, destroyed))
}

/// The answer stands even when the window could not be torn down.
fn settle(label: &str, accepted: bool, destroyed: Result<()>) -> bool {
    if let Err(e) = destroyed {
        log::warn!("Failed to close message box `{}`: {}", label, e);
    }
    log::info!("Message box `{}` answered: {}", label, accepted);
    accepted
}

/// Cancels the box behind a destroyed window. Returns whether a caller was
/// still waiting on it.
pub fn on_window_destroyed(registry: &MessageBoxRegistry, label: &str) -> bool {
    is_message_box_label(label) && registry.resolve(label, false)
}

/// Hands the page's answer to the caller waiting on `label`.
pub fn deliver_answer(registry: &MessageBoxRegistry, label: &str, accepted: bool) -> bool {
    let delivered = registry.resolve(label, accepted);
    if !delivered {
        log::warn!("No message box waiting on `{}`", label);
    }
    delivered
}

#[tauri::command]
pub fn message_box_result(
    window: WebviewWindow,
    registry: State<'_, MessageBoxRegistry>,
    accepted: bool,
) {
    deliver_answer(&registry, window.label(), accepted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn defaults_match_a_plain_ok_box() {
        let mb = MessageBox::new("Hello World!");
        assert_eq!(mb.primary_button_text, "OK");
        assert_eq!(mb.title, "");
        assert!(!mb.show_secondary_button);
        assert_eq!(mb.secondary_button_text, "");
    }

    #[test]
    fn script_passes_arguments_in_page_order() {
        let mb = MessageBox::new("Delete?")
            .title("Confirm")
            .primary_button("Yes")
            .secondary_button("No");
        assert_eq!(
            mb.script(),
            "showMessageBox(decodeURIComponent('Confirm'), decodeURIComponent('Delete%3F'), \
             decodeURIComponent('Yes'), true, decodeURIComponent('No'));"
        );
    }

    #[test]
    fn labels_are_unique_and_prefixed() {
        let registry = MessageBoxRegistry::new();
        let (a, _rx_a) = registry.register();
        let (b, _rx_b) = registry.register();
        assert_ne!(a, b);
        assert!(is_message_box_label(&a));
        assert!(!is_message_box_label("main"));
    }

    #[test]
    fn first_answer_wins() {
        let registry = MessageBoxRegistry::new();
        let (label, rx) = registry.register();

        assert!(registry.resolve(&label, true));
        assert!(!registry.resolve(&label, false));
        assert!(!registry.is_pending(&label));
        assert!(wait_for_answer(&rx, || true));
    }

    #[test]
    fn unknown_label_is_ignored() {
        let registry = MessageBoxRegistry::new();
        assert!(!registry.resolve("message-box-42", true));
    }

    #[test]
    fn answer_from_another_thread_is_received() {
        let registry = std::sync::Arc::new(MessageBoxRegistry::new());
        let (label, rx) = registry.register();

        let answering = registry.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            answering.resolve(&label, true)
        });

        assert!(wait_for_answer(&rx, || true));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn closed_window_counts_as_cancelled() {
        let registry = MessageBoxRegistry::new();
        let (label, rx) = registry.register();

        let mut polls = 0;
        let accepted = wait_for_answer(&rx, || {
            polls += 1;
            polls < 2
        });
        assert!(!accepted);
        assert_eq!(polls, 2);
        assert!(registry.is_pending(&label));
    }

    #[test]
    fn destroyed_box_window_answers_false() {
        let registry = MessageBoxRegistry::new();
        let (label, rx) = registry.register();

        assert!(on_window_destroyed(&registry, &label));
        assert!(!registry.is_pending(&label));
        assert!(!wait_for_answer(&rx, || true));
    }

    #[test]
    fn destroyed_window_after_answer_keeps_the_answer() {
        let registry = MessageBoxRegistry::new();
        let (label, rx) = registry.register();

        assert!(deliver_answer(&registry, &label, true));
        assert!(!on_window_destroyed(&registry, &label));
        assert!(wait_for_answer(&rx, || false));
    }

    #[test]
    fn destroyed_main_window_is_not_a_message_box() {
        let registry = MessageBoxRegistry::new();
        assert!(!on_window_destroyed(&registry, "main"));
    }

    #[test]
    fn deliver_answer_reports_unknown_labels() {
        let registry = MessageBoxRegistry::new();
        assert!(!deliver_answer(&registry, "message-box-7", true));
    }

    #[test]
    fn answer_survives_a_failed_close() {
        let failed = Err(crate::error::Error::Effect("window already gone".to_string()));
        assert!(settle("message-box-0", true, failed));
        assert!(!settle("message-box-1", false, Ok(())));
    }

    #[test]
    fn forgotten_box_unblocks_waiter() {
        let registry = MessageBoxRegistry::new();
        let (label, rx) = registry.register();
        registry.forget(&label);
        assert!(!wait_for_answer(&rx, || true));
    }
}
