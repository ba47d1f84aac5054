//! Fluent WebView
//!
//! A thin layer over a Tauri webview window that gives it a Windows 11 style
//! background (Mica, Acrylic, macOS vibrancy, KDE blur or a CSS imitation),
//! a helper to call JavaScript functions inside the page and an HTML based
//! modal message box.

#[path = "log.rs"]
pub mod app_log;
pub mod background;
pub mod config;
pub mod effects;
pub mod error;
pub mod message_box;
pub mod platform;
pub mod script;
pub mod webview;

pub use background::BackgroundType;
pub use config::Config;
pub use error::{Error, Result};
pub use message_box::MessageBox;
pub use platform::{Environment, Os};
pub use webview::{FluentHandle, FluentWebView};
