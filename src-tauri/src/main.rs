#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use anyhow::{Context, Result};
use fluent_webview::app_log::setup_logger;
use fluent_webview::{Config, FluentHandle, FluentWebView, MessageBox};

fn greet(handle: FluentHandle, greeting: String) {
    match handle.message_box(&MessageBox::new(greeting)) {
        Ok(accepted) => log::info!("Greeting closed (accepted: {})", accepted),
        Err(e) => log::error!("Failed to show greeting: {}", e),
    }
}

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    setup_logger(config.debug)?;

    let mut view = FluentWebView::from_config(&config);
    log::info!(
        "Starting `{}` with {} background",
        view.title(),
        view.background_type()
    );

    if let Some(greeting) = config.greeting.filter(|g| !g.trim().is_empty()) {
        view = view.on_startup(move |handle| greet(handle, greeting));
    }

    view.start(tauri::generate_context!())
        .context("error while running tauri application")?;
    Ok(())
}
