use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;

/// Target used for messages forwarded from the pages.
pub const FRONTEND_TARGET: &str = "frontend";

fn config_builder() -> ConfigBuilder {
    let mut builder = ConfigBuilder::new();
    // Keeps UTC timestamps when the local offset is unknown.
    let _ = builder.set_time_offset_to_local();
    builder
}

pub fn log_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("Failed to get exe path")?;
    let exe_dir = exe_path.parent().unwrap_or(std::path::Path::new("."));
    Ok(exe_dir.join("logs"))
}

/// Terminal logger plus `logs/backend.log` and `logs/frontend.log` next to the
/// executable. `debug` lowers the terminal level to `Debug`.
pub fn setup_logger(debug: bool) -> Result<()> {
    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir).context("Failed to create log dir")?;

    let backend_log_file =
        File::create(log_dir.join("backend.log")).context("Failed to create backend log file")?;
    let frontend_log_file =
        File::create(log_dir.join("frontend.log")).context("Failed to create frontend log file")?;

    // Backend config: ignore "frontend" target
    let backend_config = config_builder()
        .add_filter_ignore_str(FRONTEND_TARGET)
        .add_filter_ignore_str("tao")
        .add_filter_ignore_str("wry")
        .build();

    // Frontend config: allow ONLY "frontend" target
    let frontend_config = config_builder()
        .add_filter_allow_str(FRONTEND_TARGET)
        .build();

    let term_config = config_builder()
        .add_filter_ignore_str("tao")
        .add_filter_ignore_str("wry")
        .build();

    let term_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    loggers.push(TermLogger::new(
        term_level,
        term_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    loggers.push(WriteLogger::new(
        LevelFilter::Debug,
        backend_config,
        backend_log_file,
    ));
    loggers.push(WriteLogger::new(
        LevelFilter::Debug,
        frontend_config,
        frontend_log_file,
    ));

    CombinedLogger::init(loggers).ok();
    log::info!("Logger initialized (debug: {})", debug);
    Ok(())
}

pub fn level_from_str(level: &str) -> log::Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => log::Level::Error,
        "warn" | "warning" => log::Level::Warn,
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        _ => log::Level::Info,
    }
}

#[tauri::command]
pub fn frontend_log(level: String, message: String) {
    log::log!(target: FRONTEND_TARGET, level_from_str(&level), "{}", message);
}
