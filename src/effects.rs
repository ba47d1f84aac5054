//! Applies a resolved [`BackgroundType`] to a window.

use std::process::{Command, Stdio};
use std::time::Duration;

use tauri::WebviewWindow;

use crate::background::BackgroundType;
use crate::error::{Error, Result};
use crate::script;

/// `0x00FFFFFF` gradient: white tint, fully transparent.
pub const ACRYLIC_TINT: (u8, u8, u8, u8) = (255, 255, 255, 0);

pub const KDE_BLUR_ATTEMPTS: u32 = 50;
pub const KDE_BLUR_RETRY_DELAY: Duration = Duration::from_millis(100);

const KDE_BLUR_PROPERTY: &str = "_KDE_NET_WM_BLUR_BEHIND_REGION";

pub fn apply(window: &WebviewWindow, background: BackgroundType, title: &str) -> Result<()> {
    log::info!("Applying {} background to `{}`", background, window.label());
    match background {
        BackgroundType::Acrylic => apply_acrylic(window, title),
        BackgroundType::MicaLight => apply_mica(window, false),
        BackgroundType::MicaDark => apply_mica(window, true),
        // Painted by the page script installed at window creation.
        BackgroundType::FakeMicaLight | BackgroundType::FakeMicaDark => Ok(()),
        BackgroundType::AutoAcrylic | BackgroundType::AutoMica => Err(Error::Effect(format!(
            "background `{}` must be resolved before it is applied",
            background
        ))),
    }
}

/// Page script for the fake Mica variants, run on every page load.
pub fn fake_mica_script(background: BackgroundType) -> Option<String> {
    background
        .fake_mica_css()
        .map(|css| script::on_dom_ready(&script::body_background(css)))
}

#[cfg(target_os = "windows")]
fn apply_acrylic(window: &WebviewWindow, _title: &str) -> Result<()> {
    log::info!("Setting blur effect for Windows 10+");
    window_vibrancy::apply_acrylic(window, Some(ACRYLIC_TINT))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn apply_acrylic(window: &WebviewWindow, _title: &str) -> Result<()> {
    use window_vibrancy::{apply_vibrancy, NSVisualEffectMaterial};

    apply_vibrancy(window, NSVisualEffectMaterial::HudWindow, None, None)?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn apply_acrylic(_window: &WebviewWindow, title: &str) -> Result<()> {
    if !crate::platform::kde_blur_available() {
        log::warn!("Compositor blur needs KDE and xprop, window stays plain transparent");
        return Ok(());
    }
    log::info!("Setting blur effect for KDE");
    spawn_kde_blur(title.to_string());
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn apply_acrylic(_window: &WebviewWindow, _title: &str) -> Result<()> {
    log::warn!("Acrylic is not supported on this platform");
    Ok(())
}

/// `xprop` invocation asking KWin to blur everything behind the window named `title`.
pub fn kde_blur_command(title: &str) -> Command {
    let mut cmd = Command::new("xprop");
    cmd.args(["-f", KDE_BLUR_PROPERTY, "32c"])
        .args(["-set", KDE_BLUR_PROPERTY, "0"])
        .args(["-name", title])
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// The window may not be mapped yet when this runs, so xprop is retried until
/// it finds the window or the attempts run out.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn spawn_kde_blur(title: String) {
    std::thread::spawn(move || {
        for attempt in 1..=KDE_BLUR_ATTEMPTS {
            match kde_blur_command(&title).status() {
                Ok(status) if status.success() => {
                    log::info!("KDE blur applied after {} attempt(s)", attempt);
                    return;
                }
                Ok(status) => log::debug!("xprop exited with {}, retrying", status),
                Err(e) => {
                    log::warn!("Failed to run xprop: {}", e);
                    return;
                }
            }
            std::thread::sleep(KDE_BLUR_RETRY_DELAY);
        }
        log::warn!(
            "Gave up setting KDE blur on `{}` after {} attempts",
            title,
            KDE_BLUR_ATTEMPTS
        );
    });
}

#[cfg(target_os = "windows")]
fn apply_mica(window: &WebviewWindow, dark: bool) -> Result<()> {
    // Passing the theme also switches the title bar to the matching mode.
    window_vibrancy::apply_mica(window, Some(dark))?;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn apply_mica(_window: &WebviewWindow, _dark: bool) -> Result<()> {
    log::warn!("Mica is only available on Windows 11");
    Ok(())
}
