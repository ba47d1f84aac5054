//! Host detection: operating system, Windows build, KDE blur support and the
//! system dark mode.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// First Windows build that ships the Mica backdrop (Windows 11 21H2).
pub const WINDOWS_11_BUILD: u32 = 22000;

const XPROP: &str = "xprop";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Os {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }
}

/// Everything background resolution depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Environment {
    pub os: Os,
    /// Windows build number, `None` off Windows or when it could not be read.
    pub windows_build: Option<u32>,
    /// `xprop` is on `PATH` and the session runs KDE.
    pub kde_blur: bool,
    pub dark: bool,
}

impl Environment {
    pub fn detect() -> Self {
        let os = Os::current();
        let env = Self {
            os,
            windows_build: windows_build(),
            kde_blur: os == Os::Linux && kde_blur_available(),
            dark: is_dark(),
        };
        log::debug!("Detected environment: {:?}", env);
        env
    }

    pub fn supports_mica(&self) -> bool {
        self.os == Os::Windows
            && self
                .windows_build
                .is_some_and(|build| build >= WINDOWS_11_BUILD)
    }
}

/// Whether the system theme is dark. Unknown counts as light.
pub fn is_dark() -> bool {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => true,
        Ok(_) => false,
        Err(e) => {
            log::debug!("Dark mode detection failed: {:?}", e);
            false
        }
    }
}

pub fn kde_blur_available() -> bool {
    is_kde_session(std::env::var_os("XDG_CURRENT_DESKTOP").as_deref())
        && find_in_path(XPROP).is_some()
}

fn is_kde_session(desktop: Option<&OsStr>) -> bool {
    desktop.is_some_and(|d| d == "KDE")
}

/// Looks `program` up in the directories listed in `PATH`.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    find_in_dirs(program, std::env::split_paths(&paths))
}

fn find_in_dirs<I>(program: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        vec![dir.join(program), dir.join(format!("{program}.exe"))]
    }
    #[cfg(not(target_os = "windows"))]
    {
        vec![dir.join(program)]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(target_os = "windows")]
fn windows_build() -> Option<u32> {
    use windows::Wdk::System::SystemServices::RtlGetVersion;
    use windows::Win32::System::SystemInformation::OSVERSIONINFOW;

    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };
    // RtlGetVersion is not subject to the manifest based version lie of GetVersionEx.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status.is_ok() {
        Some(info.dwBuildNumber)
    } else {
        log::warn!("RtlGetVersion failed: {:?}", status);
        None
    }
}

#[cfg(not(target_os = "windows"))]
fn windows_build() -> Option<u32> {
    None
}
