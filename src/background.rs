use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::platform::{Environment, Os};

const FAKE_MICA_LIGHT_CSS: &str =
    "#f3f3f3 radial-gradient(#eff4f9 75%, #f3f3f3 100%) no-repeat fixed";
const FAKE_MICA_DARK_CSS: &str =
    "#202020 radial-gradient(#1a1f35 25%, #202020 100%) no-repeat fixed";

/// Window background style.
///
/// The `Auto*` variants are placeholders: [`BackgroundType::resolve`] turns
/// them into a concrete style for the current host before anything is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    #[default]
    Acrylic,
    FakeMicaLight,
    FakeMicaDark,
    MicaLight,
    MicaDark,
    AutoAcrylic,
    AutoMica,
}

impl BackgroundType {
    pub const ALL: [BackgroundType; 7] = [
        BackgroundType::Acrylic,
        BackgroundType::FakeMicaLight,
        BackgroundType::FakeMicaDark,
        BackgroundType::MicaLight,
        BackgroundType::MicaDark,
        BackgroundType::AutoAcrylic,
        BackgroundType::AutoMica,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundType::Acrylic => "acrylic",
            BackgroundType::FakeMicaLight => "fake_mica_light",
            BackgroundType::FakeMicaDark => "fake_mica_dark",
            BackgroundType::MicaLight => "mica_light",
            BackgroundType::MicaDark => "mica_dark",
            BackgroundType::AutoAcrylic => "auto_acrylic",
            BackgroundType::AutoMica => "auto_mica",
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, BackgroundType::AutoAcrylic | BackgroundType::AutoMica)
    }

    /// Whether the window has to be created with a transparent surface.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            BackgroundType::Acrylic | BackgroundType::MicaLight | BackgroundType::MicaDark
        )
    }

    /// CSS `background` value painted by the fake Mica variants.
    pub fn fake_mica_css(self) -> Option<&'static str> {
        match self {
            BackgroundType::FakeMicaLight => Some(FAKE_MICA_LIGHT_CSS),
            BackgroundType::FakeMicaDark => Some(FAKE_MICA_DARK_CSS),
            _ => None,
        }
    }

    /// Picks a concrete background for `env`. Never returns an `Auto*` variant.
    pub fn resolve(self, env: &Environment) -> BackgroundType {
        match self {
            BackgroundType::AutoAcrylic => match env.os {
                Os::Windows | Os::MacOs => BackgroundType::Acrylic,
                Os::Linux if env.kde_blur => BackgroundType::Acrylic,
                _ => fake_mica(env.dark),
            },
            BackgroundType::AutoMica => {
                if env.supports_mica() {
                    if env.dark {
                        BackgroundType::MicaDark
                    } else {
                        BackgroundType::MicaLight
                    }
                } else {
                    fake_mica(env.dark)
                }
            }
            concrete => concrete,
        }
    }
}

fn fake_mica(dark: bool) -> BackgroundType {
    if dark {
        BackgroundType::FakeMicaDark
    } else {
        BackgroundType::FakeMicaLight
    }
}

impl fmt::Display for BackgroundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        BackgroundType::ALL
            .into_iter()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| Error::UnknownBackground(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(os: Os, windows_build: Option<u32>, kde_blur: bool, dark: bool) -> Environment {
        Environment {
            os,
            windows_build,
            kde_blur,
            dark,
        }
    }

    #[test]
    fn auto_acrylic_uses_native_blur_on_windows_and_macos() {
        for dark in [false, true] {
            assert_eq!(
                BackgroundType::AutoAcrylic.resolve(&env(Os::Windows, Some(19045), false, dark)),
                BackgroundType::Acrylic
            );
            assert_eq!(
                BackgroundType::AutoAcrylic.resolve(&env(Os::MacOs, None, false, dark)),
                BackgroundType::Acrylic
            );
        }
    }

    #[test]
    fn auto_acrylic_on_linux_depends_on_kde_blur() {
        assert_eq!(
            BackgroundType::AutoAcrylic.resolve(&env(Os::Linux, None, true, false)),
            BackgroundType::Acrylic
        );
        assert_eq!(
            BackgroundType::AutoAcrylic.resolve(&env(Os::Linux, None, false, false)),
            BackgroundType::FakeMicaLight
        );
        assert_eq!(
            BackgroundType::AutoAcrylic.resolve(&env(Os::Linux, None, false, true)),
            BackgroundType::FakeMicaDark
        );
        assert_eq!(
            BackgroundType::AutoAcrylic.resolve(&env(Os::Other, None, false, true)),
            BackgroundType::FakeMicaDark
        );
    }

    #[test]
    fn auto_mica_needs_windows_11() {
        assert_eq!(
            BackgroundType::AutoMica.resolve(&env(Os::Windows, Some(22621), false, true)),
            BackgroundType::MicaDark
        );
        assert_eq!(
            BackgroundType::AutoMica.resolve(&env(Os::Windows, Some(22000), false, false)),
            BackgroundType::MicaLight
        );
        assert_eq!(
            BackgroundType::AutoMica.resolve(&env(Os::Windows, Some(19045), false, true)),
            BackgroundType::FakeMicaDark
        );
        assert_eq!(
            BackgroundType::AutoMica.resolve(&env(Os::MacOs, None, false, false)),
            BackgroundType::FakeMicaLight
        );
        // KDE blur does not help Mica.
        assert_eq!(
            BackgroundType::AutoMica.resolve(&env(Os::Linux, None, true, false)),
            BackgroundType::FakeMicaLight
        );
    }

    #[test]
    fn resolution_never_yields_auto_and_keeps_concrete_types() {
        let hosts = [
            env(Os::Windows, Some(22631), false, true),
            env(Os::Windows, None, false, false),
            env(Os::MacOs, None, false, true),
            env(Os::Linux, None, true, false),
            env(Os::Other, None, false, false),
        ];
        for host in &hosts {
            for background in BackgroundType::ALL {
                let resolved = background.resolve(host);
                assert!(!resolved.is_auto(), "{background} -> {resolved} on {host:?}");
                if !background.is_auto() {
                    assert_eq!(resolved, background);
                }
            }
        }
    }

    #[test]
    fn transparency_and_css_follow_the_variant() {
        assert!(BackgroundType::Acrylic.is_transparent());
        assert!(BackgroundType::MicaDark.is_transparent());
        assert!(!BackgroundType::FakeMicaLight.is_transparent());

        assert_eq!(
            BackgroundType::FakeMicaDark.fake_mica_css(),
            Some("#202020 radial-gradient(#1a1f35 25%, #202020 100%) no-repeat fixed")
        );
        assert!(BackgroundType::FakeMicaLight
            .fake_mica_css()
            .is_some_and(|css| css.starts_with("#f3f3f3")));
        assert_eq!(BackgroundType::MicaLight.fake_mica_css(), None);
    }

    #[test]
    fn parses_wire_names_leniently() {
        assert_eq!(
            " Auto_Mica ".parse::<BackgroundType>().unwrap(),
            BackgroundType::AutoMica
        );
        assert_eq!(
            "fake_mica_dark".parse::<BackgroundType>().unwrap(),
            BackgroundType::FakeMicaDark
        );
        assert!(matches!(
            "blur".parse::<BackgroundType>(),
            Err(Error::UnknownBackground(name)) if name == "blur"
        ));
    }

    #[test]
    fn serde_uses_the_same_names_as_display() {
        for background in BackgroundType::ALL {
            let json = serde_json::to_string(&background).unwrap();
            assert_eq!(json, format!("\"{background}\""));
        }
        let parsed: BackgroundType = serde_json::from_str("\"mica_light\"").unwrap();
        assert_eq!(parsed, BackgroundType::MicaLight);
    }
}
