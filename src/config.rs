use crate::Color;
use bon::Builder;
use image::RgbaImage;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read style sheet {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed style sheet: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid color for `{key}`: {value:?} (expected #RRGGBB or #AARRGGBB)")]
    InvalidColor { key: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("failed to read logo {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode logo: {0}")]
    Decode(#[from] image::ImageError),
}

// ============================================================================
// LOGO
// ============================================================================

/// Where the centered logo comes from.
#[derive(Debug, Clone)]
pub enum LogoSource {
    File(PathBuf),
    Memory(Vec<u8>),
    Image(RgbaImage),
}

impl LogoSource {
    /// Decodes the source into an RGBA bitmap.
    pub fn resolve(&self) -> Result<RgbaImage, LogoError> {
        match self {
            LogoSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| LogoError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(image::load_from_memory(&bytes)?.to_rgba8())
            }
            LogoSource::Memory(bytes) => Ok(image::load_from_memory(bytes)?.to_rgba8()),
            LogoSource::Image(image) => Ok(image.clone()),
        }
    }
}

// ============================================================================
// WIDGET CONFIGURATION
// ============================================================================

/// Immutable inputs of a [`crate::CircularProgressWidget`].
#[derive(Debug, Clone, Builder)]
pub struct WidgetConfig {
    /// Stroke width of both rings; also insets the bounding rect.
    #[builder(default = 0.0)]
    pub ring_width: f32,
    #[builder(default = Color::TRANSPARENT)]
    pub inner_circle_color: Color,
    #[builder(default = Color::LIGHT_GRAY)]
    pub ring_background_color: Color,
    #[builder(default = Color::RED)]
    pub progress_ring_color: Color,

    /// Clamped to `[0, 1]` by the widget.
    #[builder(default = 0.25)]
    pub initial_progress_fraction: f32,
    /// 0° is 3 o'clock, positive is clockwise. -90° is 12 o'clock.
    #[builder(default = -90.0)]
    pub progress_start_angle_degrees: f32,

    pub logo: Option<LogoSource>,
    #[builder(default = 0.0)]
    pub logo_margin_border: f32,

    #[builder(default = true)]
    pub auto_rotate: bool,
    #[builder(default = false)]
    pub animating_initially: bool,

    /// Period of both the loop and the one-shot animation.
    #[builder(default = Duration::from_millis(1000))]
    pub animation_duration: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WidgetConfig {
    /// Reads a TOML style sheet from disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses a TOML style sheet. Missing keys keep their defaults.
    ///
    /// ```toml
    /// ring_width = 10.0
    /// progress_ring_color = "#ff3366"
    /// logo = "assets/logo.png"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let sheet: StyleSheet = toml::from_str(text)?;
        sheet.into_config()
    }
}

// ============================================================================
// STYLE SHEETS
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleSheet {
    ring_width: Option<f32>,
    inner_circle_color: Option<String>,
    ring_background_color: Option<String>,
    progress_ring_color: Option<String>,
    progress_fraction: Option<f32>,
    progress_start_angle: Option<f32>,
    logo: Option<PathBuf>,
    logo_margin: Option<f32>,
    auto_rotate: Option<bool>,
    animating: Option<bool>,
    animation_duration_ms: Option<u64>,
}

fn parse_color(key: &'static str, value: Option<String>) -> Result<Option<Color>, ConfigError> {
    value
        .map(|value| Color::parse_hex(&value).ok_or(ConfigError::InvalidColor { key, value }))
        .transpose()
}

impl StyleSheet {
    fn into_config(self) -> Result<WidgetConfig, ConfigError> {
        let inner = parse_color("inner_circle_color", self.inner_circle_color)?;
        let background = parse_color("ring_background_color", self.ring_background_color)?;
        let progress = parse_color("progress_ring_color", self.progress_ring_color)?;

        Ok(WidgetConfig::builder()
            .maybe_ring_width(self.ring_width)
            .maybe_inner_circle_color(inner)
            .maybe_ring_background_color(background)
            .maybe_progress_ring_color(progress)
            .maybe_initial_progress_fraction(self.progress_fraction)
            .maybe_progress_start_angle_degrees(self.progress_start_angle)
            .maybe_logo(self.logo.map(LogoSource::File))
            .maybe_logo_margin_border(self.logo_margin)
            .maybe_auto_rotate(self.auto_rotate)
            .maybe_animating_initially(self.animating)
            .maybe_animation_duration(self.animation_duration_ms.map(Duration::from_millis))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_attribute_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.ring_width, 0.0);
        assert_eq!(config.inner_circle_color, Color::TRANSPARENT);
        assert_eq!(config.ring_background_color, Color::LIGHT_GRAY);
        assert_eq!(config.progress_ring_color, Color::RED);
        assert_eq!(config.initial_progress_fraction, 0.25);
        assert_eq!(config.progress_start_angle_degrees, -90.0);
        assert!(config.logo.is_none());
        assert!(config.auto_rotate);
        assert!(!config.animating_initially);
        assert_eq!(config.animation_duration, Duration::from_millis(1000));
    }

    #[test]
    fn style_sheet_overrides_selected_keys() {
        let config = WidgetConfig::from_toml_str(
            r##"
            ring_width = 12.5
            progress_ring_color = "#3366ff"
            inner_circle_color = "#80000000"
            progress_fraction = 0.6
            animating = true
            animation_duration_ms = 250
            "##,
        )
        .unwrap();

        assert_eq!(config.ring_width, 12.5);
        assert_eq!(config.progress_ring_color, Color::rgb(0x33, 0x66, 0xff));
        assert_eq!(config.inner_circle_color, Color::rgba(0, 0, 0, 0x80));
        assert_eq!(config.ring_background_color, Color::LIGHT_GRAY);
        assert_eq!(config.initial_progress_fraction, 0.6);
        assert!(config.animating_initially);
        assert_eq!(config.animation_duration, Duration::from_millis(250));
    }

    #[test]
    fn style_sheet_logo_is_a_file_source() {
        let config = WidgetConfig::from_toml_str(r#"logo = "logo.png""#).unwrap();
        assert!(matches!(config.logo, Some(LogoSource::File(ref p)) if p == Path::new("logo.png")));
    }

    #[test]
    fn bad_color_is_reported_with_its_key() {
        let err = WidgetConfig::from_toml_str(r#"ring_background_color = "grey""#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidColor { key: "ring_background_color", .. }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WidgetConfig::from_toml_str("ring_colour = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_logo_file_is_an_io_error() {
        let source = LogoSource::File(PathBuf::from("/definitely/not/here.png"));
        assert!(matches!(source.resolve(), Err(LogoError::Io { .. })));
    }

    #[test]
    fn garbage_logo_bytes_fail_to_decode() {
        let source = LogoSource::Memory(vec![0, 1, 2, 3]);
        assert!(matches!(source.resolve(), Err(LogoError::Decode(_))));
    }
}
