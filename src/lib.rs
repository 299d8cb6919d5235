//! A custom-drawn circular progress / loading indicator.
//!
//! The widget draws four layers every frame: an inner disc, a background
//! ring, a progress arc and an optional centered logo. A small time-driven
//! animator either spins the arc (loop mode) or grows it to a target
//! fraction (one-shot mode). The widget listens to its host's lifecycle and
//! stops animating when the host goes away.
//!
//! ```no_run
//! use circular_progress::{HostConfig, HostScreen, WidgetConfig};
//!
//! let widget = WidgetConfig::builder()
//!     .ring_width(10.0)
//!     .initial_progress_fraction(0.25)
//!     .animating_initially(true)
//!     .build();
//! HostScreen::new(HostConfig::builder().build(), widget).show().unwrap();
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod animation;
pub mod config;
pub mod host;
pub mod lifecycle;
pub mod render;
pub mod widget;

pub use animation::{Repeat, ValueAnimator};
pub use config::{ConfigError, LogoError, LogoSource, WidgetConfig};
pub use host::{HostConfig, HostScreen};
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecycleObserver};
pub use render::{Canvas, DrawCommand, RectF, Scene};
pub use widget::{AnimationMode, CircularProgressWidget, RenderState, WidgetCommand};

// ============================================================================
// COLOR
// ============================================================================

/// RGBA color used by every drawing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const LIGHT_GRAY: Color = Color::rgb(0xcc, 0xcc, 0xcc);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn opacity(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Parses `#RRGGBB` or `#AARRGGBB`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_argb_hex() {
        assert_eq!(Color::parse_hex("#ff0000"), Some(Color::RED));
        assert_eq!(
            Color::parse_hex("#80112233"),
            Some(Color::rgba(0x11, 0x22, 0x33, 0x80))
        );
        assert_eq!(Color::parse_hex("#00000000"), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Color::parse_hex("ff0000"), None);
        assert_eq!(Color::parse_hex("#fff"), None);
        assert_eq!(Color::parse_hex("#gg0000"), None);
    }
}
