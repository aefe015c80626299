use crate::geometry::Size;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PADDING: f64 = 3.0;
pub const DEFAULT_BOX_WIDTH: f64 = 240.0 + 2.0 * DEFAULT_PADDING;
pub const DEFAULT_BOX_HEIGHT: f64 = 135.0 + 2.0 * DEFAULT_PADDING;
pub const DEFAULT_MIN_SIZE: f64 = 0.8;
pub const DEFAULT_Y_OFFSET: f64 = -10.0;
pub const DEFAULT_DURATION: Duration = Duration::from_millis(200);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(25);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Title(String);

crate::impl_string_newtype!(Title);

impl Default for Title {
    fn default() -> Self {
        Self::new("No title")
    }
}

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct TileUrl(String);

crate::impl_string_newtype!(TileUrl);

/// One entry of the carousel, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub title: Title,
    pub thumb: Option<PathBuf>,
    pub url: TileUrl,
}

impl Element {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Title::new(title),
            thumb: None,
            url: TileUrl::new(url),
        }
    }

    pub fn with_thumb(mut self, thumb: impl Into<PathBuf>) -> Self {
        self.thumb = Some(thumb.into());
        self
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    #[serde(rename = "duration_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
    #[serde(rename = "interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
    /// Copy the exact target into each tile once a transition ends, instead of
    /// leaving it where the accumulated steps landed.
    pub snap_on_finish: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            interval: DEFAULT_INTERVAL,
            snap_on_finish: false,
        }
    }
}

impl AnimationSettings {
    /// Number of ticks in one transition, never less than one.
    pub fn steps(&self) -> u32 {
        self.duration
            .as_millis()
            .checked_div(self.interval.as_millis())
            .map_or(1, |steps| u32::try_from(steps).unwrap_or(u32::MAX))
            .max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub padding: f64,
    pub box_width: f64,
    pub box_height: f64,
    /// How much a maximally distant tile shrinks, in `0..=1`.
    pub min_size: f64,
    pub y_offset: f64,
    /// Initially selected element; the middle one when unset.
    pub selected: Option<usize>,
    pub animation: AnimationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            box_width: DEFAULT_BOX_WIDTH,
            box_height: DEFAULT_BOX_HEIGHT,
            min_size: DEFAULT_MIN_SIZE,
            y_offset: DEFAULT_Y_OFFSET,
            selected: None,
            animation: AnimationSettings::default(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("min_size must be within 0..=1, got {0}")]
    MinSizeOutOfRange(f64),
    #[error("animation interval must be greater than zero")]
    ZeroInterval,
    #[error("tile size must be positive, got {width}x{height}")]
    InvalidBoxSize { width: f64, height: f64 },
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.min_size) {
            return Err(SettingsError::MinSizeOutOfRange(self.min_size));
        }
        if self.animation.interval.is_zero() {
            return Err(SettingsError::ZeroInterval);
        }
        if !(self.box_width > 0.0 && self.box_height > 0.0) {
            return Err(SettingsError::InvalidBoxSize {
                width: self.box_width,
                height: self.box_height,
            });
        }
        Ok(())
    }

    pub fn base_size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }

    pub fn initial_selection(&self, count: usize) -> usize {
        match self.selected {
            _ if count == 0 => 0,
            Some(index) => index.min(count - 1),
            None => count / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_overlay_defaults() {
        let json = r#"{ "min_size": 0.5, "animation": { "interval_ms": 10 } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.min_size, 0.5);
        assert_eq!(settings.box_width, DEFAULT_BOX_WIDTH);
        assert_eq!(settings.animation.interval, Duration::from_millis(10));
        assert_eq!(settings.animation.duration, DEFAULT_DURATION);
        assert!(!settings.animation.snap_on_finish);
        assert_eq!(settings.animation.steps(), 20);
    }

    #[test]
    fn test_element_defaults() {
        let element: Element = serde_json::from_str(r#"{ "url": "https://example.org" }"#).unwrap();
        assert_eq!(element.title.as_str(), "No title");
        assert_eq!(element.url.as_str(), "https://example.org");
        assert!(element.thumb.is_none());
    }

    #[test]
    fn test_steps_never_zero() {
        let mut animation = AnimationSettings::default();
        assert_eq!(animation.steps(), 8);

        animation.duration = Duration::ZERO;
        assert_eq!(animation.steps(), 1);

        animation.duration = Duration::from_millis(10);
        assert_eq!(animation.steps(), 1);

        animation.duration = Duration::from_millis(210);
        assert_eq!(animation.steps(), 8);
    }

    #[test]
    fn test_initial_selection() {
        let mut settings = Settings::default();
        assert_eq!(settings.initial_selection(5), 2);
        assert_eq!(settings.initial_selection(4), 2);
        assert_eq!(settings.initial_selection(0), 0);

        settings.selected = Some(9);
        assert_eq!(settings.initial_selection(5), 4);

        settings.selected = Some(1);
        assert_eq!(settings.initial_selection(5), 1);
    }

    #[test]
    fn test_validate() {
        assert!(Settings::default().validate().is_ok());

        let settings = Settings {
            min_size: 1.5,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::MinSizeOutOfRange(1.5))
        );

        let mut settings = Settings::default();
        settings.animation.interval = Duration::ZERO;
        assert_eq!(settings.validate(), Err(SettingsError::ZeroInterval));

        let settings = Settings {
            box_height: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidBoxSize { .. })
        ));
    }
}
