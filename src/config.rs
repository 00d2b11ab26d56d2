//! Countdown configuration.
//!
//! Configuration comes in two shapes:
//!
//! - [`Options`]: what the caller supplied. Every field is optional, and it
//!   can be built from [`CountdownOption`]s or parsed from a JSON object.
//! - [`Config`]: the fully resolved settings a widget is built from.
//!
//! [`merge`] resolves options against a set of defaults, normally
//! [`DEFAULTS`]. Neither input is modified.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::config::{merge, with_color, Options, DEFAULTS};
//!
//! let options = Options::from_opts(&[with_color("#0f0")]);
//! let config = merge(&options, &DEFAULTS);
//!
//! assert_eq!(config.size, 300);
//! assert_eq!(config.color, "#0f0");
//! assert_eq!(config.border_color, "#000");
//! assert_eq!(config.border_width, 3.0);
//! assert_eq!(config.class_name, "timer_canvas");
//! assert_eq!(DEFAULTS.color, "#f00");
//! ```

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

/// Built-in defaults. Never mutated; merge options into a copy instead.
pub static DEFAULTS: Lazy<Config> = Lazy::new(|| Config {
    size: 300,
    color: "#f00".to_string(),
    border_color: "#000".to_string(),
    border_width: 3.0,
    id: None,
    class_name: "timer_canvas".to_string(),
});

/// Errors reported by [`Config::validate`] and [`Options::from_json`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The surface would have no pixels.
    #[error("size must be greater than zero")]
    ZeroSize,
    /// Negative, NaN or infinite border width.
    #[error("border width must be a finite, non-negative number, got {0}")]
    InvalidBorderWidth(f64),
    /// The border leaves no room for the pie.
    #[error("border width {border_width} leaves no room for a pie of size {size}")]
    BorderTooWide {
        /// Requested border width.
        border_width: f64,
        /// Requested surface size.
        size: u32,
    },
    /// A color option was set to an empty string.
    #[error("{0} must not be empty")]
    EmptyColor(&'static str),
    /// The JSON options object could not be parsed.
    #[error("failed to parse options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolved widget settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Width and height of the square surface, in pixels.
    pub size: u32,
    /// Fill color of the pie.
    pub color: String,
    /// Stroke color of the pie outline.
    pub border_color: String,
    /// Stroke width of the pie outline, in pixels.
    pub border_width: f64,
    /// Widget label. A random one is generated at construction when `None`.
    pub id: Option<String>,
    /// Class name handed to hosts that embed the surface in a document.
    pub class_name: String,
}

impl Default for Config {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

impl Config {
    /// Checks that the configuration describes a drawable pie.
    ///
    /// ```rust
    /// use bubbletea_countdown::config::{Config, ConfigError};
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.size = 0;
    /// assert!(matches!(config.validate(), Err(ConfigError::ZeroSize)));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ConfigError::InvalidBorderWidth(self.border_width));
        }
        if self.border_width >= f64::from(self.size) / 2.0 {
            return Err(ConfigError::BorderTooWide {
                border_width: self.border_width,
                size: self.size,
            });
        }
        if self.color.is_empty() {
            return Err(ConfigError::EmptyColor("color"));
        }
        if self.border_color.is_empty() {
            return Err(ConfigError::EmptyColor("border color"));
        }
        Ok(())
    }
}

/// Caller-supplied settings. Unset fields fall back to the defaults.
///
/// Deserializes from the camelCase object hosts traditionally pass
/// (`size`, `color`, `borderColor`, `borderWidth`, `id`, `className`).
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Surface size in pixels.
    pub size: Option<u32>,
    /// Fill color.
    pub color: Option<String>,
    /// Outline color.
    pub border_color: Option<String>,
    /// Outline width.
    pub border_width: Option<f64>,
    /// Widget label.
    pub id: Option<String>,
    /// Class name for embedding hosts.
    pub class_name: Option<String>,
}

impl Options {
    /// Collects a list of [`CountdownOption`]s. Later options win.
    pub fn from_opts(opts: &[CountdownOption]) -> Self {
        let mut options = Options::default();
        for opt in opts {
            opt.apply(&mut options);
        }
        options
    }

    /// Parses a JSON options object.
    ///
    /// ```rust
    /// use bubbletea_countdown::config::Options;
    ///
    /// let options = Options::from_json(r#"{"borderWidth": 10, "unknown": true}"#).unwrap();
    /// assert_eq!(options.border_width, Some(10.0));
    /// assert_eq!(options.color, None);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Merges `options` over `defaults` into a new [`Config`].
///
/// Set options override defaults; unset ones keep the default. Both inputs
/// are borrowed and left untouched.
pub fn merge(options: &Options, defaults: &Config) -> Config {
    Config {
        size: options.size.unwrap_or(defaults.size),
        color: options
            .color
            .clone()
            .unwrap_or_else(|| defaults.color.clone()),
        border_color: options
            .border_color
            .clone()
            .unwrap_or_else(|| defaults.border_color.clone()),
        border_width: options.border_width.unwrap_or(defaults.border_width),
        id: options.id.clone().or_else(|| defaults.id.clone()),
        class_name: options
            .class_name
            .clone()
            .unwrap_or_else(|| defaults.class_name.clone()),
    }
}

/// Configuration options for [`crate::countdown::new`].
pub enum CountdownOption {
    /// Sets the surface size in pixels.
    WithSize(u32),
    /// Sets the fill color.
    WithColor(String),
    /// Sets the outline color.
    WithBorderColor(String),
    /// Sets the outline width.
    WithBorderWidth(f64),
    /// Sets the widget label.
    WithId(String),
    /// Sets the class name.
    WithClassName(String),
}

impl CountdownOption {
    fn apply(&self, o: &mut Options) {
        match self {
            CountdownOption::WithSize(size) => o.size = Some(*size),
            CountdownOption::WithColor(color) => o.color = Some(color.clone()),
            CountdownOption::WithBorderColor(color) => o.border_color = Some(color.clone()),
            CountdownOption::WithBorderWidth(width) => o.border_width = Some(*width),
            CountdownOption::WithId(id) => o.id = Some(id.clone()),
            CountdownOption::WithClassName(name) => o.class_name = Some(name.clone()),
        }
    }
}

/// Sets the surface size in pixels.
pub fn with_size(size: u32) -> CountdownOption {
    CountdownOption::WithSize(size)
}

/// Sets the pie's fill color.
pub fn with_color(color: impl Into<String>) -> CountdownOption {
    CountdownOption::WithColor(color.into())
}

/// Sets the pie's outline color.
pub fn with_border_color(color: impl Into<String>) -> CountdownOption {
    CountdownOption::WithBorderColor(color.into())
}

/// Sets the pie's outline width in pixels.
pub fn with_border_width(width: f64) -> CountdownOption {
    CountdownOption::WithBorderWidth(width)
}

/// Sets the widget label instead of generating one.
pub fn with_id(id: impl Into<String>) -> CountdownOption {
    CountdownOption::WithId(id.into())
}

/// Sets the class name reported to embedding hosts.
pub fn with_class_name(name: impl Into<String>) -> CountdownOption {
    CountdownOption::WithClassName(name.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.size, 300);
        assert_eq!(config.color, "#f00");
        assert_eq!(config.border_color, "#000");
        assert_eq!(config.border_width, 3.0);
        assert_eq!(config.id, None);
        assert_eq!(config.class_name, "timer_canvas");
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let defaults_before = DEFAULTS.clone();
        let options = Options {
            color: Some("#0f0".to_string()),
            ..Options::default()
        };
        let options_before = options.clone();

        let merged = merge(&options, &DEFAULTS);

        assert_eq!(
            merged,
            Config {
                size: 300,
                color: "#0f0".to_string(),
                border_color: "#000".to_string(),
                border_width: 3.0,
                id: None,
                class_name: "timer_canvas".to_string(),
            }
        );
        assert_eq!(*DEFAULTS, defaults_before);
        assert_eq!(options, options_before);
    }

    #[test]
    fn test_merge_all_options() {
        let options = Options::from_opts(&[
            with_size(120),
            with_color("rgba(125, 70, 70, .3)"),
            with_border_color("#123"),
            with_border_width(10.0),
            with_id("kitchen"),
            with_class_name("pie"),
        ]);
        let merged = merge(&options, &DEFAULTS);

        assert_eq!(merged.size, 120);
        assert_eq!(merged.color, "rgba(125, 70, 70, .3)");
        assert_eq!(merged.border_color, "#123");
        assert_eq!(merged.border_width, 10.0);
        assert_eq!(merged.id.as_deref(), Some("kitchen"));
        assert_eq!(merged.class_name, "pie");
    }

    #[test]
    fn test_later_options_win() {
        let options = Options::from_opts(&[with_size(10), with_size(20)]);
        assert_eq!(options.size, Some(20));
    }

    #[test]
    fn test_from_json_ignores_unknown_keys() {
        let options = Options::from_json(
            r##"{"size": 64, "borderColor": "#fff", "className": "x", "shadow": "none"}"##,
        )
        .unwrap();

        assert_eq!(options.size, Some(64));
        assert_eq!(options.border_color.as_deref(), Some("#fff"));
        assert_eq!(options.class_name.as_deref(), Some("x"));
        assert_eq!(options.color, None);
        assert_eq!(options.id, None);
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let err = Options::from_json(r#"{"size": "big"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("failed to parse options"));
    }

    #[test]
    fn test_validate() {
        assert!(DEFAULTS.validate().is_ok());

        let bad = |f: fn(&mut Config)| {
            let mut c = Config::default();
            f(&mut c);
            c.validate()
        };

        assert!(matches!(bad(|c| c.size = 0), Err(ConfigError::ZeroSize)));
        assert!(matches!(
            bad(|c| c.border_width = -1.0),
            Err(ConfigError::InvalidBorderWidth(_))
        ));
        assert!(matches!(
            bad(|c| c.border_width = f64::NAN),
            Err(ConfigError::InvalidBorderWidth(_))
        ));
        assert!(matches!(
            bad(|c| c.border_width = 150.0),
            Err(ConfigError::BorderTooWide { size: 300, .. })
        ));
        assert!(matches!(
            bad(|c| c.color.clear()),
            Err(ConfigError::EmptyColor("color"))
        ));
        assert!(matches!(
            bad(|c| c.border_color.clear()),
            Err(ConfigError::EmptyColor("border color"))
        ));
        assert!(bad(|c| c.border_width = 0.0).is_ok());
    }
}
