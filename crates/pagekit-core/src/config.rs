#![forbid(unsafe_code)]

//! Page contract configuration.
//!
//! Every selector, attribute name and tuning value the controllers use lives
//! here with the stock page's values as defaults. Hosts may override any
//! subset from JSON:
//!
//! ```
//! use pagekit_core::config::SiteConfig;
//!
//! let cfg = SiteConfig::from_json(r#"{ "lightbox": { "swipe_threshold_px": 60.0 } }"#).unwrap();
//! assert_eq!(cfg.lightbox.swipe_threshold_px, 60.0);
//! assert_eq!(cfg.nav.toggle, "#nav-toggle");
//! ```

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::selector::{Selector, SelectorError};

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document did not match the configuration schema.
    Json(serde_json::Error),
    /// A selector field did not parse.
    Selector {
        field: &'static str,
        source: SelectorError,
    },
    /// A numeric field is out of range.
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid configuration: {err}"),
            Self::Selector { field, source } => write!(f, "invalid selector `{field}`: {source}"),
            Self::InvalidValue { field, reason } => write!(f, "invalid value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Selector { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Parse a selector field, tagging failures with the field name.
pub(crate) fn compile(field: &'static str, source: &str) -> Result<Selector, ConfigError> {
    Selector::parse(source).map_err(|source| ConfigError::Selector { field, source })
}

/// Navigation menu hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub toggle: String,
    pub container: String,
    pub header: String,
    /// Links whose click closes the menu.
    pub links: String,
    /// Toggle markup while the menu is open.
    pub open_icon: String,
    /// Toggle markup while the menu is closed.
    pub closed_icon: String,
    /// How long the header keeps the `menu-opening` class.
    pub opening_guard_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle: "#nav-toggle".into(),
            container: "#site-navigation".into(),
            header: "header".into(),
            links: "nav a".into(),
            open_icon: r#"<i class="fa fa-times" aria-hidden="true"></i>"#.into(),
            closed_icon: r#"<i class="fa fa-bars" aria-hidden="true"></i>"#.into(),
            opening_guard_ms: 250,
        }
    }
}

impl NavConfig {
    #[must_use]
    pub const fn opening_guard(&self) -> Duration {
        Duration::from_millis(self.opening_guard_ms)
    }
}

/// Category filter hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub buttons: String,
    pub cards: String,
    pub category_attribute: String,
    /// Category value meaning "no filtering".
    pub all_category: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            buttons: ".filter-btn".into(),
            cards: ".event-card".into(),
            category_attribute: "data-type".into(),
            all_category: "all".into(),
        }
    }
}

/// Lightbox hooks. `container` and `image` are required; the rest optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    pub gallery_images: String,
    /// Attribute carrying the full-size image reference.
    pub full_attribute: String,
    pub container: String,
    pub image: String,
    pub close: String,
    pub content: String,
    pub backdrop: String,
    pub prev: String,
    pub next: String,
    /// Minimum horizontal travel (exclusive) for a swipe.
    pub swipe_threshold_px: f64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            gallery_images: ".gallery img".into(),
            full_attribute: "data-full".into(),
            container: "#lightbox".into(),
            image: "#lb-img".into(),
            close: "#lb-close".into(),
            content: ".lightbox-content".into(),
            backdrop: "#lb-backdrop".into(),
            prev: "#lb-prev".into(),
            next: "#lb-next".into(),
            swipe_threshold_px: 40.0,
        }
    }
}

/// Tap-to-reveal card hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    pub cards: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            cards: ".card".into(),
        }
    }
}

/// Full page configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub nav: NavConfig,
    pub filter: FilterConfig,
    pub lightbox: LightboxConfig,
    pub cards: CardConfig,
}

impl SiteConfig {
    /// Parse and validate a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every selector and numeric field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let selectors = [
            ("nav.toggle", &self.nav.toggle),
            ("nav.container", &self.nav.container),
            ("nav.header", &self.nav.header),
            ("nav.links", &self.nav.links),
            ("filter.buttons", &self.filter.buttons),
            ("filter.cards", &self.filter.cards),
            ("lightbox.gallery_images", &self.lightbox.gallery_images),
            ("lightbox.container", &self.lightbox.container),
            ("lightbox.image", &self.lightbox.image),
            ("lightbox.close", &self.lightbox.close),
            ("lightbox.content", &self.lightbox.content),
            ("lightbox.backdrop", &self.lightbox.backdrop),
            ("lightbox.prev", &self.lightbox.prev),
            ("lightbox.next", &self.lightbox.next),
            ("cards.cards", &self.cards.cards),
        ];
        for (field, source) in selectors {
            compile(field, source)?;
        }

        let threshold = self.lightbox.swipe_threshold_px;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "lightbox.swipe_threshold_px",
                reason: "must be a finite, non-negative number",
            });
        }
        if self.filter.category_attribute.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "filter.category_attribute",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
