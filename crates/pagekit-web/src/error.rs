#![forbid(unsafe_code)]

use core::fmt;

use pagekit_core::ConfigError;

/// Web frontend error type.
#[derive(Debug)]
pub enum WebError {
    /// Configuration JSON or selectors were rejected.
    Config(ConfigError),
    /// A global (`window`, `document`, `performance`) is unavailable.
    MissingGlobal(&'static str),
    /// `addEventListener` threw.
    Listener { kind: &'static str, message: String },
    /// Generic unsupported operation (e.g. mounting outside a browser).
    Unsupported(&'static str),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::MissingGlobal(name) => write!(f, "no global `{name}` available"),
            Self::Listener { kind, message } => {
                write!(f, "failed to register `{kind}` listener: {message}")
            }
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Parse optional JSON options into a validated configuration.
pub fn parse_options(options: Option<&str>) -> Result<pagekit_core::SiteConfig, WebError> {
    match options.map(str::trim) {
        None | Some("") => Ok(pagekit_core::SiteConfig::default()),
        Some(json) => Ok(pagekit_core::SiteConfig::from_json(json)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_options_use_defaults() {
        assert_eq!(parse_options(None).unwrap(), pagekit_core::SiteConfig::default());
        assert_eq!(parse_options(Some("  ")).unwrap(), pagekit_core::SiteConfig::default());
    }

    #[test]
    fn config_errors_keep_their_source() {
        let err = parse_options(Some(r#"{ "cards": { "cards": "" } }"#)).unwrap_err();
        assert_eq!(err.to_string(), "invalid selector `cards.cards`: empty selector");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn listener_error_display() {
        let err = WebError::Listener {
            kind: "touchstart",
            message: "TypeError".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to register `touchstart` listener: TypeError"
        );
    }
}
