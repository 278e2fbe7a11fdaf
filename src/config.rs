use thiserror::Error;
use url::Url;

pub const API_TOKEN_VAR: &str = "WEBFLOW_API_TOKEN";
pub const COLLECTION_ID_VAR: &str = "WEBFLOW_COLLECTION_ID";
pub const CHANNEL_ID_VAR: &str = "YOUTUBE_CHANNEL_ID";
pub const API_BASE_VAR: &str = "WEBFLOW_API_BASE";
pub const FEED_BASE_VAR: &str = "YOUTUBE_FEED_BASE";

const DEFAULT_API_BASE: &str = "https://api.webflow.com/v2/";
const DEFAULT_FEED_BASE: &str = "https://www.youtube.com/feeds/videos.xml";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid URL in {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Everything a run needs from its environment, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_token: String,
    pub collection_id: String,
    pub channel_id: String,
    pub api_base: Url,
    pub feed_base: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_token = get(API_TOKEN_VAR);
        let collection_id = get(COLLECTION_ID_VAR);
        let channel_id = get(CHANNEL_ID_VAR);

        let (api_token, collection_id, channel_id) = match (api_token, collection_id, channel_id) {
            (Some(t), Some(c), Some(ch)) => (t, c, ch),
            (t, c, ch) => {
                let missing = [
                    (API_TOKEN_VAR, t.is_none()),
                    (COLLECTION_ID_VAR, c.is_none()),
                    (CHANNEL_ID_VAR, ch.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let api_base = parse_base(
            API_BASE_VAR,
            get(API_BASE_VAR).as_deref().unwrap_or(DEFAULT_API_BASE),
            true,
        )?;
        let feed_base = parse_base(
            FEED_BASE_VAR,
            get(FEED_BASE_VAR).as_deref().unwrap_or(DEFAULT_FEED_BASE),
            false,
        )?;

        Ok(Self {
            api_token,
            collection_id,
            channel_id,
            api_base,
            feed_base,
        })
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn parse_base(name: &'static str, raw: &str, directory: bool) -> Result<Url, ConfigError> {
    let raw = if directory && !raw.ends_with('/') {
        format!("{}/", raw)
    } else {
        raw.to_string()
    };
    Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_required_present() {
        let config = Config::from_lookup(lookup(&[
            (API_TOKEN_VAR, "tok"),
            (COLLECTION_ID_VAR, "col"),
            (CHANNEL_ID_VAR, "UC123"),
        ]))
        .unwrap();

        assert_eq!(config.api_token, "tok");
        assert_eq!(config.collection_id, "col");
        assert_eq!(config.channel_id, "UC123");
        assert_eq!(config.api_base.as_str(), "https://api.webflow.com/v2/");
        assert_eq!(
            config.feed_base.as_str(),
            "https://www.youtube.com/feeds/videos.xml"
        );
    }

    #[test]
    fn test_all_missing_reports_every_name() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![API_TOKEN_VAR, COLLECTION_ID_VAR, CHANNEL_ID_VAR])
        );
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[
            (API_TOKEN_VAR, "tok"),
            (COLLECTION_ID_VAR, "   "),
            (CHANNEL_ID_VAR, "UC123"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![COLLECTION_ID_VAR]));
    }

    #[test]
    fn test_api_base_gets_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            (API_TOKEN_VAR, "tok"),
            (COLLECTION_ID_VAR, "col"),
            (CHANNEL_ID_VAR, "UC123"),
            (API_BASE_VAR, "http://127.0.0.1:8080/v2"),
        ]))
        .unwrap();
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8080/v2/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Config::from_lookup(lookup(&[
            (API_TOKEN_VAR, "tok"),
            (COLLECTION_ID_VAR, "col"),
            (CHANNEL_ID_VAR, "UC123"),
            (FEED_BASE_VAR, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: FEED_BASE_VAR, .. }));
    }
}
