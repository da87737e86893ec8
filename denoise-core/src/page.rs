use serde::Deserialize;
use std::fmt;

/// Per-page settings the server injects as `window.DEMO`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub sample_name: String,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub default_model: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing,
    Parse(serde_json::Error),
    EmptySampleName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing => write!(f, "page config (window.DEMO) is not defined"),
            ConfigError::Parse(e) => write!(f, "page config is malformed: {e}"),
            ConfigError::EmptySampleName => write!(f, "page config has an empty sampleName"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: PageConfig = serde_json::from_str(json)?;
        if cfg.sample_name.trim().is_empty() {
            return Err(ConfigError::EmptySampleName);
        }
        Ok(cfg)
    }

    /// Model selected on load: the explicit default, else the first listed
    /// model, else none.
    pub fn initial_model(&self) -> String {
        if !self.default_model.is_empty() {
            return self.default_model.clone();
        }
        self.models.first().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = PageConfig::from_json(
            r#"{"sampleName":"fan.wav","models":["a.eim","b.eim"],"defaultModel":"b.eim"}"#,
        )
        .unwrap();
        assert_eq!(cfg.sample_name, "fan.wav");
        assert_eq!(cfg.models.len(), 2);
        assert_eq!(cfg.initial_model(), "b.eim");
    }

    #[test]
    fn test_initial_model_fallbacks() {
        let cfg = PageConfig::from_json(r#"{"sampleName":"fan.wav","models":["a.eim"]}"#).unwrap();
        assert_eq!(cfg.initial_model(), "a.eim");
        let cfg = PageConfig::from_json(r#"{"sampleName":"fan.wav"}"#).unwrap();
        assert_eq!(cfg.initial_model(), "");
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            PageConfig::from_json(r#"{"sampleName":"  "}"#),
            Err(ConfigError::EmptySampleName)
        ));
        assert!(matches!(PageConfig::from_json("{}"), Err(ConfigError::Parse(_))));
    }
}
