use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Sources used when none are given on the command line.
    pub files: Vec<PathBuf>,
    pub skip_unreadable: Option<bool>,
    pub top: Option<usize>,
    /// Extra or replacement status names, keyed by code.
    pub status_names: BTreeMap<String, String>,
}

impl Config {
    /// Status name overrides keyed by exactly three ASCII digits. Other keys
    /// are dropped with a warning.
    pub fn status_overrides(&self) -> Vec<(String, String)> {
        self.status_names
            .iter()
            .filter_map(|(code, name)| {
                if code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()) {
                    Some((code.clone(), name.clone()))
                } else {
                    warn!(code = %code, "ignoring status name for invalid code");
                    None
                }
            })
            .collect()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "logtally").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config. An explicit path must exist and parse; the default
/// location is optional and a broken file there only earns a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()));
    }

    let Some(path) = default_config_path() else {
        return Ok(Config::default());
    };

    let Ok(data) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };

    match toml::from_str(&data) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let config: Config = toml::from_str(
            r#"
files = ["api-dev-out.log", "logs/"]
skip_unreadable = true
top = 10

[status_names]
418 = "I'm a teapot"
"#,
        )
        .unwrap();

        assert_eq!(
            config.files,
            vec![PathBuf::from("api-dev-out.log"), PathBuf::from("logs/")]
        );
        assert_eq!(config.skip_unreadable, Some(true));
        assert_eq!(config.top, Some(10));
        assert_eq!(
            config.status_overrides(),
            vec![("418".to_string(), "I'm a teapot".to_string())]
        );
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_status_codes_are_dropped() {
        let config: Config = toml::from_str(
            r#"
[status_names]
abc = "nope"
42 = "too short"
"0999" = "too long"
"099" = "Odd"
503 = "Service Unavailable"
"#,
        )
        .unwrap();
        assert_eq!(
            config.status_overrides(),
            vec![
                ("099".to_string(), "Odd".to_string()),
                ("503".to_string(), "Service Unavailable".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("colour = true").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "top = 3\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().top, Some(3));
    }
}
