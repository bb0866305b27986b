use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_API_URL: &str = "GROCER_API_URL";
const ENV_TIMEOUT: &str = "GROCER_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
}

/// Values read from `<config dir>/config.toml`.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Resolve settings with precedence: command-line flag, environment,
    /// config file, built-in default.
    pub fn load(api_url_flag: Option<String>) -> Result<Self> {
        let file = match config_file_path() {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => FileSettings::default(),
        };
        Self::resolve(
            api_url_flag,
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_TIMEOUT).ok(),
            file,
        )
    }

    fn resolve(
        api_url_flag: Option<String>,
        env_api_url: Option<String>,
        env_timeout: Option<String>,
        file: FileSettings,
    ) -> Result<Self> {
        let api_url = api_url_flag
            .or(env_api_url)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_url(&api_url)?;

        let timeout_secs = match env_timeout {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("Invalid {ENV_TIMEOUT} '{raw}'. Use a whole number of seconds")
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            bail!("Timeout must be greater than 0 seconds");
        }

        Ok(Config {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "grocer").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<FileSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn parse_config(text: &str) -> Result<FileSettings> {
    Ok(toml::from_str(text)?)
}

fn normalize_url(raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("Invalid API URL '{raw}'. It must start with http:// or https://");
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(None, None, None, FileSettings::default()).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_precedence() {
        let file = FileSettings {
            api_url: Some("http://file:1".to_string()),
            timeout_secs: Some(30),
        };
        let config = Config::resolve(
            Some("http://flag:3/".to_string()),
            Some("http://env:2".to_string()),
            None,
            file,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://flag:3");
        assert_eq!(config.timeout, Duration::from_secs(30));

        let file = FileSettings {
            api_url: Some("http://file:1".to_string()),
            timeout_secs: None,
        };
        let config =
            Config::resolve(None, Some("http://env:2".to_string()), Some("5".to_string()), file)
                .unwrap();
        assert_eq!(config.api_url, "http://env:2");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values() {
        assert!(
            Config::resolve(Some("localhost:8080".to_string()), None, None, FileSettings::default())
                .is_err()
        );
        assert!(Config::resolve(None, None, Some("soon".to_string()), FileSettings::default()).is_err());
        assert!(Config::resolve(None, None, Some("0".to_string()), FileSettings::default()).is_err());
    }

    #[test]
    fn test_parse_config() {
        let text = "# grocer settings\napi_url = \"http://192.168.1.20:8080/\"\n\ntimeout_secs = 15\n";
        let settings = parse_config(text).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("http://192.168.1.20:8080/"));
        assert_eq!(settings.timeout_secs, Some(15));

        let settings = parse_config("api_url = \"http://pantry.local/?a=b#frag\"").unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("http://pantry.local/?a=b#frag"));

        assert_eq!(parse_config("").unwrap(), FileSettings::default());
        assert!(parse_config("api_url http://x").is_err());
        assert!(parse_config("color = \"blue\"").is_err());
        assert!(parse_config("timeout_secs = \"15\"").is_err());
        assert!(parse_config("api_url = http://unquoted").is_err());
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://groceries.example.com\"\ntimeout_secs = 20\n",
        )
        .unwrap();
        let settings = read_config_file(&path).unwrap();
        let config = Config::resolve(None, None, None, settings).unwrap();
        assert_eq!(config.api_url, "https://groceries.example.com");
        assert_eq!(config.timeout, Duration::from_secs(20));

        std::fs::write(&path, "timeout = 20\n").unwrap();
        let err = read_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));

        assert!(read_config_file(&dir.path().join("missing")).is_err());
    }
}
