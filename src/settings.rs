use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::API_URL_VAR;
use crate::origin::{non_blank, EnvLocation, OriginSource, ORIGIN_VAR};

/// Client settings stored as TOML in the user's config directory.
///
/// Both values are optional: `api_url` overrides the base URL at run time,
/// `origin` stands in for the page location on hosts that have none.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl ClientSettings {
    /// Determine the settings file path in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("it", "WASAText", "wasatext-client")
            .context("Failed to get project directories")?;
        Ok(proj_dirs.config_dir().join("wasatext-client.toml"))
    }

    /// Load settings if present, otherwise return defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = toml::from_str(&s)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        Ok(settings)
    }

    /// Store `url` as the runtime base URL override. A blank value clears it.
    pub fn set_api_url(&mut self, url: &str) {
        self.api_url = non_blank(url);
    }

    /// Runtime base URL override: `flag`, then `WASATEXT_API_URL`, then the
    /// settings file. Blank candidates are skipped.
    pub fn runtime_api_url(&self, flag: Option<&str>) -> Option<String> {
        self.runtime_api_url_from(flag, API_URL_VAR)
    }

    fn runtime_api_url_from(&self, flag: Option<&str>, var: &str) -> Option<String> {
        flag.and_then(non_blank)
            .or_else(|| std::env::var(var).ok().as_deref().and_then(non_blank))
            .or_else(|| self.api_url.as_deref().and_then(non_blank))
    }

    /// Host location: `flag`, then `WASATEXT_ORIGIN`, then the settings file.
    pub fn origin_source(&self, flag: Option<&str>) -> impl OriginSource + Send + Sync + 'static {
        self.origin_source_from(flag, ORIGIN_VAR)
    }

    fn origin_source_from(&self, flag: Option<&str>, var: &str) -> impl OriginSource + Send + Sync + 'static {
        OriginSource::or(flag.map(str::to_string), EnvLocation::new(var)).or(self.origin.clone())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create settings directory: {}", dir.display()))?;
        }
        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_settings() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("wasatext-client.toml");

        let settings = ClientSettings {
            api_url: Some("http://api.example:3000".into()),
            origin: None,
        };
        settings.save(&path)?;
        assert!(path.exists());

        let loaded = ClientSettings::load(&path)?;
        assert_eq!(settings, loaded);

        dir.close()?;
        Ok(())
    }

    #[test]
    fn test_load_default_settings_if_not_exists() -> Result<()> {
        let dir = tempdir()?;
        let loaded = ClientSettings::load(&dir.path().join("missing.toml"))?;
        assert_eq!(loaded, ClientSettings::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wasatext-client.toml");
        fs::write(&path, "origin = \"http://localhost:5173/#/home\"\n")?;

        let loaded = ClientSettings::load(&path)?;
        assert_eq!(loaded.api_url, None);
        assert_eq!(loaded.origin.as_deref(), Some("http://localhost:5173/#/home"));
        Ok(())
    }

    fn with_urls(api_url: Option<&str>, origin: Option<&str>) -> ClientSettings {
        ClientSettings {
            api_url: api_url.map(Into::into),
            origin: origin.map(Into::into),
        }
    }

    #[test]
    fn test_api_url_flag_wins() {
        let var = "WASATEXT_API_URL_TEST_FLAG_WINS";
        std::env::set_var(var, "http://env.test");
        let s = with_urls(Some("http://settings.test"), None);
        assert_eq!(s.runtime_api_url_from(Some("http://flag.test"), var).as_deref(), Some("http://flag.test"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_api_url_env_before_settings() {
        let var = "WASATEXT_API_URL_TEST_ENV_BEFORE_SETTINGS";
        std::env::set_var(var, "http://env.test");
        let s = with_urls(Some("http://settings.test"), None);
        assert_eq!(s.runtime_api_url_from(None, var).as_deref(), Some("http://env.test"));
        std::env::remove_var(var);
        assert_eq!(s.runtime_api_url_from(None, var).as_deref(), Some("http://settings.test"));
    }

    #[test]
    fn test_blank_api_url_candidates_are_skipped() {
        let var = "WASATEXT_API_URL_TEST_BLANK";
        std::env::set_var(var, "  ");
        let s = with_urls(Some("http://settings.test:3000"), None);
        assert_eq!(s.runtime_api_url_from(Some(""), var).as_deref(), Some("http://settings.test:3000"));
        std::env::remove_var(var);

        let empty = with_urls(Some(" "), None);
        assert_eq!(empty.runtime_api_url_from(Some(""), var), None);
    }

    #[test]
    fn test_origin_precedence() {
        let var = "WASATEXT_ORIGIN_TEST_PRECEDENCE";
        let s = with_urls(None, Some("http://settings.test/ui"));

        std::env::set_var(var, "http://env.test/ui");
        assert_eq!(
            s.origin_source_from(Some("http://flag.test/ui"), var).location().as_deref(),
            Some("http://flag.test/ui")
        );
        assert_eq!(s.origin_source_from(Some(" "), var).location().as_deref(), Some("http://env.test/ui"));
        std::env::remove_var(var);
        assert_eq!(s.origin_source_from(None, var).location().as_deref(), Some("http://settings.test/ui"));
        assert_eq!(ClientSettings::default().origin_source_from(None, var).location(), None);
    }

    #[test]
    fn test_set_api_url_and_clear() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wasatext-client.toml");

        let mut s = ClientSettings::default();
        s.set_api_url("http://api.example:3000");
        s.save(&path)?;
        assert_eq!(ClientSettings::load(&path)?.api_url.as_deref(), Some("http://api.example:3000"));

        s.set_api_url("   ");
        s.save(&path)?;
        assert_eq!(ClientSettings::load(&path)?.api_url, None);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wasatext-client.toml");
        fs::write(&path, "api_url = [")?;

        let err = ClientSettings::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
        Ok(())
    }
}
