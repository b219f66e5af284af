//! Settings: command-line flags, then `GHLINK_BACKEND`, then the config file.

use clap::ValueEnum;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use toml::Value as TomlValue;
use tracing::{debug, warn};

const BACKEND_ENV: &str = "GHLINK_BACKEND";

/// Which implementation reads repository state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// libgit2, linked in.
    #[default]
    Git2,
    /// The `git` executable on PATH.
    GitCli,
}

impl Backend {
    pub fn available() -> &'static [&'static str] {
        &["git2", "git-cli"]
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "git2" | "libgit2" => Ok(Backend::Git2),
            "git-cli" | "git" | "cli" => Ok(Backend::GitCli),
            other => Err(format!(
                "Unknown backend '{}'. Available: {}",
                other,
                Backend::available().join(", ")
            )),
        }
    }
}

/// Values read from `config.toml`. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub backend: Option<Backend>,
    pub clipboard: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, String> {
        let value = text.parse::<TomlValue>().map_err(|e| e.to_string())?;
        let table = value
            .as_table()
            .ok_or_else(|| "config must be a table".to_string())?;

        let backend = match table.get("backend") {
            Some(v) => Some(
                v.as_str()
                    .ok_or_else(|| "'backend' must be a string".to_string())?
                    .parse::<Backend>()?,
            ),
            None => None,
        };

        let clipboard = match table.get("clipboard") {
            Some(v) => Some(
                v.as_bool()
                    .ok_or_else(|| "'clipboard' must be true or false".to_string())?,
            ),
            None => None,
        };

        Ok(Self { backend, clipboard })
    }

    /// Load the user's config file. Missing or invalid files yield defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        let Ok(text) = fs::read_to_string(&path) else {
            debug!(path = %path.display(), "no config file");
            return Self::default();
        };
        match Self::parse(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Self::default()
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ghlink").join("config.toml"))
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub clipboard: bool,
}

impl Settings {
    /// Combine, highest precedence first: flags, environment, config file.
    pub fn resolve(
        backend_arg: Option<Backend>,
        no_copy: bool,
        backend_env: Option<&str>,
        file: &FileConfig,
    ) -> Result<Self, String> {
        let backend = match (backend_arg, backend_env.map(str::trim)) {
            (Some(backend), _) => backend,
            (None, Some(env)) if !env.is_empty() => env.parse()?,
            _ => file.backend.unwrap_or_default(),
        };

        Ok(Self {
            backend,
            clipboard: !no_copy && file.clipboard.unwrap_or(true),
        })
    }

    pub fn load(backend_arg: Option<Backend>, no_copy: bool) -> Result<Self, String> {
        let env = std::env::var(BACKEND_ENV).ok();
        Self::resolve(backend_arg, no_copy, env.as_deref(), &FileConfig::load())
    }
}
