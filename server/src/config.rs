use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One username/password pair accepted at login.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

/// Server configuration persisted as TOML.
///
/// Fields:
/// - port: TCP port the listener starts scanning from
/// - public_dir: directory holding the static login/chat pages
/// - upload_dir: directory the blob store writes uploads into
/// - users: the static credential list checked at login
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub port: u16,
    pub public_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub users: Vec<UserCredential>,
}

impl Default for Config {
    fn default() -> Self {
        let users = (1..=4)
            .map(|i| UserCredential {
                username: format!("user{}", i),
                password: format!("pass{}", i),
            })
            .collect();
        Config {
            port: 3000,
            public_dir: PathBuf::from("public"),
            upload_dir: PathBuf::from("uploads"),
            users,
        }
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with reasonable defaults and return the default config.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("creating config directory '{}'", parent.display())
                    })?;
                }
            }

            let cfg = Config::default();
            let toml_text = toml::to_string_pretty(&cfg)
                .with_context(|| "serializing default config to TOML")?;
            fs::write(path, toml_text)
                .with_context(|| format!("writing default config to '{}'", path.display()))?;
            Ok(cfg)
        }
    }

    /// Save the current config state back to the provided path (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }
}
