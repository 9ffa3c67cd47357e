//! Signed-in user as supplied by the host shell.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Launch parameter carrying the host's init data.
pub const INIT_DATA_PARAM: &str = "tgWebAppData";

/// User id as the host reports it, number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl UserId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Parse a user id typed on the command line; digits become numeric ids.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(match input.parse::<i64>() {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Text(input.to_string()),
        })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserIdentity {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub photo_url: String,
    pub language_code: String,
}

impl UserIdentity {
    pub fn with_id(id: UserId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Normalize a host user object; missing fields become empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            id: map.get("id").and_then(UserId::from_value),
            first_name: text("first_name"),
            last_name: text("last_name"),
            username: text("username"),
            photo_url: text("photo_url"),
            language_code: text("language_code"),
        })
    }

    /// "first last", else the username, else a generic label.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            full
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            "Telegram User".to_string()
        }
    }

    /// `@username` when known, else the display name.
    pub fn handle(&self) -> String {
        if self.username.is_empty() {
            self.display_name()
        } else {
            format!("@{}", self.username)
        }
    }
}

/// Display name for an optional user; no user renders as "Guest".
pub fn display_name(user: Option<&UserIdentity>) -> String {
    user.map_or_else(|| "Guest".to_string(), UserIdentity::display_name)
}

/// Decode one `application/x-www-form-urlencoded` component.
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| decode_component(value))
}

/// Pull the init data out of a launch fragment (`#...`) or query (`?...`).
pub fn init_data_from_launch_params(params: &str) -> Option<String> {
    let params = params.trim_start_matches(['#', '?']);
    query_param(params, INIT_DATA_PARAM).filter(|data| !data.is_empty())
}

/// Parse the `user` JSON object carried inside init data.
pub fn parse_init_data(init_data: &str) -> Option<UserIdentity> {
    let user_json = query_param(init_data, "user")?;
    let value: Value = serde_json::from_str(&user_json).ok()?;
    UserIdentity::from_value(&value)
}

/// The last user resolved from the host, kept as JSON between runs.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `user.json` next to the config file in the platform config directory.
    pub fn at_default_path() -> Option<Self> {
        ProjectDirs::from("", "", "filedeck")
            .map(|dirs| Self::new(dirs.config_dir().join("user.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored user, if any. Unreadable or malformed files count as absent.
    pub fn load(&self) -> Option<UserIdentity> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no stored user");
                return None;
            }
        };
        match serde_json::from_str::<UserIdentity>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring malformed stored user");
                None
            }
        }
    }

    /// Persist `user`; `None` forgets the stored one.
    pub fn save(&self, user: Option<&UserIdentity>) -> Result<()> {
        let Some(user) = user else {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => {
                    Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
                }
            };
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let raw = serde_json::to_string(user)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "stored user");
        Ok(())
    }
}
