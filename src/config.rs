use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::game::Theme;

const DEFAULT_POLL_SECS: u64 = 15;
const MIN_POLL_SECS: u64 = 5;
const LOG_DIR: &str = "mlb_gamecast";
const LOG_FILE: &str = "gamecast.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub game_pk: Option<u64>,
    pub poll_interval: Duration,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `GAME_PK`, `POLL_SECS`, `THEME` and `LOG_FILE`. Call after the
    /// dotenv files are loaded.
    pub fn from_env() -> Self {
        let game_pk = env::var("GAME_PK").ok().and_then(|v| parse_game_pk(&v));
        let poll_secs = env::var("POLL_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_SECS)
            .max(MIN_POLL_SECS);
        let theme = env::var("THEME")
            .ok()
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default();
        let log_file = match env::var("LOG_FILE") {
            Ok(v) if matches!(v.trim().to_ascii_lowercase().as_str(), "off" | "none" | "0") => None,
            Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
            _ => default_log_path(),
        };

        Self {
            game_pk,
            poll_interval: Duration::from_secs(poll_secs),
            theme,
            log_file,
        }
    }

    /// A positional game id on the command line wins over `GAME_PK`.
    pub fn with_arg(mut self, arg: Option<&str>) -> Self {
        if let Some(pk) = arg.and_then(parse_game_pk) {
            self.game_pk = Some(pk);
        }
        self
    }
}

pub fn parse_game_pk(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|pk| *pk > 0)
}

fn default_log_path() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(LOG_DIR).join(LOG_FILE));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(LOG_DIR).join(LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_pk_must_be_positive_integer() {
        assert_eq!(parse_game_pk(" 745123 "), Some(745123));
        assert_eq!(parse_game_pk("0"), None);
        assert_eq!(parse_game_pk("abc"), None);
    }

    #[test]
    fn arg_overrides_env_value() {
        let config = Config {
            game_pk: Some(1),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            theme: Theme::Light,
            log_file: None,
        };
        assert_eq!(config.clone().with_arg(Some("42")).game_pk, Some(42));
        assert_eq!(config.with_arg(Some("nope")).game_pk, Some(1));
    }
}
