//! Process configuration from environment variables.

use crate::logic::{unique_roster, RankingRules, DEFAULT_ROSTER};
use crate::notify::{MailSettings, SmtpSettings};
use crate::service::LeagueSettings;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Holds one CSV file per table.
    pub data_dir: PathBuf,
    /// SMTP relay for notifications. Takes precedence over `outbox`.
    pub smtp: Option<SmtpSettings>,
    /// Outbox file for notifications when no relay is set; None sends them to the log.
    pub outbox: Option<PathBuf>,
    pub league: LeagueSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing or empty values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = RankingRules::default();

        let roster = get("LEAGUE_ROSTER")
            .map(|v| unique_roster(split_list(&v)))
            .filter(|names| !names.is_empty())
            .unwrap_or_else(|| DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect());

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&get, "PORT", 8080),
            data_dir: get("LEAGUE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            smtp: smtp_settings(&get),
            outbox: get("LEAGUE_OUTBOX").map(PathBuf::from),
            league: LeagueSettings {
                roster,
                rules: RankingRules {
                    base_points: parsed_if(
                        &get,
                        "LEAGUE_BASE_POINTS",
                        defaults.base_points,
                        RankingRules::accepts_base_points,
                    ),
                    upset_multiplier: parsed_if(
                        &get,
                        "LEAGUE_UPSET_MULTIPLIER",
                        defaults.upset_multiplier,
                        RankingRules::accepts_upset_multiplier,
                    ),
                },
                mail: MailSettings {
                    sender: get("LEAGUE_SENDER").unwrap_or_else(|| "league@localhost".to_string()),
                    recipients: get("LEAGUE_RECIPIENTS").map(|v| split_list(&v)).unwrap_or_default(),
                    app_url: get("LEAGUE_APP_URL"),
                },
            },
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parsed<T: FromStr + std::fmt::Display + Copy>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    parsed_if(get, key, default, |_| true)
}

/// Like `parsed`, but values failing `accept` also fall back to `default`.
fn parsed_if<T: FromStr + std::fmt::Display + Copy>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    accept: impl Fn(T) -> bool,
) -> T {
    let Some(raw) = get(key) else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if accept(value) => value,
        _ => {
            log::warn!("Ignoring {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

/// Relay settings when `LEAGUE_SMTP_HOST` is set. The relay needs credentials.
fn smtp_settings(get: &impl Fn(&str) -> Option<String>) -> Option<SmtpSettings> {
    let host = get("LEAGUE_SMTP_HOST")?;
    let (Some(username), Some(password)) = (get("LEAGUE_SMTP_USER"), get("LEAGUE_SMTP_PASSWORD")) else {
        log::warn!(
            "LEAGUE_SMTP_HOST is set but LEAGUE_SMTP_USER / LEAGUE_SMTP_PASSWORD are not, ignoring the relay"
        );
        return None;
    };
    Some(SmtpSettings {
        host,
        port: parsed(get, "LEAGUE_SMTP_PORT", SmtpSettings::DEFAULT_PORT),
        username,
        password,
    })
}
