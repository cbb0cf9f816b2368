use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub notify: NotifyConfig,
    /// Offset used to interpret event/reading wall-clock times.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads values through `get`, so tests
    /// never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> anyhow::Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").context("DATABASE_URL missing")?;
        let jwt = JwtConfig {
            secret: get("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET missing")?,
            issuer: get("AUTH_JWT_ISSUER").unwrap_or_else(|| "glucocare".into()),
            audience: get("AUTH_JWT_AUDIENCE").unwrap_or_else(|| "glucocare-users".into()),
        };
        let notify = NotifyConfig {
            endpoint: get("NOTIFY_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:3000/api/schedule-notification".into()),
            timeout_secs: get("NOTIFY_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let utc_offset = match get("APP_UTC_OFFSET") {
            Some(raw) => parse_offset(&raw)?,
            None => UtcOffset::UTC,
        };
        Ok(Self {
            database_url,
            jwt,
            notify,
            utc_offset,
        })
    }
}

fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let fmt = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &fmt).with_context(|| format!("invalid APP_UTC_OFFSET {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(k: &str) -> Option<String> {
        match k {
            "DATABASE_URL" => Some("postgres://localhost/glucocare".into()),
            "AUTH_JWT_SECRET" => Some("sekrit".into()),
            _ => None,
        }
    }

    #[test]
    fn from_env_applies_defaults() {
        let cfg = AppConfig::from_env_with(base).expect("cfg");
        assert_eq!(cfg.jwt.issuer, "glucocare");
        assert_eq!(cfg.jwt.audience, "glucocare-users");
        assert_eq!(cfg.notify.timeout_secs, 10);
        assert_eq!(cfg.utc_offset, UtcOffset::UTC);
    }

    #[test]
    fn from_env_missing_secret() {
        let get = |k: &str| match k {
            "DATABASE_URL" => Some("postgres://localhost/glucocare".into()),
            _ => None,
        };
        let err = AppConfig::from_env_with(get).unwrap_err();
        assert!(err.to_string().contains("AUTH_JWT_SECRET"));
    }

    #[test]
    fn from_env_reads_offset_and_endpoint() {
        let get = |k: &str| match k {
            "APP_UTC_OFFSET" => Some("-04:00".into()),
            "NOTIFY_ENDPOINT" => Some("http://push.local/send".into()),
            "NOTIFY_TIMEOUT_SECS" => Some("3".into()),
            other => base(other),
        };
        let cfg = AppConfig::from_env_with(get).expect("cfg");
        assert_eq!(cfg.utc_offset, UtcOffset::from_hms(-4, 0, 0).unwrap());
        assert_eq!(cfg.notify.endpoint, "http://push.local/send");
        assert_eq!(cfg.notify.timeout_secs, 3);
    }

    #[test]
    fn from_env_rejects_garbage_offset() {
        let get = |k: &str| match k {
            "APP_UTC_OFFSET" => Some("bolivia".into()),
            other => base(other),
        };
        assert!(AppConfig::from_env_with(get).is_err());
    }
}
