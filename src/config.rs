use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub reset_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_url: String,
    pub reveal_unknown_email: bool,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let session_secret = env_required("SESSION_SECRET")?;
        let reset_secret = env_required("RESET_SECRET")?;

        let host: IpAddr = env_or("SHOPFRONT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SHOPFRONT_HOST: {e}"))?;

        let port: u16 = env_or("SHOPFRONT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SHOPFRONT_PORT: {e}"))?;

        let frontend_url = env_or("SHOPFRONT_FRONTEND_URL", &format!("http://{host}:{port}"));

        // Whether an unknown email on a reset request answers 401 instead of
        // a uniform 200. On by default to match the storefront's historical
        // behavior; turn off to close the user-enumeration channel.
        let reveal_unknown_email =
            !matches!(env_or("SHOPFRONT_REVEAL_UNKNOWN_EMAIL", "true").as_str(), "false" | "0" | "no");

        let log_level = env_or("SHOPFRONT_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("SHOPFRONT_SMTP_HOST").ok(),
            std::env::var("SHOPFRONT_SMTP_PORT").ok(),
            std::env::var("SHOPFRONT_SMTP_USER").ok(),
            std::env::var("SHOPFRONT_SMTP_PASS").ok(),
            std::env::var("SHOPFRONT_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid SHOPFRONT_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            session_secret,
            reset_secret,
            host,
            port,
            frontend_url,
            reveal_unknown_email,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
