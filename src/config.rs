use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/salon.db";
const DEFAULT_STUDIO_PHONE: &str = "+7 (900) 000-00-00";
const DEFAULT_WEBSITE_URL: &str = "https://ноготочки-точка.рф/";
const DEFAULT_TELEGRAM_CHANNEL: &str = "https://t.me/nogotochki_tochka";
const DEFAULT_LOCATION_LAT: f64 = 55.751244;
const DEFAULT_LOCATION_LON: f64 = 37.618423;

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token, from `TELEGRAM_BOT_TOKEN` or `BOT_TOKEN`
    pub telegram_bot_token: String,
    /// SQLite connection string
    pub database_url: String,
    /// Port of the health check server
    pub http_port: u16,
    /// Telegram ids allowed into the admin panel
    pub admin_ids: Vec<i64>,
    /// Contact phone shown in help and the price list
    pub studio_phone: String,
    /// Fallback when the website setting is unset
    pub website_url: String,
    /// Fallback when the channel setting is unset
    pub telegram_channel: String,
    /// Fallback studio latitude
    pub location_lat: f64,
    /// Fallback studio longitude
    pub location_lon: f64,
    /// TrueType font for the price list, see `PRICE_LIST_FONT`
    pub price_list_font: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration. Only the bot token is required.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("BOT_TOKEN"))
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = database_url_from_env();

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let admin_ids = match env::var("ADMIN_IDS") {
            Ok(raw) => parse_admin_ids(&raw)?,
            Err(_) => Vec::new(),
        };

        let location_lat = parse_coordinate_var("LOCATION_LAT", DEFAULT_LOCATION_LAT)?;
        let location_lon = parse_coordinate_var("LOCATION_LON", DEFAULT_LOCATION_LON)?;

        let price_list_font = env::var("PRICE_LIST_FONT")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            admin_ids,
            studio_phone: var_or("STUDIO_PHONE", DEFAULT_STUDIO_PHONE),
            website_url: var_or("WEBSITE_URL", DEFAULT_WEBSITE_URL),
            telegram_channel: var_or("TELEGRAM_CHANNEL", DEFAULT_TELEGRAM_CHANNEL),
            location_lat,
            location_lon,
            price_list_font,
        })
    }

    /// Administrator allow-list membership test.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// `DATABASE_URL` or the default SQLite file. Needs no bot token, so the
/// migration tool can use it on its own.
pub fn database_url_from_env() -> String {
    var_or("DATABASE_URL", DEFAULT_DATABASE_URL)
}

/// Parses a comma separated list of Telegram user ids. Blank entries are skipped.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| anyhow!("Invalid ADMIN_IDS entry: '{}'", part))
        })
        .collect()
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_coordinate_var(name: &str, default: f64) -> Result<f64> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid {}", name)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_admin_ids("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_admin_ids("42,").unwrap(), vec![42]);
        assert!(parse_admin_ids("1,abc").is_err());
    }
}
