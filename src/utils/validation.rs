use anyhow::{anyhow, Result};

use crate::database::models::Category;
use crate::utils::text::{telegram_len, TELEGRAM_MESSAGE_LIMIT};

const MAX_NAME_LEN: usize = 100;
const MAX_PRICE: i64 = 1_000_000;
const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Trimmed service name, up to 100 characters, without commas or " - ".
pub fn validate_service_name(name: &str) -> Result<String> {
    validate_name(name, "Service name")
}

/// Trimmed master name, same rules as service names.
pub fn validate_master_name(name: &str) -> Result<String> {
    validate_name(name, "Master name")
}

fn validate_name(name: &str, field: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("{} cannot be empty", field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(anyhow!("{} cannot be longer than {} characters", field, MAX_NAME_LEN));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("{} cannot contain line breaks", field));
    }

    // Menu labels are "name - price", keep the separator unambiguous
    if name.contains(" - ") {
        return Err(anyhow!("{} cannot contain ' - '", field));
    }

    // Edit prompts take comma separated fields
    if name.contains(',') {
        return Err(anyhow!("{} cannot contain commas", field));
    }

    Ok(name.to_string())
}

/// Price in whole rubles.
pub fn validate_price(input: &str) -> Result<i64> {
    let price: i64 = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Price must be a whole number"))?;

    if price <= 0 {
        return Err(anyhow!("Price must be positive"));
    }

    if price > MAX_PRICE {
        return Err(anyhow!("Price cannot exceed {}", MAX_PRICE));
    }

    Ok(price)
}

/// Duration in whole minutes.
pub fn validate_duration(input: &str) -> Result<i64> {
    let minutes: i64 = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Duration must be a whole number of minutes"))?;

    if minutes <= 0 {
        return Err(anyhow!("Duration must be positive"));
    }

    if minutes > MAX_DURATION_MINUTES {
        return Err(anyhow!("Duration cannot exceed {} minutes", MAX_DURATION_MINUTES));
    }

    Ok(minutes)
}

/// Normalises a phone number to `+<digits>`.
///
/// Numbers without a leading `+` are read as Russian national numbers:
/// ten digits, or eleven digits starting with `8` or `7`.
pub fn normalize_phone(input: &str) -> Result<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(anyhow!("Phone number cannot be empty"));
    }

    let (international, rest) = match input.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-'))
    {
        return Err(anyhow!("Phone number contains invalid characters"));
    }

    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();

    if international {
        if !(10..=15).contains(&digits.len()) {
            return Err(anyhow!("Phone number must have 10 to 15 digits"));
        }
        return Ok(format!("+{digits}"));
    }

    match digits.len() {
        10 => Ok(format!("+7{digits}")),
        11 if digits.starts_with('8') || digits.starts_with('7') => {
            Ok(format!("+7{}", &digits[1..]))
        }
        _ => Err(anyhow!("Phone number must have 10 to 15 digits")),
    }
}

/// Positive integer id. A trailing dot from list copy-paste is tolerated.
pub fn parse_id(input: &str) -> Result<i64> {
    let id: i64 = input
        .trim()
        .trim_end_matches('.')
        .parse()
        .map_err(|_| anyhow!("ID must be a number"))?;

    if id <= 0 {
        return Err(anyhow!("ID must be positive"));
    }

    Ok(id)
}

/// Comma separated ids, at least one, duplicates removed preserving order.
pub fn parse_id_list(input: &str) -> Result<Vec<i64>> {
    let mut ids = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = parse_id(part).map_err(|_| anyhow!("'{}' is not a valid ID", part))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(anyhow!("At least one ID is required"));
    }

    Ok(ids)
}

/// Latitude in degrees, -90 to 90.
pub fn parse_latitude(input: &str) -> Result<f64> {
    parse_coordinate(input, 90.0, "Latitude")
}

/// Longitude in degrees, -180 to 180.
pub fn parse_longitude(input: &str) -> Result<f64> {
    parse_coordinate(input, 180.0, "Longitude")
}

fn parse_coordinate(input: &str, limit: f64, field: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| anyhow!("{} must be a number", field))?;

    if !value.is_finite() || value.abs() > limit {
        return Err(anyhow!("{} must be between -{} and {}", field, limit, limit));
    }

    Ok(value)
}

/// Free-text setting values and broadcast messages.
pub fn validate_text(input: &str) -> Result<String> {
    let text = input.trim();

    if text.is_empty() {
        return Err(anyhow!("Text cannot be empty"));
    }

    // Telegram measures message length in UTF-16 code units
    if telegram_len(text) > TELEGRAM_MESSAGE_LIMIT {
        return Err(anyhow!(
            "Text cannot be longer than {} characters",
            TELEGRAM_MESSAGE_LIMIT
        ));
    }

    Ok(text.to_string())
}

/// Parsed service edit line.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDetails {
    /// Category
    pub category: Category,
    /// Validated name
    pub name: String,
    /// Price in roubles
    pub price: i64,
    /// Duration in minutes
    pub duration: i64,
    /// Master assigned to the service, if any.
    pub master_id: Option<i64>,
}

/// Parses `category, name, price, duration[, master id]` as entered when
/// editing a service. Leaving out the master id clears the assignment.
pub fn parse_service_details(input: &str) -> Result<ServiceDetails> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();

    if !(4..=5).contains(&parts.len()) {
        return Err(anyhow!("Expected 4 or 5 comma separated values"));
    }

    let category = Category::from_label(parts[0])
        .ok_or_else(|| anyhow!("Unknown category '{}'", parts[0]))?;

    Ok(ServiceDetails {
        category,
        name: validate_service_name(parts[1])?,
        price: validate_price(parts[2])?,
        duration: validate_duration(parts[3])?,
        master_id: parts.get(4).map(|id| parse_id(id)).transpose()?,
    })
}

/// Parses `name, id1, id2, ...` as entered when editing a master.
pub fn parse_master_details(input: &str) -> Result<(String, Vec<i64>)> {
    let (name, ids) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected a name followed by at least one service ID"))?;

    Ok((validate_master_name(name)?, parse_id_list(ids)?))
}
