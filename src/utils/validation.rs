use crate::utils::error::{ActiniaError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static RESOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("resource name pattern is a valid regex")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ActiniaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// API versions look like `v3`.
pub fn validate_api_version(field_name: &str, version: &str) -> Result<()> {
    let digits = version.strip_prefix('v').unwrap_or_default();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: version.to_string(),
            reason: "API version must look like 'v3'".to_string(),
        });
    }
    Ok(())
}

/// GRASS names for locations, mapsets, layers and STRDS.
pub fn validate_resource_name(field_name: &str, name: &str) -> Result<()> {
    if !RESOURCE_NAME.is_match(name) {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Names must start with a letter, digit or underscore and contain only letters, digits, '_', '.' or '-'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_epsg_code(field_name: &str, epsg: &str) -> Result<()> {
    if epsg.is_empty() || !epsg.chars().all(|c| c.is_ascii_digit()) {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: epsg.to_string(),
            reason: "EPSG code must be numeric".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ActiniaError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ActiniaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
