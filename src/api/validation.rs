//! Input validation for API requests.
//!
//! This module provides validation functions for API request data,
//! ensuring all inputs meet the required format and constraints.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

use crate::db::{CaseStatus, CaseStyle, LeadStatus, PropertyType, RenovationStage, Timeline};

lazy_static! {
    /// Regex for validating mainland-China mobile numbers: 11 digits,
    /// leading 1, second digit 3-9
    static ref MOBILE_PHONE_REGEX: Regex = Regex::new(r"^1[3-9]\d{9}$").unwrap();
}

/// Validate a customer or foreman mobile number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone number is required".to_string());
    }

    if !MOBILE_PHONE_REGEX.is_match(phone) {
        return Err("Invalid mobile number format".to_string());
    }

    Ok(())
}

/// Validate a required free-text field (title, location, description, ...)
pub fn validate_required_text(value: Option<&str>, field_name: &str) -> Result<(), String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(format!("{} is required", field_name)),
    }
}

/// Validate a required positive number (area, budget, price)
pub fn validate_positive_number(value: Option<f64>, field_name: &str) -> Result<(), String> {
    match value {
        None => Err(format!("{} is required", field_name)),
        Some(v) if v > 0.0 => Ok(()),
        Some(_) => Err(format!("{} must be a positive number", field_name)),
    }
}

/// Validate a required positive integer (duration)
pub fn validate_positive_integer(value: Option<i64>, field_name: &str) -> Result<(), String> {
    match value {
        None => Err(format!("{} is required", field_name)),
        Some(v) if v > 0 => Ok(()),
        Some(_) => Err(format!("{} must be a positive integer", field_name)),
    }
}

/// Validate a renovation style value
pub fn validate_style(style: &str) -> Result<(), String> {
    CaseStyle::from_str(style).map(|_| ()).map_err(|_| {
        format!(
            "Invalid style. Must be one of: {}",
            join_values(CaseStyle::ALL.iter().map(|v| v.as_str()))
        )
    })
}

/// Validate a non-empty list of style values
pub fn validate_styles(styles: Option<&[String]>, field_name: &str) -> Result<(), String> {
    let styles = match styles {
        Some(s) if !s.is_empty() => s,
        _ => return Err(format!("{} must contain at least one style", field_name)),
    };

    for style in styles {
        validate_style(style)?;
    }

    Ok(())
}

/// Validate a non-empty list of image URLs
pub fn validate_images(images: Option<&[String]>) -> Result<(), String> {
    match images {
        Some(imgs) if !imgs.is_empty() => {
            if imgs.iter().any(|url| url.trim().is_empty()) {
                Err("Image URLs cannot be empty".to_string())
            } else {
                Ok(())
            }
        }
        _ => Err("At least one image is required".to_string()),
    }
}

/// Validate a case publication status value
pub fn validate_case_status(status: &str) -> Result<(), String> {
    CaseStatus::from_str(status).map(|_| ()).map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            join_values(CaseStatus::ALL.iter().map(|v| v.as_str()))
        )
    })
}

/// Validate a lead follow-up status value
pub fn validate_lead_status(status: &str) -> Result<(), String> {
    LeadStatus::from_str(status).map(|_| ()).map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            join_values(LeadStatus::ALL.iter().map(|v| v.as_str()))
        )
    })
}

/// Validate a property type value
pub fn validate_property_type(property_type: &str) -> Result<(), String> {
    PropertyType::from_str(property_type).map(|_| ()).map_err(|_| {
        format!(
            "Invalid property type. Must be one of: {}",
            join_values(PropertyType::ALL.iter().map(|v| v.as_str()))
        )
    })
}

/// Validate a renovation stage value (lead wizard)
pub fn validate_renovation_stage(stage: &str) -> Result<(), String> {
    RenovationStage::from_str(stage).map(|_| ()).map_err(|_| {
        format!(
            "Invalid stage. Must be one of: {}",
            join_values(RenovationStage::ALL.iter().map(|v| v.as_str()))
        )
    })
}

/// Validate a timeline value (lead wizard)
pub fn validate_timeline(timeline: &str) -> Result<(), String> {
    Timeline::from_str(timeline).map(|_| ()).map_err(|_| {
        format!(
            "Invalid timeline. Must be one of: {}",
            join_values(Timeline::ALL.iter().map(|v| v.as_str()))
        )
    })
}

fn join_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_accepts_valid_mobile() {
        assert!(validate_phone("13800138000").is_ok());
        assert!(validate_phone("19912345678").is_ok());
        assert!(validate_phone("15055556666").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_bad_second_digit() {
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("10000000000").is_err());
    }

    #[test]
    fn test_validate_phone_rejects_wrong_length() {
        assert!(validate_phone("138001380").is_err());
        assert!(validate_phone("1380013800012").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_phone_rejects_non_digits() {
        assert!(validate_phone("1380013800a").is_err());
        assert!(validate_phone("+8613800138000").is_err());
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text(Some("北京 · 朝阳区"), "location").is_ok());
        assert!(validate_required_text(Some(""), "location").is_err());
        assert!(validate_required_text(Some("   "), "location").is_err());
        assert!(validate_required_text(None, "location").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number(Some(0.5), "budget").is_ok());
        assert!(validate_positive_number(Some(0.0), "budget").is_err());
        assert!(validate_positive_number(Some(-3.0), "budget").is_err());
        assert!(validate_positive_number(None, "budget").is_err());
    }

    #[test]
    fn test_validate_positive_integer() {
        assert!(validate_positive_integer(Some(45), "duration").is_ok());
        assert!(validate_positive_integer(Some(0), "duration").is_err());
        assert!(validate_positive_integer(None, "duration").is_err());
    }

    #[test]
    fn test_validate_styles() {
        let styles = vec!["modern".to_string(), "nordic".to_string()];
        assert!(validate_styles(Some(&styles), "styles").is_ok());

        let empty: Vec<String> = Vec::new();
        assert!(validate_styles(Some(&empty), "styles").is_err());
        assert!(validate_styles(None, "styles").is_err());

        let bad = vec!["modern".to_string(), "brutalist".to_string()];
        assert!(validate_styles(Some(&bad), "styles").is_err());
    }

    #[test]
    fn test_validate_images() {
        let images = vec!["https://img/1.jpg".to_string()];
        assert!(validate_images(Some(&images)).is_ok());

        let empty: Vec<String> = Vec::new();
        assert!(validate_images(Some(&empty)).is_err());
        assert!(validate_images(None).is_err());

        let blank = vec!["".to_string()];
        assert!(validate_images(Some(&blank)).is_err());
    }

    #[test]
    fn test_validate_lead_status() {
        for status in ["pending", "contacted", "scheduled", "closed", "abandoned"] {
            assert!(validate_lead_status(status).is_ok());
        }
        assert!(validate_lead_status("archived").is_err());
        assert!(validate_lead_status("").is_err());
    }

    #[test]
    fn test_validate_case_status() {
        assert!(validate_case_status("published").is_ok());
        assert!(validate_case_status("draft").is_ok());
        assert!(validate_case_status("archived").is_err());
    }

    #[test]
    fn test_validate_enums() {
        assert!(validate_style("wabisabi").is_ok());
        assert!(validate_style("gothic").is_err());
        assert!(validate_property_type("villa").is_ok());
        assert!(validate_property_type("castle").is_err());
        assert!(validate_renovation_stage("design_only").is_ok());
        assert!(validate_renovation_stage("demolition").is_err());
        assert!(validate_timeline("within_1_month").is_ok());
        assert!(validate_timeline("someday").is_err());
    }
}
