//! Common types and helpers shared across models.
//!
//! Rows store enum-valued columns as TEXT and list-valued columns as JSON
//! arrays in TEXT; the enums here carry the canonical value sets used for
//! request validation and seeding.

use serde::{Deserialize, Serialize};

/// Renovation style of a portfolio case (and of a lead's preferences).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    Modern,
    Nordic,
    Industrial,
    Wabisabi,
    Luxury,
    Minimalist,
    Chinese,
    European,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 8] = [
        CaseStyle::Modern,
        CaseStyle::Nordic,
        CaseStyle::Industrial,
        CaseStyle::Wabisabi,
        CaseStyle::Luxury,
        CaseStyle::Minimalist,
        CaseStyle::Chinese,
        CaseStyle::European,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStyle::Modern => "modern",
            CaseStyle::Nordic => "nordic",
            CaseStyle::Industrial => "industrial",
            CaseStyle::Wabisabi => "wabisabi",
            CaseStyle::Luxury => "luxury",
            CaseStyle::Minimalist => "minimalist",
            CaseStyle::Chinese => "chinese",
            CaseStyle::European => "european",
        }
    }
}

impl std::fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown style: {}", s))
    }
}

/// Publication state of a portfolio case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Published,
    Draft,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 2] = [CaseStatus::Published, CaseStatus::Draft];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Published => "published",
            CaseStatus::Draft => "draft",
        }
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Draft
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown case status: {}", s))
    }
}

/// Property type selected in the lead wizard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Apartment,
    Villa,
    Commercial,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Residential,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Commercial,
        PropertyType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Commercial => "commercial",
            PropertyType::Other => "other",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown property type: {}", s))
    }
}

/// Which part of a renovation the customer wants handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenovationStage {
    DesignOnly,
    DesignConstruction,
    ConstructionOnly,
    SupervisionOnly,
}

impl RenovationStage {
    pub const ALL: [RenovationStage; 4] = [
        RenovationStage::DesignOnly,
        RenovationStage::DesignConstruction,
        RenovationStage::ConstructionOnly,
        RenovationStage::SupervisionOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenovationStage::DesignOnly => "design_only",
            RenovationStage::DesignConstruction => "design_construction",
            RenovationStage::ConstructionOnly => "construction_only",
            RenovationStage::SupervisionOnly => "supervision_only",
        }
    }
}

impl std::fmt::Display for RenovationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RenovationStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown renovation stage: {}", s))
    }
}

/// How soon the customer plans to start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Timeline {
    #[serde(rename = "within_1_month")]
    Within1Month,
    #[serde(rename = "within_1_3_months")]
    Within1To3Months,
    #[serde(rename = "within_3_6_months")]
    Within3To6Months,
    #[serde(rename = "over_6_months")]
    Over6Months,
    #[serde(rename = "no_plan")]
    NoPlan,
}

impl Timeline {
    pub const ALL: [Timeline; 5] = [
        Timeline::Within1Month,
        Timeline::Within1To3Months,
        Timeline::Within3To6Months,
        Timeline::Over6Months,
        Timeline::NoPlan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Within1Month => "within_1_month",
            Timeline::Within1To3Months => "within_1_3_months",
            Timeline::Within3To6Months => "within_3_6_months",
            Timeline::Over6Months => "over_6_months",
            Timeline::NoPlan => "no_plan",
        }
    }
}

impl std::fmt::Display for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown timeline: {}", s))
    }
}

/// Follow-up state of a captured lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pending,
    Contacted,
    Scheduled,
    Closed,
    Abandoned,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::Pending,
        LeadStatus::Contacted,
        LeadStatus::Scheduled,
        LeadStatus::Closed,
        LeadStatus::Abandoned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Scheduled => "scheduled",
            LeadStatus::Closed => "closed",
            LeadStatus::Abandoned => "abandoned",
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::Pending
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown lead status: {}", s))
    }
}

/// Parse a JSON string-array column (images, styles) from the database.
pub fn parse_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize a string list into the JSON form stored in TEXT columns.
pub fn serialize_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Argument for a dynamically built query, bound in clause order.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Int(i64),
    Real(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_style_round_trip() {
        for style in CaseStyle::ALL {
            assert_eq!(CaseStyle::from_str(style.as_str()).unwrap(), style);
        }
        assert!(CaseStyle::from_str("brutalist").is_err());
    }

    #[test]
    fn test_lead_status_round_trip() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(LeadStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_timeline_round_trip() {
        for timeline in Timeline::ALL {
            assert_eq!(Timeline::from_str(timeline.as_str()).unwrap(), timeline);
        }
        assert!(Timeline::from_str("someday").is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CaseStatus::default(), CaseStatus::Draft);
        assert_eq!(LeadStatus::default(), LeadStatus::Pending);
    }

    #[test]
    fn test_string_list_round_trip() {
        let items = vec!["modern".to_string(), "nordic".to_string()];
        let json = serialize_string_list(&items);
        assert_eq!(parse_string_list(&json), items);
    }

    #[test]
    fn test_parse_string_list_tolerates_garbage() {
        assert!(parse_string_list("not json").is_empty());
        assert!(parse_string_list("").is_empty());
    }
}
