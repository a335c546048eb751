//! Lead API endpoints: the public wizard submission plus the admin-side
//! listing, status updates and deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    self, serialize_string_list, CreateLeadRequest, Lead, LeadQuery, LeadResponse,
    UpdateLeadRequest,
};
use crate::scoring;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_lead_status, validate_phone, validate_positive_number, validate_property_type,
    validate_renovation_stage, validate_required_text, validate_styles, validate_timeline,
};

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<LeadResponse>,
}

#[derive(Debug, Serialize)]
pub struct LeadItemResponse {
    pub success: bool,
    pub data: LeadResponse,
}

/// Response for the public wizard submission; the score is surfaced so the
/// success page can show the caller their grade immediately.
#[derive(Debug, Serialize)]
pub struct LeadCreatedResponse {
    pub success: bool,
    pub message: String,
    pub data: LeadResponse,
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct LeadMutationResponse {
    pub success: bool,
    pub message: String,
    pub data: LeadResponse,
}

#[derive(Debug, Serialize)]
pub struct LeadDeleteResponse {
    pub success: bool,
    pub message: String,
}

/// A fully validated wizard submission.
struct NewLead {
    name: String,
    phone: String,
    property_type: String,
    area: f64,
    budget: f64,
    styles: Vec<String>,
    stage: String,
    timeline: String,
}

/// Validate the wizard submission, reporting every missing or invalid field
/// in one response. No partial writes: nothing is stored unless the whole
/// payload passes.
fn validate_create_request(req: CreateLeadRequest) -> Result<NewLead, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required_text(req.name.as_deref(), "name") {
        errors.add("name", e);
    }

    match req.phone.as_deref() {
        None | Some("") => {
            errors.add("phone", "Phone number is required");
        }
        Some(phone) => {
            if let Err(e) = validate_phone(phone) {
                errors.add("phone", e);
            }
        }
    }

    match req.property_type.as_deref() {
        None | Some("") => {
            errors.add("propertyType", "propertyType is required");
        }
        Some(property_type) => {
            if let Err(e) = validate_property_type(property_type) {
                errors.add("propertyType", e);
            }
        }
    }

    if let Err(e) = validate_positive_number(req.area, "area") {
        errors.add("area", e);
    }

    if let Err(e) = validate_positive_number(req.budget, "budget") {
        errors.add("budget", e);
    }

    if let Err(e) = validate_styles(req.styles.as_deref(), "styles") {
        errors.add("styles", e);
    }

    match req.stage.as_deref() {
        None | Some("") => {
            errors.add("stage", "stage is required");
        }
        Some(stage) => {
            if let Err(e) = validate_renovation_stage(stage) {
                errors.add("stage", e);
            }
        }
    }

    match req.timeline.as_deref() {
        None | Some("") => {
            errors.add("timeline", "timeline is required");
        }
        Some(timeline) => {
            if let Err(e) = validate_timeline(timeline) {
                errors.add("timeline", e);
            }
        }
    }

    errors.finish()?;

    Ok(NewLead {
        name: req.name.unwrap_or_default(),
        phone: req.phone.unwrap_or_default(),
        property_type: req.property_type.unwrap_or_default(),
        area: req.area.unwrap_or_default(),
        budget: req.budget.unwrap_or_default(),
        styles: req.styles.unwrap_or_default(),
        stage: req.stage.unwrap_or_default(),
        timeline: req.timeline.unwrap_or_default(),
    })
}

/// List leads with filtering and sorting (back office)
///
/// GET /api/leads
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeadQuery>,
) -> Result<Json<LeadListResponse>, ApiError> {
    let leads = db::list_leads(&state.db, &query).await?;

    let data: Vec<LeadResponse> = leads.into_iter().map(LeadResponse::from).collect();

    Ok(Json(LeadListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Get a single lead by id (back office)
///
/// GET /api/leads/:id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeadItemResponse>, ApiError> {
    let lead = db::get_lead_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    Ok(Json(LeadItemResponse {
        success: true,
        data: LeadResponse::from(lead),
    }))
}

/// Public wizard submission. The score is computed here, synchronously,
/// before the insert; the stored value never changes afterwards. Status is
/// forced to pending no matter what the caller sends.
///
/// POST /api/leads
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadCreatedResponse>), ApiError> {
    let new_lead = validate_create_request(req)?;

    let score = scoring::lead_score(new_lead.budget, new_lead.area, &new_lead.timeline);

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let styles = serialize_string_list(&new_lead.styles);

    sqlx::query(
        r#"
        INSERT INTO leads (
            id, name, phone, property_type, area, budget, styles, stage,
            timeline, score, status, submitted_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_lead.name)
    .bind(&new_lead.phone)
    .bind(&new_lead.property_type)
    .bind(new_lead.area)
    .bind(new_lead.budget)
    .bind(&styles)
    .bind(&new_lead.stage)
    .bind(&new_lead.timeline)
    .bind(score)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store lead: {}", e);
        ApiError::database("Failed to submit, please try again")
    })?;

    let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(lead_id = %id, score = score, "Lead captured");

    Ok((
        StatusCode::CREATED,
        Json(LeadCreatedResponse {
            success: true,
            message: "Submitted. We will be in touch shortly.".to_string(),
            data: LeadResponse::from(lead),
            score,
        }),
    ))
}

/// Update a lead's follow-up status (back office). Status is the only
/// mutable field; everything else is frozen at submission time.
///
/// PUT /api/leads/:id
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateLeadRequest>,
) -> Result<Json<LeadMutationResponse>, ApiError> {
    let _existing = db::get_lead_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    if let Some(ref status) = req.status {
        if let Err(e) = validate_lead_status(status) {
            return Err(ApiError::validation_field("status", e));
        }
    }

    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("UPDATE leads SET status = COALESCE(?, status), updated_at = ? WHERE id = ?")
        .bind(&req.status)
        .bind(&now)
        .bind(&id)
        .execute(&state.db)
        .await?;

    let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(lead_id = %id, status = ?req.status, "Lead status updated");

    Ok(Json(LeadMutationResponse {
        success: true,
        message: "Lead updated".to_string(),
        data: LeadResponse::from(lead),
    }))
}

/// Delete a lead (back office)
///
/// DELETE /api/leads/:id
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeadDeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM leads WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Lead not found"));
    }

    tracing::info!(lead_id = %id, "Lead deleted");

    Ok(Json(LeadDeleteResponse {
        success: true,
        message: "Lead deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateLeadRequest {
        CreateLeadRequest {
            name: Some("王芳".to_string()),
            phone: Some("13800138000".to_string()),
            property_type: Some("apartment".to_string()),
            area: Some(95.0),
            budget: Some(30.0),
            styles: Some(vec!["nordic".to_string()]),
            stage: Some("design_construction".to_string()),
            timeline: Some("within_1_3_months".to_string()),
        }
    }

    #[test]
    fn test_create_validation_accepts_full_request() {
        let new_lead = validate_create_request(full_request()).unwrap();
        assert_eq!(new_lead.phone, "13800138000");
        assert_eq!(new_lead.timeline, "within_1_3_months");
    }

    #[test]
    fn test_create_validation_rejects_bad_phone() {
        let mut req = full_request();
        req.phone = Some("12345678901".to_string());
        assert!(validate_create_request(req).is_err());

        let mut req = full_request();
        req.phone = Some("138001380".to_string());
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_missing_fields() {
        let req = CreateLeadRequest {
            name: None,
            phone: None,
            property_type: None,
            area: None,
            budget: None,
            styles: None,
            stage: None,
            timeline: None,
        };
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_empty_styles() {
        let mut req = full_request();
        req.styles = Some(Vec::new());
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_non_positive_numbers() {
        let mut req = full_request();
        req.budget = Some(0.0);
        assert!(validate_create_request(req).is_err());

        let mut req = full_request();
        req.area = Some(-10.0);
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_caller_supplied_score_is_dropped_at_the_boundary() {
        // The request type has no score field, so a submitted score can
        // never reach the insert; the stored value always comes from the
        // scorer.
        let req: CreateLeadRequest = serde_json::from_str(
            r#"{
                "name": "张三",
                "phone": "13800138101",
                "propertyType": "apartment",
                "area": 120,
                "budget": 30,
                "styles": ["modern"],
                "stage": "design_construction",
                "timeline": "within_1_month",
                "score": 100,
                "status": "closed"
            }"#,
        )
        .unwrap();

        let new_lead = validate_create_request(req).unwrap();
        assert_eq!(
            scoring::lead_score(new_lead.budget, new_lead.area, &new_lead.timeline),
            50 + 25 + 6 + 10
        );
    }

    #[test]
    fn test_validated_lead_scores_like_the_scorer() {
        let new_lead = validate_create_request(full_request()).unwrap();
        let score = scoring::lead_score(new_lead.budget, new_lead.area, &new_lead.timeline);
        assert_eq!(score, 50 + 25 + 4 + 7);
    }
}
