//! Portfolio case API endpoints: the public gallery listing and the
//! admin-side CRUD and toggle operations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    self, serialize_string_list, Case, CaseQuery, CaseResponse, CreateCaseRequest,
    UpdateCaseRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_case_status, validate_images, validate_positive_integer, validate_positive_number,
    validate_required_text, validate_style,
};

#[derive(Debug, Serialize)]
pub struct CaseListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<CaseResponse>,
}

#[derive(Debug, Serialize)]
pub struct CaseItemResponse {
    pub success: bool,
    pub data: CaseResponse,
}

#[derive(Debug, Serialize)]
pub struct CaseMutationResponse {
    pub success: bool,
    pub message: String,
    pub data: CaseResponse,
}

#[derive(Debug, Serialize)]
pub struct CaseDeleteResponse {
    pub success: bool,
    pub message: String,
}

/// A fully validated case creation payload.
struct NewCase {
    title: String,
    location: String,
    style: String,
    area: f64,
    duration: i64,
    price: f64,
    images: Vec<String>,
    description: String,
    testimonial: String,
    foreman_name: String,
    foreman_phone: String,
    stage: String,
    featured: bool,
    status: String,
}

/// Validate a CreateCaseRequest, reporting every missing or invalid field in
/// one response. Creation is all-or-nothing: nothing is written unless the
/// whole payload passes.
fn validate_create_request(req: CreateCaseRequest) -> Result<NewCase, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required_text(req.title.as_deref(), "title") {
        errors.add("title", e);
    }

    if let Err(e) = validate_required_text(req.location.as_deref(), "location") {
        errors.add("location", e);
    }

    match req.style.as_deref() {
        None | Some("") => {
            errors.add("style", "style is required");
        }
        Some(style) => {
            if let Err(e) = validate_style(style) {
                errors.add("style", e);
            }
        }
    }

    if let Err(e) = validate_positive_number(req.area, "area") {
        errors.add("area", e);
    }

    if let Err(e) = validate_positive_integer(req.duration, "duration") {
        errors.add("duration", e);
    }

    if let Err(e) = validate_positive_number(req.price, "price") {
        errors.add("price", e);
    }

    if let Err(e) = validate_images(req.images.as_deref()) {
        errors.add("images", e);
    }

    if let Err(e) = validate_required_text(req.description.as_deref(), "description") {
        errors.add("description", e);
    }

    if let Err(e) = validate_required_text(req.testimonial.as_deref(), "testimonial") {
        errors.add("testimonial", e);
    }

    if let Err(e) = validate_required_text(req.foreman_name.as_deref(), "foremanName") {
        errors.add("foremanName", e);
    }

    if let Err(e) = validate_required_text(req.foreman_phone.as_deref(), "foremanPhone") {
        errors.add("foremanPhone", e);
    }

    if let Err(e) = validate_required_text(req.stage.as_deref(), "stage") {
        errors.add("stage", e);
    }

    if let Some(ref status) = req.status {
        if let Err(e) = validate_case_status(status) {
            errors.add("status", e);
        }
    }

    errors.finish()?;

    // Every required field was just checked; absent optionals take defaults
    Ok(NewCase {
        title: req.title.unwrap_or_default(),
        location: req.location.unwrap_or_default(),
        style: req.style.unwrap_or_default(),
        area: req.area.unwrap_or_default(),
        duration: req.duration.unwrap_or_default(),
        price: req.price.unwrap_or_default(),
        images: req.images.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        testimonial: req.testimonial.unwrap_or_default(),
        foreman_name: req.foreman_name.unwrap_or_default(),
        foreman_phone: req.foreman_phone.unwrap_or_default(),
        stage: req.stage.unwrap_or_default(),
        featured: req.featured.unwrap_or(false),
        status: req.status.unwrap_or_else(|| "draft".to_string()),
    })
}

/// Validate an UpdateCaseRequest (only validates provided fields)
fn validate_update_request(req: &UpdateCaseRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if req.title.is_some() {
        if let Err(e) = validate_required_text(req.title.as_deref(), "title") {
            errors.add("title", e);
        }
    }

    if req.location.is_some() {
        if let Err(e) = validate_required_text(req.location.as_deref(), "location") {
            errors.add("location", e);
        }
    }

    if let Some(ref style) = req.style {
        if let Err(e) = validate_style(style) {
            errors.add("style", e);
        }
    }

    if req.area.is_some() {
        if let Err(e) = validate_positive_number(req.area, "area") {
            errors.add("area", e);
        }
    }

    if req.duration.is_some() {
        if let Err(e) = validate_positive_integer(req.duration, "duration") {
            errors.add("duration", e);
        }
    }

    if req.price.is_some() {
        if let Err(e) = validate_positive_number(req.price, "price") {
            errors.add("price", e);
        }
    }

    if req.images.is_some() {
        if let Err(e) = validate_images(req.images.as_deref()) {
            errors.add("images", e);
        }
    }

    if let Some(ref status) = req.status {
        if let Err(e) = validate_case_status(status) {
            errors.add("status", e);
        }
    }

    errors.finish()
}

/// List cases with filtering
///
/// GET /api/cases
pub async fn list_cases(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CaseQuery>,
) -> Result<Json<CaseListResponse>, ApiError> {
    let cases = db::list_cases(&state.db, &query).await?;

    let data: Vec<CaseResponse> = cases.into_iter().map(CaseResponse::from).collect();

    Ok(Json(CaseListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Get a single case by id
///
/// GET /api/cases/:id
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseItemResponse>, ApiError> {
    let case = db::get_case_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    Ok(Json(CaseItemResponse {
        success: true,
        data: CaseResponse::from(case),
    }))
}

/// Create a new case
///
/// POST /api/cases
pub async fn create_case(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseMutationResponse>), ApiError> {
    let new_case = validate_create_request(req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let images = serialize_string_list(&new_case.images);

    sqlx::query(
        r#"
        INSERT INTO cases (
            id, title, location, style, area, duration, price, images,
            description, testimonial, foreman_name, foreman_phone, stage,
            featured, status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_case.title)
    .bind(&new_case.location)
    .bind(&new_case.style)
    .bind(new_case.area)
    .bind(new_case.duration)
    .bind(new_case.price)
    .bind(&images)
    .bind(&new_case.description)
    .bind(&new_case.testimonial)
    .bind(&new_case.foreman_name)
    .bind(&new_case.foreman_phone)
    .bind(&new_case.stage)
    .bind(new_case.featured as i64)
    .bind(&new_case.status)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create case: {}", e);
        ApiError::database("Failed to create case")
    })?;

    let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(case_id = %id, title = %case.title, "Case created");

    Ok((
        StatusCode::CREATED,
        Json(CaseMutationResponse {
            success: true,
            message: "Case created".to_string(),
            data: CaseResponse::from(case),
        }),
    ))
}

/// Update a case (partial; only supplied fields are touched)
///
/// PUT /api/cases/:id
pub async fn update_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCaseRequest>,
) -> Result<Json<CaseMutationResponse>, ApiError> {
    validate_update_request(&req)?;

    let _existing = db::get_case_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let now = chrono::Utc::now().to_rfc3339();
    let images = req.images.as_ref().map(|v| serialize_string_list(v));
    let featured = req.featured.map(|f| f as i64);

    sqlx::query(
        r#"
        UPDATE cases SET
            title = COALESCE(?, title),
            location = COALESCE(?, location),
            style = COALESCE(?, style),
            area = COALESCE(?, area),
            duration = COALESCE(?, duration),
            price = COALESCE(?, price),
            images = COALESCE(?, images),
            description = COALESCE(?, description),
            testimonial = COALESCE(?, testimonial),
            foreman_name = COALESCE(?, foreman_name),
            foreman_phone = COALESCE(?, foreman_phone),
            stage = COALESCE(?, stage),
            featured = COALESCE(?, featured),
            status = COALESCE(?, status),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.title)
    .bind(&req.location)
    .bind(&req.style)
    .bind(req.area)
    .bind(req.duration)
    .bind(req.price)
    .bind(&images)
    .bind(&req.description)
    .bind(&req.testimonial)
    .bind(&req.foreman_name)
    .bind(&req.foreman_phone)
    .bind(&req.stage)
    .bind(featured)
    .bind(&req.status)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update case: {}", e);
        ApiError::database("Failed to update case")
    })?;

    let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(CaseMutationResponse {
        success: true,
        message: "Case updated".to_string(),
        data: CaseResponse::from(case),
    }))
}

/// Delete a case
///
/// DELETE /api/cases/:id
pub async fn delete_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseDeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM cases WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Case not found"));
    }

    tracing::info!(case_id = %id, "Case deleted");

    Ok(Json(CaseDeleteResponse {
        success: true,
        message: "Case deleted".to_string(),
    }))
}

/// Flip a case between published and draft
///
/// POST /api/cases/:id/toggle-status
pub async fn toggle_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseMutationResponse>, ApiError> {
    let case = db::get_case_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let next_status = if case.status == "published" {
        "draft"
    } else {
        "published"
    };

    apply_toggle(&state, &id, "status", next_status).await
}

/// Flip the homepage-highlight flag of a case
///
/// POST /api/cases/:id/toggle-featured
pub async fn toggle_featured(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseMutationResponse>, ApiError> {
    let case = db::get_case_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let next_featured = if case.featured != 0 { "0" } else { "1" };

    apply_toggle(&state, &id, "featured", next_featured).await
}

/// Single-field update backing both toggles. The column name comes from the
/// two call sites above, never from request input.
async fn apply_toggle(
    state: &Arc<AppState>,
    id: &str,
    column: &str,
    value: &str,
) -> Result<Json<CaseMutationResponse>, ApiError> {
    let now = chrono::Utc::now().to_rfc3339();
    let sql = format!("UPDATE cases SET {} = ?, updated_at = ? WHERE id = ?", column);

    sqlx::query(&sql)
        .bind(value)
        .bind(&now)
        .bind(id)
        .execute(&state.db)
        .await?;

    let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(case_id = %id, column = column, "Case toggled");

    Ok(Json(CaseMutationResponse {
        success: true,
        message: "Case updated".to_string(),
        data: CaseResponse::from(case),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateCaseRequest {
        CreateCaseRequest {
            title: Some("现代简约 · 120㎡两居室".to_string()),
            location: Some("北京 · 朝阳区".to_string()),
            style: Some("modern".to_string()),
            area: Some(120.0),
            duration: Some(60),
            price: Some(25.0),
            images: Some(vec!["https://img/1.jpg".to_string()]),
            description: Some("描述".to_string()),
            testimonial: Some("评价".to_string()),
            foreman_name: Some("张伟".to_string()),
            foreman_phone: Some("13800138001".to_string()),
            stage: Some("完工阶段".to_string()),
            featured: None,
            status: None,
        }
    }

    #[test]
    fn test_create_validation_accepts_full_request() {
        let new_case = validate_create_request(full_request()).unwrap();
        assert_eq!(new_case.title, "现代简约 · 120㎡两居室");
        assert!(!new_case.featured);
        assert_eq!(new_case.status, "draft");
    }

    #[test]
    fn test_create_validation_collects_all_missing_fields() {
        let req = CreateCaseRequest {
            title: None,
            location: None,
            style: None,
            area: None,
            duration: None,
            price: None,
            images: None,
            description: None,
            testimonial: None,
            foreman_name: None,
            foreman_phone: None,
            stage: None,
            featured: None,
            status: None,
        };
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_non_positive_numbers() {
        let mut req = full_request();
        req.area = Some(0.0);
        assert!(validate_create_request(req).is_err());

        let mut req = full_request();
        req.price = Some(-1.0);
        assert!(validate_create_request(req).is_err());

        let mut req = full_request();
        req.duration = Some(0);
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_empty_images() {
        let mut req = full_request();
        req.images = Some(Vec::new());
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_rejects_unknown_style_and_status() {
        let mut req = full_request();
        req.style = Some("gothic".to_string());
        assert!(validate_create_request(req).is_err());

        let mut req = full_request();
        req.status = Some("archived".to_string());
        assert!(validate_create_request(req).is_err());
    }

    #[test]
    fn test_create_validation_honors_explicit_publish() {
        let mut req = full_request();
        req.status = Some("published".to_string());
        req.featured = Some(true);
        let new_case = validate_create_request(req).unwrap();
        assert_eq!(new_case.status, "published");
        assert!(new_case.featured);
    }

    #[test]
    fn test_update_validation_ignores_absent_fields() {
        let req = UpdateCaseRequest {
            title: None,
            location: None,
            style: None,
            area: None,
            duration: None,
            price: None,
            images: None,
            description: None,
            testimonial: None,
            foreman_name: None,
            foreman_phone: None,
            stage: None,
            featured: None,
            status: None,
        };
        assert!(validate_update_request(&req).is_ok());
    }

    #[test]
    fn test_update_validation_checks_supplied_fields() {
        let req = UpdateCaseRequest {
            title: None,
            location: None,
            style: None,
            area: Some(-5.0),
            duration: None,
            price: None,
            images: None,
            description: None,
            testimonial: None,
            foreman_name: None,
            foreman_phone: None,
            stage: None,
            featured: None,
            status: None,
        };
        assert!(validate_update_request(&req).is_err());
    }
}
