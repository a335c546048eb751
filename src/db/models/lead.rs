//! Lead models, DTOs and list queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::{parse_string_list, QueryArg};
use crate::scoring::Grade;

/// A captured lead as stored. Style preferences live in a JSON TEXT column.
/// The score is written once at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub property_type: String,
    pub area: f64,
    pub budget: f64,
    /// JSON array of style values
    pub styles: String,
    pub stage: String,
    pub timeline: String,
    pub score: i64,
    pub status: String,
    pub submitted_at: String,
    pub updated_at: String,
}

/// Wire representation of a lead with decoded styles and the derived grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub property_type: String,
    pub area: f64,
    pub budget: f64,
    pub styles: Vec<String>,
    pub stage: String,
    pub timeline: String,
    pub score: i64,
    pub grade: String,
    pub status: String,
    pub submitted_at: String,
    pub updated_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        let styles = parse_string_list(&lead.styles);
        let grade = Grade::from_score(lead.score).as_str().to_string();
        Self {
            id: lead.id,
            name: lead.name,
            phone: lead.phone,
            property_type: lead.property_type,
            area: lead.area,
            budget: lead.budget,
            styles,
            stage: lead.stage,
            timeline: lead.timeline,
            score: lead.score,
            grade,
            status: lead.status,
            submitted_at: lead.submitted_at,
            updated_at: lead.updated_at,
        }
    }
}

/// Body for the public wizard submission. Fields are optional so that
/// validation can enumerate every missing field in one response; any
/// caller-supplied score is ignored by construction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub property_type: Option<String>,
    pub area: Option<f64>,
    pub budget: Option<f64>,
    pub styles: Option<Vec<String>>,
    pub stage: Option<String>,
    pub timeline: Option<String>,
}

/// Body for the admin lead update. Status is the only mutable field.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
}

/// Query parameters for listing leads (back office).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    /// Filter by follow-up status (exact match)
    pub status: Option<String>,
    /// Inclusive score range bounds
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    /// Sort key: "score" or "submittedAt" (anything else falls back to score)
    pub sort_by: Option<String>,
    /// Sort direction: "asc" or "desc" (default desc)
    pub order: Option<String>,
}

fn build_lead_filters(query: &LeadQuery) -> (Vec<&'static str>, Vec<QueryArg>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        args.push(QueryArg::Text(status.clone()));
    }

    if let Some(min_score) = query.min_score {
        conditions.push("score >= ?");
        args.push(QueryArg::Int(min_score));
    }

    if let Some(max_score) = query.max_score {
        conditions.push("score <= ?");
        args.push(QueryArg::Int(max_score));
    }

    (conditions, args)
}

/// Resolve the ORDER BY clause for a lead listing.
///
/// The sort key and direction are whitelisted here, never interpolated from
/// raw input. An unrecognized key falls back to score descending, and the
/// submission time is always the final tiebreak so equal keys order
/// deterministically.
fn build_lead_order(query: &LeadQuery) -> String {
    let direction = match query.order.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };

    let primary = match query.sort_by.as_deref() {
        Some("submittedAt") => format!("submitted_at {}", direction),
        Some("score") => format!("score {}", direction),
        _ => "score DESC".to_string(),
    };

    format!("{}, submitted_at DESC", primary)
}

/// List leads matching the filter in the requested order.
pub async fn list_leads(db: &SqlitePool, query: &LeadQuery) -> Result<Vec<Lead>, sqlx::Error> {
    let (conditions, args) = build_lead_filters(query);

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT * FROM leads {} ORDER BY {}",
        where_clause,
        build_lead_order(query)
    );

    let mut q = sqlx::query_as::<_, Lead>(&sql);
    for arg in &args {
        q = match arg {
            QueryArg::Text(s) => q.bind(s.clone()),
            QueryArg::Int(i) => q.bind(*i),
            QueryArg::Real(r) => q.bind(*r),
        };
    }

    q.fetch_all(db).await
}

/// Fetch a single lead by id.
pub async fn get_lead_by_id(db: &SqlitePool, id: &str) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}
