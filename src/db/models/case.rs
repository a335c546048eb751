//! Portfolio case models, DTOs and list queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::{parse_string_list, QueryArg};

/// A renovation case as stored. Image URLs live in a JSON TEXT column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub location: String,
    pub style: String,
    pub area: f64,
    pub duration: i64,
    pub price: f64,
    /// JSON array of image URLs
    pub images: String,
    pub description: String,
    pub testimonial: String,
    pub foreman_name: String,
    pub foreman_phone: String,
    pub stage: String,
    pub featured: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Wire representation of a case with decoded images and a real boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResponse {
    pub id: String,
    pub title: String,
    pub location: String,
    pub style: String,
    pub area: f64,
    pub duration: i64,
    pub price: f64,
    pub images: Vec<String>,
    pub description: String,
    pub testimonial: String,
    pub foreman_name: String,
    pub foreman_phone: String,
    pub stage: String,
    pub featured: bool,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Case> for CaseResponse {
    fn from(case: Case) -> Self {
        let images = parse_string_list(&case.images);
        Self {
            id: case.id,
            title: case.title,
            location: case.location,
            style: case.style,
            area: case.area,
            duration: case.duration,
            price: case.price,
            images,
            description: case.description,
            testimonial: case.testimonial,
            foreman_name: case.foreman_name,
            foreman_phone: case.foreman_phone,
            stage: case.stage,
            featured: case.featured != 0,
            status: case.status,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Body for creating a case. Fields are optional so that validation can
/// enumerate every missing field in one response instead of failing on the
/// first deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub style: Option<String>,
    pub area: Option<f64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub testimonial: Option<String>,
    pub foreman_name: Option<String>,
    pub foreman_phone: Option<String>,
    pub stage: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

/// Body for a partial case update. Only supplied fields are touched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub style: Option<String>,
    pub area: Option<f64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub testimonial: Option<String>,
    pub foreman_name: Option<String>,
    pub foreman_phone: Option<String>,
    pub stage: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

/// Query parameters for listing cases. Wire names are camelCase to match the
/// gallery frontend.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CaseQuery {
    /// Filter by renovation style (exact match)
    pub style: Option<String>,
    /// Inclusive area range bounds (㎡)
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    /// Inclusive price range bounds (万)
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Filter by publication status (exact match)
    pub status: Option<String>,
    /// When true, return featured cases only
    pub featured: Option<bool>,
    /// Back office only: lift the published-only default
    pub include_all: Option<bool>,
}

/// Build the WHERE clauses and bind arguments for a case listing.
///
/// When neither a status filter nor `include_all` is given, the listing is
/// forced to published cases so drafts never leak into the public gallery.
fn build_case_filters(query: &CaseQuery) -> (Vec<&'static str>, Vec<QueryArg>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        args.push(QueryArg::Text(status.clone()));
    } else if !query.include_all.unwrap_or(false) {
        conditions.push("status = ?");
        args.push(QueryArg::Text("published".to_string()));
    }

    if let Some(style) = &query.style {
        conditions.push("style = ?");
        args.push(QueryArg::Text(style.clone()));
    }

    if let Some(min_area) = query.min_area {
        conditions.push("area >= ?");
        args.push(QueryArg::Real(min_area));
    }

    if let Some(max_area) = query.max_area {
        conditions.push("area <= ?");
        args.push(QueryArg::Real(max_area));
    }

    if let Some(min_price) = query.min_price {
        conditions.push("price >= ?");
        args.push(QueryArg::Real(min_price));
    }

    if let Some(max_price) = query.max_price {
        conditions.push("price <= ?");
        args.push(QueryArg::Real(max_price));
    }

    // Featured is a narrowing filter only; featured=false means "no filter"
    if query.featured == Some(true) {
        conditions.push("featured = ?");
        args.push(QueryArg::Int(1));
    }

    (conditions, args)
}

/// List cases matching the filter, featured first, newest first.
pub async fn list_cases(db: &SqlitePool, query: &CaseQuery) -> Result<Vec<Case>, sqlx::Error> {
    let (conditions, args) = build_case_filters(query);

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT * FROM cases {} ORDER BY featured DESC, created_at DESC",
        where_clause
    );

    let mut q = sqlx::query_as::<_, Case>(&sql);
    for arg in &args {
        q = match arg {
            QueryArg::Text(s) => q.bind(s.clone()),
            QueryArg::Int(i) => q.bind(*i),
            QueryArg::Real(r) => q.bind(*r),
        };
    }

    q.fetch_all(db).await
}

/// Fetch a single case by id.
pub async fn get_case_by_id(db: &SqlitePool, id: &str) -> Result<Option<Case>, sqlx::Error> {
    sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}
