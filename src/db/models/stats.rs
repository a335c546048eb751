//! Dashboard statistics aggregation.
//!
//! Every number on the admin dashboard comes from an independent read-only
//! sub-query, so the aggregator fans them out concurrently and merges the
//! results. The snapshot may straddle concurrent writes; the dashboard is
//! advisory, not transactional.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Summary payload for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cases: i64,
    pub published_cases: i64,
    pub draft_cases: i64,
    pub featured_cases: i64,
    pub total_leads: i64,
    /// Leads with score ≥ 90 (grade A)
    pub high_score_leads: i64,
    pub pending_leads: i64,
    pub scheduled_leads: i64,
    pub closed_leads: i64,
    /// closed / total, pre-formatted with one decimal place, e.g. "12.5%"
    pub conversion_rate: String,
    /// Mean lead score rounded to the nearest integer, 0 with no leads
    pub average_lead_score: i64,
}

async fn scalar_count(db: &SqlitePool, sql: &'static str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(db).await
}

async fn lead_status_counts(db: &SqlitePool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT status, COUNT(*) FROM leads GROUP BY status")
        .fetch_all(db)
        .await
}

async fn average_lead_score(db: &SqlitePool) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar("SELECT AVG(score) FROM leads")
        .fetch_one(db)
        .await
}

/// Count for one status value; statuses absent from the data count 0.
fn status_count(counts: &[(String, i64)], status: &str) -> i64 {
    counts
        .iter()
        .find(|(s, _)| s == status)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Format closed/total as a percentage with one decimal place. A dataset with
/// no leads reports "0.0%" rather than dividing by zero.
fn format_conversion_rate(closed: i64, total: i64) -> String {
    if total > 0 {
        format!("{:.1}%", closed as f64 / total as f64 * 100.0)
    } else {
        "0.0%".to_string()
    }
}

/// Round a mean score to the nearest integer, treating no-rows as 0.
fn round_average(average: Option<f64>) -> i64 {
    average.map(|a| a.round() as i64).unwrap_or(0)
}

/// Compute the dashboard summary with all sub-queries running concurrently.
pub async fn compute_dashboard_stats(db: &SqlitePool) -> Result<DashboardStats, sqlx::Error> {
    let (
        total_cases,
        published_cases,
        draft_cases,
        featured_cases,
        total_leads,
        high_score_leads,
        leads_by_status,
        average,
    ) = tokio::try_join!(
        scalar_count(db, "SELECT COUNT(*) FROM cases"),
        scalar_count(db, "SELECT COUNT(*) FROM cases WHERE status = 'published'"),
        scalar_count(db, "SELECT COUNT(*) FROM cases WHERE status = 'draft'"),
        scalar_count(db, "SELECT COUNT(*) FROM cases WHERE featured = 1"),
        scalar_count(db, "SELECT COUNT(*) FROM leads"),
        scalar_count(db, "SELECT COUNT(*) FROM leads WHERE score >= 90"),
        lead_status_counts(db),
        average_lead_score(db),
    )?;

    let closed_leads = status_count(&leads_by_status, "closed");

    Ok(DashboardStats {
        total_cases,
        published_cases,
        draft_cases,
        featured_cases,
        total_leads,
        high_score_leads,
        pending_leads: status_count(&leads_by_status, "pending"),
        scheduled_leads: status_count(&leads_by_status, "scheduled"),
        closed_leads,
        conversion_rate: format_conversion_rate(closed_leads, total_leads),
        average_lead_score: round_average(average),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rate_zero_guard() {
        assert_eq!(format_conversion_rate(0, 0), "0.0%");
    }

    #[test]
    fn test_conversion_rate_one_decimal() {
        assert_eq!(format_conversion_rate(1, 8), "12.5%");
        assert_eq!(format_conversion_rate(1, 3), "33.3%");
        assert_eq!(format_conversion_rate(3, 3), "100.0%");
        assert_eq!(format_conversion_rate(0, 5), "0.0%");
    }

    #[test]
    fn test_round_average() {
        assert_eq!(round_average(None), 0);
        assert_eq!(round_average(Some(82.4)), 82);
        assert_eq!(round_average(Some(82.5)), 83);
        assert_eq!(round_average(Some(90.0)), 90);
    }

    #[test]
    fn test_status_count_missing_status_is_zero() {
        let counts = vec![("pending".to_string(), 4), ("closed".to_string(), 2)];
        assert_eq!(status_count(&counts, "pending"), 4);
        assert_eq!(status_count(&counts, "closed"), 2);
        assert_eq!(status_count(&counts, "scheduled"), 0);
    }
}
