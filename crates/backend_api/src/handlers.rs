use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    reports,
    repository::{CostRepository, ReportRepository, UserRepository},
    Result,
};

/// Shared handler state: one store handle per persistence port, injected at
/// startup rather than referenced as a module-level singleton.
#[derive(Clone)]
pub struct AppState {
    pub costs: Arc<dyn CostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

const MISSING_FIELDS: &str = "Missing required fields: description, category, userid, or sum";

#[derive(Debug, Deserialize)]
pub struct AddCostRequest {
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "userid")]
    pub owner_id: Option<String>,
    pub sum: Option<f64>,
    pub date: Option<String>,
}

/// Accepts RFC 3339 or plain YYYY-MM-DD (midnight UTC).
fn parse_request_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
        .map_err(|_| ApiError::Validation(format!("Invalid date format: {}", raw)))
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// POST /api/add
/// Persists a new cost record, then best-effort appends it to the month's
/// report if one has already been materialized.
pub async fn add_cost(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddCostRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = payload.map_err(|rejection| {
        // Malformed body or wrong field type (e.g. a non-numeric sum)
        ApiError::Validation(rejection.body_text())
    })?;

    let (Some(description), Some(category), Some(owner_id), Some(amount)) = (
        required(request.description),
        required(request.category),
        required(request.owner_id),
        request.sum,
    ) else {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    };

    if amount < 0.0 {
        return Err(ApiError::Validation("Sum cannot be negative".to_string()));
    }

    let occurred_at = match request.date.as_deref() {
        Some(raw) => parse_request_date(raw)?,
        None => Utc::now(),
    };

    let cost = models::CostRecord {
        id: Uuid::new_v4().to_string(),
        description,
        category,
        owner_id,
        amount,
        occurred_at: Some(occurred_at),
    };

    let saved = state.costs.save_cost(cost).await?;

    // Cache maintenance is decoupled from the write: a failure here is
    // logged, never surfaced, and never rolls back the saved record.
    if let Err(err) = reports::append_to_existing_report(state.reports.as_ref(), &saved).await {
        tracing::warn!(error = %err, cost_id = %saved.id, "failed to append cost to existing report");
    }

    Ok((StatusCode::CREATED, Json(saved)))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// GET /api/report?id=&year=&month=
/// Returns the materialized monthly report for a user, computing and
/// persisting it on first read.
pub async fn get_monthly_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let (Some(id), Some(year), Some(month)) = (query.id, query.year, query.month) else {
        return Err(ApiError::Validation(
            "Missing required query parameters".to_string(),
        ));
    };

    let year: i32 = year
        .parse()
        .map_err(|_| ApiError::Validation("Invalid year or month".to_string()))?;
    let month: u32 = month
        .parse()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ApiError::Validation("Invalid year or month".to_string()))?;

    let report = reports::materialize_report(
        state.costs.as_ref(),
        state.reports.as_ref(),
        &id,
        year,
        month,
    )
    .await?;

    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct UserDetailsResponse {
    pub first_name: String,
    pub last_name: String,
    pub id: String,
    pub total: f64,
}

/// GET /api/users/:id
/// Returns the user's profile fields plus their all-time total spend.
pub async fn get_user_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state
        .users
        .get_user(&id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let costs = state.costs.find_costs_by_owner(&id).await?;
    let total: f64 = costs.iter().map(|c| c.amount).sum();

    Ok(Json(UserDetailsResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        id: user.id,
        total,
    }))
}

#[derive(Debug, Serialize)]
pub struct AboutMember {
    pub first_name: &'static str,
    pub last_name: &'static str,
}

const TEAM_MEMBERS: [(&str, &str); 2] = [("Dvir", "Uliel"), ("Moriya", "Shalom")];

/// GET /api/about
/// Static team roster.
pub async fn get_about() -> impl IntoResponse {
    let members: Vec<AboutMember> = TEAM_MEMBERS
        .iter()
        .map(|&(first_name, last_name)| AboutMember {
            first_name,
            last_name,
        })
        .collect();
    Json(members)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cost-api"
    }))
}

/// Fallback for unknown paths and unsupported methods.
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
