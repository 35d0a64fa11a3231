use chrono::{DateTime, Datelike, TimeZone, Utc};
use models::{CategoryGroup, CostRecord, MonthlyReport, ReportItem};
use report_engine::group_costs_by_category;

use crate::{
    error::ApiError,
    repository::{CostRepository, ReportRepository},
    Result,
};

/// UTC instants `[start of month, start of next month)`, or `None` for an
/// out-of-range year/month.
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let from = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let to = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()?;
    Some((from, to))
}

/// Read-through, write-back materialization of a monthly report.
///
/// Returns the stored report unchanged when one exists. On a miss, groups
/// the month's cost records, persists the result, and returns it. A month
/// with no matching records is a not-found, never an empty report.
pub async fn materialize_report(
    costs: &dyn CostRepository,
    reports: &dyn ReportRepository,
    owner_id: &str,
    year: i32,
    month: u32,
) -> Result<MonthlyReport> {
    if let Some(report) = reports.get_report(owner_id, year, month).await? {
        return Ok(report);
    }

    let (from, to) = month_bounds(year, month)
        .ok_or_else(|| ApiError::Validation("Invalid year or month".to_string()))?;

    let matched = costs.find_costs_in_range(owner_id, from, to).await?;
    if matched.is_empty() {
        return Err(ApiError::ReportNotFound);
    }

    let report = MonthlyReport {
        owner_id: owner_id.to_string(),
        year,
        month,
        costs: group_costs_by_category(&matched)?,
        created_at: Utc::now(),
    };
    reports.save_report(report.clone()).await?;

    Ok(report)
}

/// Appends a freshly saved cost record to its month's report, if one has
/// already been materialized. Never creates a report; a miss is a no-op
/// (the month will be materialized lazily on the next read).
pub async fn append_to_existing_report(
    reports: &dyn ReportRepository,
    cost: &CostRecord,
) -> Result<()> {
    let occurred_at = cost
        .occurred_at
        .ok_or_else(|| ApiError::DataIntegrity("cost record has no date".to_string()))?;
    let (year, month) = (occurred_at.year(), occurred_at.month());

    let Some(mut report) = reports.get_report(&cost.owner_id, year, month).await? else {
        return Ok(());
    };

    let item = ReportItem {
        description: cost.description.clone(),
        amount: cost.amount,
        day: occurred_at.day(),
    };
    match report.costs.iter_mut().find(|g| g.category == cost.category) {
        Some(group) => {
            group.total_amount += cost.amount;
            group.items.push(item);
        }
        None => report.costs.push(CategoryGroup {
            category: cost.category.clone(),
            total_amount: cost.amount,
            items: vec![item],
        }),
    }

    reports.save_report(report).await
}
