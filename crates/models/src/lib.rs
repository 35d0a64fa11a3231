use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Stored documents
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CostRecord {
	pub id: String,
	pub description: String,
	pub category: String,
	#[serde(rename = "userid")]
	pub owner_id: String,
	#[serde(rename = "sum")]
	pub amount: f64,
	// Optional because a hand-edited store document may lack it; always set
	// on records created through the API.
	#[serde(rename = "date", default)]
	pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
	pub id: String,
	pub first_name: String,
	pub last_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub birthday: Option<NaiveDate>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub marital_status: Option<String>,
}

// Report models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportItem {
	pub description: String,
	#[serde(rename = "sum")]
	pub amount: f64,
	pub day: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CategoryGroup {
	pub category: String,
	#[serde(rename = "totalAmount")]
	pub total_amount: f64,
	pub items: Vec<ReportItem>,
}

/// Materialized per-user, per-month aggregate. At most one exists per
/// (owner_id, year, month).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlyReport {
	#[serde(rename = "userid")]
	pub owner_id: String,
	pub year: i32,
	pub month: u32,
	pub costs: Vec<CategoryGroup>,
	#[serde(rename = "createdAt")]
	pub created_at: DateTime<Utc>,
}

impl MonthlyReport {
	pub fn total_amount(&self) -> f64 {
		self.costs.iter().map(|group| group.total_amount).sum()
	}
}
