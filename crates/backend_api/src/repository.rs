use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{CostRecord, MonthlyReport, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::Result;

/// Repository trait for the cost record collection.
/// This abstraction allows swapping between file-based and database-backed implementations
#[async_trait]
pub trait CostRepository: Send + Sync {
    async fn save_cost(&self, cost: CostRecord) -> Result<CostRecord>;
    /// Costs for an owner with `occurred_at` in `[from, to)`.
    async fn find_costs_in_range(
        &self,
        owner_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CostRecord>>;
    /// All costs for an owner, no date bound.
    async fn find_costs_by_owner(&self, owner_id: &str) -> Result<Vec<CostRecord>>;
}

/// Repository trait for the pre-seeded user directory. Read-only.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, external_id: &str) -> Result<Option<UserProfile>>;
}

/// Repository trait for materialized monthly reports, keyed by
/// (owner_id, year, month).
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn get_report(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlyReport>>;
    /// Insert or replace the report for the report's (owner, year, month) key.
    async fn save_report(&self, report: MonthlyReport) -> Result<()>;
}

/// On-disk shape of the document store: a single JSON file holding the
/// three collections.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseFile {
    #[serde(default)]
    pub costs: Vec<CostRecord>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub reports: Vec<MonthlyReport>,
}

/// File-based implementation that reads/writes all collections from one
/// database.json. Mutations hold the write lock across the whole
/// load-modify-save cycle so concurrent appends cannot lose updates.
pub struct FileDocumentStore {
    database_path: PathBuf,
    lock: RwLock<()>,
}

impl FileDocumentStore {
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    async fn load_database(&self) -> Result<DatabaseFile> {
        let content = tokio::fs::read_to_string(&self.database_path).await?;
        let database: DatabaseFile = serde_json::from_str(&content)?;
        Ok(database)
    }

    async fn save_database(&self, database: &DatabaseFile) -> Result<()> {
        let content = serde_json::to_string_pretty(database)?;
        tokio::fs::write(&self.database_path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl CostRepository for FileDocumentStore {
    async fn save_cost(&self, cost: CostRecord) -> Result<CostRecord> {
        let _guard = self.lock.write().await;
        let mut database = self.load_database().await?;
        database.costs.push(cost.clone());
        self.save_database(&database).await?;
        Ok(cost)
    }

    async fn find_costs_in_range(
        &self,
        owner_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CostRecord>> {
        let _guard = self.lock.read().await;
        let database = self.load_database().await?;
        let costs = database
            .costs
            .into_iter()
            .filter(|c| {
                c.owner_id == owner_id
                    && c.occurred_at
                        .map(|at| at >= from && at < to)
                        .unwrap_or(false)
            })
            .collect();
        Ok(costs)
    }

    async fn find_costs_by_owner(&self, owner_id: &str) -> Result<Vec<CostRecord>> {
        let _guard = self.lock.read().await;
        let database = self.load_database().await?;
        Ok(database
            .costs
            .into_iter()
            .filter(|c| c.owner_id == owner_id)
            .collect())
    }
}

#[async_trait]
impl UserRepository for FileDocumentStore {
    async fn get_user(&self, external_id: &str) -> Result<Option<UserProfile>> {
        let _guard = self.lock.read().await;
        let database = self.load_database().await?;
        Ok(database.users.into_iter().find(|u| u.id == external_id))
    }
}

#[async_trait]
impl ReportRepository for FileDocumentStore {
    async fn get_report(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlyReport>> {
        let _guard = self.lock.read().await;
        let database = self.load_database().await?;
        Ok(database
            .reports
            .into_iter()
            .find(|r| r.owner_id == owner_id && r.year == year && r.month == month))
    }

    async fn save_report(&self, report: MonthlyReport) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut database = self.load_database().await?;
        match database.reports.iter().position(|r| {
            r.owner_id == report.owner_id && r.year == report.year && r.month == report.month
        }) {
            Some(index) => database.reports[index] = report,
            None => database.reports.push(report),
        }
        self.save_database(&database).await
    }
}
