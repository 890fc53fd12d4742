// src/repository.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::backend::{BackendError, Query, RowSource};
use crate::domain::construction::{COL_CITY, COL_LICENSE_TYPE};
use crate::domain::{Construction, ConstructionFilter};

/// Read-only access to the construction view. Failures are propagated as
/// `BackendError`; callers decide how to degrade.
#[derive(Clone)]
pub struct ConstructionRepository {
    source: Arc<dyn RowSource>,
}

impl ConstructionRepository {
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self { source }
    }

    pub fn fetch_all(&self) -> Result<Vec<Construction>, BackendError> {
        let rows = self.select(&Query::new(), "fetch_all")?;
        Ok(map_rows(&rows))
    }

    pub fn fetch_cities(&self) -> Result<Vec<String>, BackendError> {
        self.distinct(COL_CITY)
    }

    pub fn fetch_license_types(&self) -> Result<Vec<String>, BackendError> {
        self.distinct(COL_LICENSE_TYPE)
    }

    pub fn filter(&self, criteria: &ConstructionFilter) -> Result<Vec<Construction>, BackendError> {
        let rows = self.select(&criteria.to_query(), "filter")?;
        let records = map_rows(&rows);
        info!(count = records.len(), "filtered constructions");
        Ok(records)
    }

    fn select(&self, query: &Query, op: &'static str) -> Result<Vec<Value>, BackendError> {
        self.source.select(query).map_err(|e| {
            error!(op, error = %e, "construction query failed");
            e
        })
    }

    /// Sorted unique non-blank values of one text column.
    fn distinct(&self, column: &str) -> Result<Vec<String>, BackendError> {
        let rows = self.select(&Query::new().select([column]), "distinct")?;

        let values: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        Ok(values.into_iter().collect())
    }
}

fn map_rows(rows: &[Value]) -> Vec<Construction> {
    rows.iter().map(Construction::from_row).collect()
}
