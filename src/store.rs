//! Record store seam.
//!
//! Investments are persisted as flat [`InvestmentRecord`]s. The helpers here
//! convert them at the boundary, value them and write scheme configuration
//! back only after it has been checked.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::config::{check_configuration, SchemeConfig};
use crate::engine::calculate;
use crate::errors::{Result, ValuationError};
use crate::investment::{InvestmentRecord, InvestmentSnapshot};
use crate::result::CalculationResult;
use crate::types::InvestmentId;

/// Trait for investment record storage
pub trait InvestmentStore: Send + Sync {
    fn get_investment(&self, id: InvestmentId) -> Result<InvestmentRecord>;
    fn list_investments(&self) -> Result<Vec<InvestmentRecord>>;
    /// replace an existing record; unknown ids are an error
    fn update_investment(&self, record: InvestmentRecord) -> Result<InvestmentRecord>;
}

/// store backed by a map, for tests and demos
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<InvestmentId, InvestmentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: InvestmentRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id, record);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InvestmentStore for InMemoryStore {
    fn get_investment(&self, id: InvestmentId) -> Result<InvestmentRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(ValuationError::InvestmentNotFound { id })
    }

    fn list_investments(&self) -> Result<Vec<InvestmentRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut list: Vec<InvestmentRecord> = records.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    fn update_investment(&self, record: InvestmentRecord) -> Result<InvestmentRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record)
            }
            None => Err(ValuationError::InvestmentNotFound { id: record.id }),
        }
    }
}

/// load, convert and value one investment
pub fn value_investment(
    store: &dyn InvestmentStore,
    id: InvestmentId,
    today: NaiveDate,
) -> Result<Option<CalculationResult>> {
    let snapshot = InvestmentSnapshot::try_from(store.get_investment(id)?)?;
    Ok(calculate(&snapshot, today))
}

/// value every recurring investment in the store.
///
/// Records that fail conversion are logged and left out rather than failing
/// the whole portfolio.
pub fn value_portfolio(store: &dyn InvestmentStore, today: NaiveDate) -> Result<Vec<(InvestmentId, CalculationResult)>> {
    let mut results = Vec::new();

    for record in store.list_investments()? {
        let id = record.id;
        let snapshot = match InvestmentSnapshot::try_from(record) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("skipping investment {}: {}", id, e);
                continue;
            }
        };
        if let Some(result) = calculate(&snapshot, today) {
            results.push((id, result));
        }
    }

    log::debug!("valued {} investments as of {}", results.len(), today);
    Ok(results)
}

/// persist a scheme configuration after checking it.
///
/// Rejected configurations leave the stored record as it was.
pub fn save_scheme_config(
    store: &dyn InvestmentStore,
    id: InvestmentId,
    config: SchemeConfig,
) -> Result<InvestmentRecord> {
    let mut record = store.get_investment(id)?;
    if !record.is_recurring {
        return Err(ValuationError::NotRecurring { id });
    }

    if let Err(e) = check_configuration(&config) {
        log::warn!("not saving scheme configuration for {}: {}", id, e);
        return Err(e);
    }

    record.scheme_config = Some(config);
    store.update_investment(record)
}
