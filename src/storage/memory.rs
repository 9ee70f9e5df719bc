//! In-process store. Used for local runs without a database and by the test suites.

use crate::domain::{
    ListRequest, ResultPage, ShipmentId, ShipmentRecord, ShipmentWrite, SortColumn,
};
use crate::storage::{ShipmentStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    rows: Vec<ShipmentRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows; new ids continue after the highest one.
    pub fn with_records(rows: Vec<ShipmentRecord>) -> Self {
        let next_id = rows.iter().map(|r| r.id.0).max().unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState { next_id, rows }),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: ShipmentId) -> Option<ShipmentRecord> {
        let state = self.state.lock().await;
        state.rows.iter().find(|r| r.id == id).cloned()
    }
}

fn compare(a: &ShipmentRecord, b: &ShipmentRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        SortColumn::IsFragile => a.is_fragile.cmp(&b.is_fragile),
        SortColumn::WeightKg => a.weight_kg.total_cmp(&b.weight_kg),
        SortColumn::DistanceKm => a.distance_km.total_cmp(&b.distance_km),
        SortColumn::ShippingCost => a.shipping_cost.total_cmp(&b.shipping_cost),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn matches(record: &ShipmentRecord, request: &ListRequest) -> bool {
    if let Some(status) = request.filter.status {
        if record.status != status {
            return false;
        }
    }
    match &request.filter.title_contains {
        Some(term) => record.title.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl ShipmentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError> {
        let state = self.state.lock().await;
        let mut hits: Vec<&ShipmentRecord> =
            state.rows.iter().filter(|r| matches(r, request)).collect();

        hits.sort_by(|a, b| {
            let ord = compare(a, b, request.sort.column).then_with(|| a.id.cmp(&b.id));
            if request.sort.direction.is_ascending() {
                ord
            } else {
                ord.reverse()
            }
        });

        let total_count = hits.len() as u64;
        let records = hits
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok(ResultPage {
            records,
            total_count,
        })
    }

    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = ShipmentId(state.next_id);
        state.rows.push(row.clone().into_record(id, Utc::now()));
        Ok(id)
    }

    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let existing = state
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *existing = row.clone().into_record(id, existing.created_at);
        Ok(())
    }

    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        if state.rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
