//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use shipment_catalog::domain::{
    compute_cost, ListRequest, ResultPage, ShipmentId, ShipmentRecord, ShipmentStatus,
    ShipmentWrite,
};
use shipment_catalog::storage::{MemoryStore, ShipmentStore, StoreError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A record created `age_minutes` before a fixed instant, so `created_at` ordering is stable.
pub fn record(
    id: i64,
    title: &str,
    status: ShipmentStatus,
    weight_kg: f64,
    distance_km: f64,
    is_fragile: bool,
    age_minutes: i64,
) -> ShipmentRecord {
    let anchor = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ShipmentRecord {
        id: ShipmentId(id),
        title: title.to_string(),
        status,
        is_fragile,
        weight_kg,
        distance_km,
        shipping_cost: compute_cost(weight_kg, distance_km, is_fragile),
        created_at: anchor - Duration::minutes(age_minutes),
    }
}

/// Twelve shipments; id 12 is the newest.
pub fn fleet() -> Vec<ShipmentRecord> {
    use ShipmentStatus::*;
    vec![
        record(1, "Glass panels", Pending, 120.0, 300.0, true, 12),
        record(2, "Laptops", InTransit, 15.0, 820.0, true, 11),
        record(3, "Office chairs", Delivered, 60.0, 40.0, false, 10),
        record(4, "Wine crates", InTransit, 200.0, 1500.0, true, 9),
        record(5, "Textbooks", Pending, 35.0, 220.0, false, 8),
        record(6, "Server racks", Failed, 480.0, 75.0, false, 7),
        record(7, "Stained glass", Delivered, 22.0, 610.0, true, 6),
        record(8, "Bicycle parts", Pending, 18.5, 95.0, false, 5),
        record(9, "Medical kits", InTransit, 9.0, 1200.0, false, 4),
        record(10, "Coffee beans", Delivered, 70.0, 2400.0, false, 3),
        record(11, "Glassware", Pending, 12.0, 30.0, true, 2),
        record(12, "Ceramic vases", InTransit, 25.0, 510.0, true, 1),
    ]
}

/// Wraps [`MemoryStore`], counting calls and failing on demand.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    lists: AtomicUsize,
    inserts: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn with_records(rows: Vec<ShipmentRecord>) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::with_records(rows),
            ..Self::default()
        })
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.inserts() + self.updates() + self.deletes()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShipmentStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_reads)?;
        self.inner.list(request).await
    }

    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_writes)?;
        self.inner.insert(row).await
    }

    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_writes)?;
        self.inner.update(id, row).await
    }

    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_writes)?;
        self.inner.delete(id).await
    }
}

/// Wraps [`MemoryStore`]. While held, every listing parks until [`GatedStore::release`] lets
/// it through; writes are never held.
pub struct GatedStore {
    pub inner: MemoryStore,
    held: AtomicBool,
    gate: Semaphore,
    waiting: AtomicUsize,
}

impl GatedStore {
    pub fn with_records(rows: Vec<ShipmentRecord>) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::with_records(rows),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        })
    }

    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self, reads: usize) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.add_permits(reads);
    }

    /// Listings that have reached the gate since it was first held.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Polls until `count` listings are parked at the gate.
    pub async fn wait_for(&self, count: usize) {
        let parked = async {
            while self.waiting() < count {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(5), parked)
            .await
            .expect("reads never reached the gate");
    }
}

#[async_trait]
impl ShipmentStore for GatedStore {
    fn backend(&self) -> &'static str {
        "gated"
    }

    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError> {
        if self.held.load(Ordering::SeqCst) {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
        self.inner.list(request).await
    }

    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError> {
        self.inner.insert(row).await
    }

    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError> {
        self.inner.update(id, row).await
    }

    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

pub fn titles(page: &ResultPage) -> Vec<&str> {
    page.records.iter().map(|r| r.title.as_str()).collect()
}
