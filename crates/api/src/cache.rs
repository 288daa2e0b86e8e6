//! # Slot Cache
//!
//! Keeps the fetched inputs of the slot calculator per doctor, clinic and
//! date. The cached value is the `DaySchedule`, not the computed slots, so the
//! current time is re-applied on every read.
//!
//! Entries expire after a fixed TTL and are dropped explicitly when the data
//! behind them changes:
//!
//! - a booking or cancellation invalidates its own `(doctor, clinic, date)`
//! - an availability edit or a time-off change invalidates every entry of the doctor
//!
//! Every invalidation bumps a generation counter. A reader that missed takes
//! the generation before fetching and hands it back to `insert`, which refuses
//! the schedule if an invalidation happened in between.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use chrono::NaiveDate;
use clinic_slots_core::models::DaySchedule;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotCacheKey {
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
}

impl SlotCacheKey {
    pub fn new(doctor_id: Uuid, clinic_id: Uuid, date: NaiveDate) -> Self {
        Self {
            doctor_id,
            clinic_id,
            date,
        }
    }
}

struct CacheEntry {
    schedule: DaySchedule,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<SlotCacheKey, CacheEntry>,
    generation: u64,
}

pub struct SlotCache {
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl SlotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Generation to pass to `insert` for a schedule fetched after this call.
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Returns the cached schedule if it is younger than the TTL.
    pub async fn get(&self, key: &SlotCacheKey) -> Option<DaySchedule> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.schedule.clone())
    }

    /// Stores `schedule` unless the cache was invalidated since `generation`
    /// was read. Returns whether the schedule was stored.
    pub async fn insert(&self, key: SlotCacheKey, schedule: DaySchedule, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                "Discarding schedule fetched before an invalidation: doctor={}, clinic={}, date={}",
                key.doctor_id, key.clinic_id, key.date
            );
            return false;
        }

        // Expired entries are only ever read as misses, so drop them while we hold the lock.
        let ttl = self.ttl;
        state
            .entries
            .retain(|_, entry| entry.stored_at.elapsed() < ttl);
        state.entries.insert(
            key,
            CacheEntry {
                schedule,
                stored_at: Instant::now(),
            },
        );
        true
    }

    pub async fn invalidate(&self, key: &SlotCacheKey) -> bool {
        let mut state = self.state.write().await;
        state.generation += 1;
        let removed = state.entries.remove(key).is_some();
        debug!(
            "Slot cache invalidated: doctor={}, clinic={}, date={}, hit={}",
            key.doctor_id, key.clinic_id, key.date, removed
        );
        removed
    }

    /// Drops every entry of `doctor_id`, across clinics and dates.
    pub async fn invalidate_doctor(&self, doctor_id: Uuid) -> usize {
        let mut state = self.state.write().await;
        state.generation += 1;
        let before = state.entries.len();
        state.entries.retain(|key, _| key.doctor_id != doctor_id);
        let removed = before - state.entries.len();
        debug!(
            "Slot cache invalidated for doctor={}: {} entries",
            doctor_id, removed
        );
        removed
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}
