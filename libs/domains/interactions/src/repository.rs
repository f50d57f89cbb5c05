//! Interaction repository trait and the project-name lookup port

use crate::error::Result;
use crate::models::{
    ContactItemCount, DailyVisitCount, InteractionEvent, InteractionFilter, ProjectPopularityRow,
    VisitorTotals,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Repository trait for the append-only event store.
///
/// Deliberately exposes no update or delete: events are written once and
/// only ever read back, individually or through the aggregations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Persist one event
    async fn insert(&self, event: InteractionEvent) -> Result<InteractionEvent>;

    /// List events, newest first, with filtering and pagination
    async fn list(&self, filter: &InteractionFilter) -> Result<Vec<InteractionEvent>>;

    /// Count of events per event type
    async fn event_type_counts(&self) -> Result<BTreeMap<String, u64>>;

    /// Per-project TAPE_INSERTED / LAUNCH_CLICKED counts, sorted descending
    /// by combined total, truncated to `limit` entries
    async fn project_popularity(&self, limit: i64) -> Result<Vec<ProjectPopularityRow>>;

    /// ITEM_INSPECTED counts per item type, sorted descending by count
    async fn contact_item_stats(&self) -> Result<Vec<ContactItemCount>>;

    /// Total PAGE_VISIT count and distinct non-null visitorId count
    async fn visitor_totals(&self) -> Result<VisitorTotals>;

    /// PAGE_VISIT counts per calendar day over the trailing `days` days,
    /// sorted ascending by date; days with no visits are absent
    async fn daily_visits(&self, days: i64) -> Result<Vec<DailyVisitCount>>;
}

/// Lookup port into the project registry, used to resolve project
/// references to display names at read time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Map each existing project ID to its display name. IDs with no
    /// matching project are simply absent from the result.
    async fn project_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>>;
}
