//! Interactions Domain
//!
//! Ingestion, storage, and aggregation of visitor interaction events for
//! the portfolio site's analytics dashboard:
//! - MongoDB for append-only event persistence
//! - Aggregation pipelines computing summary statistics on every read
//! - A project-registry port for resolving project IDs to display names
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Event Flow                            │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  POST /interactions (public) ──► validate ──► MongoDB    │
//! │                                                          │
//! │  GET /interactions (session) ──► listing + pipelines     │
//! │                                   │                      │
//! │                                   └─► project registry   │
//! │                                       (name join)        │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are write-once: nothing in this domain updates or deletes them.
//! Summaries are recomputed from raw events on each request; there is no
//! materialized view or cache. The `uniqueVisitors` figure counts distinct
//! client-generated visitor tokens and is approximate by nature.

mod error;
mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;

pub use error::{InteractionError, Result, ValidationErrorBody};
pub use handlers::{interactions_router, ApiDoc, InteractionsState};
pub use models::{
    ContactItemCount, DailyVisitCount, EventType, FieldError, InteractionEvent, InteractionFilter,
    InteractionKind, InteractionSummary, InteractionView, ItemType, ProjectPopularity,
    ProjectPopularityRow, RecordInteraction, StatsResponse, VisitorStats, VisitorTotals,
};
pub use mongodb::MongoInteractionRepository;
pub use repository::{InteractionRepository, ProjectDirectory};
pub use service::InteractionService;
