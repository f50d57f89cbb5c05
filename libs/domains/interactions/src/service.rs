//! Interaction service layer
//!
//! Coordinates ingestion validation, the event store, and the project
//! registry join for display names.

use crate::error::{InteractionError, Result};
use crate::models::{
    InteractionEvent, InteractionFilter, InteractionSummary, InteractionView, ProjectPopularity,
    RecordInteraction, StatsResponse, VisitorStats,
};
use crate::repository::{InteractionRepository, ProjectDirectory};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Popularity ranking is truncated to the top entries.
const POPULARITY_LIMIT: i64 = 10;

/// Trailing window for the daily visit trend, in days.
const TREND_WINDOW_DAYS: i64 = 30;

/// Interaction service providing ingestion and on-demand aggregation.
pub struct InteractionService<R: InteractionRepository, P: ProjectDirectory> {
    repository: Arc<R>,
    projects: Arc<P>,
}

impl<R: InteractionRepository, P: ProjectDirectory> InteractionService<R, P> {
    pub fn new(repository: R, projects: P) -> Self {
        Self {
            repository: Arc::new(repository),
            projects: Arc::new(projects),
        }
    }

    /// Validate and persist one event.
    ///
    /// Validation failures reject the submission before anything is written;
    /// a rejected event is never partially stored. On success the event is
    /// persisted exactly once with a server-assigned timestamp.
    #[instrument(skip(self, input))]
    pub async fn record(&self, input: RecordInteraction) -> Result<InteractionEvent> {
        let (kind, metadata) = input.validate().map_err(InteractionError::validation)?;

        let event = self
            .repository
            .insert(InteractionEvent::new(kind, metadata))
            .await?;

        info!(event_id = %event.id, event_type = %event.kind.event_type(), "Interaction recorded");
        Ok(event)
    }

    /// Compute the full summary plus a filtered raw listing.
    ///
    /// Every call recomputes from raw events. Any store failure aborts the
    /// whole computation; a partial summary is never returned.
    #[instrument(skip(self, filter))]
    pub async fn stats(&self, filter: &InteractionFilter) -> Result<StatsResponse> {
        let events = self.repository.list(filter).await?;
        let summary_inputs = self.collect_summary_inputs().await?;

        // One registry lookup covers both the listing join and the
        // popularity ranking.
        let mut ids: Vec<Uuid> = events.iter().filter_map(|e| e.kind.project_id()).collect();
        ids.extend(summary_inputs.popularity.iter().map(|row| row.project_id));
        ids.sort_unstable();
        ids.dedup();

        let names = self.projects.project_names(&ids).await?;

        let stats = events
            .into_iter()
            .map(|event| {
                let name = event.kind.project_id().and_then(|id| names.get(&id).cloned());
                InteractionView::from_event(event, name)
            })
            .collect();

        let project_popularity = summary_inputs
            .popularity
            .into_iter()
            .map(|row| {
                let name = names.get(&row.project_id).cloned();
                ProjectPopularity::from_row(row, name)
            })
            .collect();

        Ok(StatsResponse {
            stats,
            summary: InteractionSummary {
                event_counts: summary_inputs.event_counts,
                project_popularity,
                contact_item_stats: summary_inputs.contact_items,
                visitor_stats: VisitorStats {
                    total_visits: summary_inputs.visitor_totals.total_visits,
                    unique_visitors: summary_inputs.visitor_totals.unique_visitors,
                    daily_visits: summary_inputs.daily_visits,
                },
            },
        })
    }

    async fn collect_summary_inputs(&self) -> Result<SummaryInputs> {
        Ok(SummaryInputs {
            event_counts: self.repository.event_type_counts().await?,
            popularity: self.repository.project_popularity(POPULARITY_LIMIT).await?,
            contact_items: self.repository.contact_item_stats().await?,
            visitor_totals: self.repository.visitor_totals().await?,
            daily_visits: self.repository.daily_visits(TREND_WINDOW_DAYS).await?,
        })
    }
}

struct SummaryInputs {
    event_counts: std::collections::BTreeMap<String, u64>,
    popularity: Vec<crate::models::ProjectPopularityRow>,
    contact_items: Vec<crate::models::ContactItemCount>,
    visitor_totals: crate::models::VisitorTotals,
    daily_visits: Vec<crate::models::DailyVisitCount>,
}

impl<R: InteractionRepository, P: ProjectDirectory> Clone for InteractionService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            projects: Arc::clone(&self.projects),
        }
    }
}
