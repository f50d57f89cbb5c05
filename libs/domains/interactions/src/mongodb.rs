//! MongoDB implementation of InteractionRepository
//!
//! All summary statistics are computed with aggregation pipelines at read
//! time; nothing is materialized or cached.

use crate::error::Result;
use crate::models::{
    ContactItemCount, DailyVisitCount, EventType, InteractionEvent, InteractionFilter,
    ProjectPopularityRow, VisitorTotals,
};
use crate::repository::InteractionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, to_bson, Bson, Document};
use mongodb::{Collection, Database};
use std::collections::BTreeMap;
use tracing::instrument;

/// MongoDB-based event store
#[derive(Clone)]
pub struct MongoInteractionRepository {
    collection: Collection<InteractionEvent>,
}

impl MongoInteractionRepository {
    /// Create a new MongoDB interaction repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("interaction_stats"),
        }
    }

    /// Convert chrono DateTime to BSON DateTime
    fn to_bson_datetime(dt: DateTime<Utc>) -> Bson {
        Bson::DateTime(mongodb::bson::DateTime::from_millis(dt.timestamp_millis()))
    }

    /// Create indexes for efficient querying
    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::IndexModel;

        let indexes = vec![
            // Compound index for the common "events of a type, newest first" query
            IndexModel::builder()
                .keys(doc! { "eventType": 1, "timestamp": -1 })
                .build(),
            // Index on timestamp for the listing sort and trend window
            IndexModel::builder().keys(doc! { "timestamp": -1 }).build(),
            // Index on projectId for popularity grouping and filters
            IndexModel::builder().keys(doc! { "projectId": 1 }).build(),
            // Index on itemType for contact item grouping and filters
            IndexModel::builder().keys(doc! { "itemType": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    /// Build a MongoDB filter document from InteractionFilter
    fn build_filter(filter: &InteractionFilter) -> Result<Document> {
        let mut doc = Document::new();

        if let Some(event_type) = &filter.event_type {
            doc.insert("eventType", event_type.to_string());
        }

        if let Some(project_id) = &filter.project_id {
            doc.insert("projectId", to_bson(project_id)?);
        }

        if let Some(item_type) = &filter.item_type {
            doc.insert("itemType", item_type.to_string());
        }

        Ok(doc)
    }

    fn event_type_counts_pipeline() -> Vec<Document> {
        vec![doc! {
            "$group": {
                "_id": "$eventType",
                "count": { "$sum": 1 },
            },
        }]
    }

    fn project_popularity_pipeline(limit: i64) -> Vec<Document> {
        vec![
            doc! {
                "$match": {
                    "eventType": {
                        "$in": [
                            EventType::TapeInserted.to_string(),
                            EventType::LaunchClicked.to_string(),
                        ]
                    },
                    "projectId": { "$exists": true, "$ne": null },
                },
            },
            doc! {
                "$group": {
                    "_id": "$projectId",
                    "tape_inserted": {
                        "$sum": {
                            "$cond": [
                                { "$eq": ["$eventType", EventType::TapeInserted.to_string()] },
                                1,
                                0,
                            ]
                        }
                    },
                    "launch_clicked": {
                        "$sum": {
                            "$cond": [
                                { "$eq": ["$eventType", EventType::LaunchClicked.to_string()] },
                                1,
                                0,
                            ]
                        }
                    },
                    "total": { "$sum": 1 },
                },
            },
            doc! { "$sort": { "total": -1 } },
            doc! { "$limit": limit },
        ]
    }

    fn contact_item_stats_pipeline() -> Vec<Document> {
        vec![
            doc! {
                "$match": {
                    "eventType": EventType::ItemInspected.to_string(),
                    "itemType": { "$exists": true, "$ne": null },
                },
            },
            doc! {
                "$group": {
                    "_id": "$itemType",
                    "count": { "$sum": 1 },
                },
            },
            doc! { "$sort": { "count": -1 } },
        ]
    }

    /// Distinct visitorId count excludes events with no visitorId: missing
    /// values collapse to a single null via `$ifNull`, which the `$filter`
    /// then drops before `$size`.
    fn visitor_totals_pipeline() -> Vec<Document> {
        vec![
            doc! {
                "$match": { "eventType": EventType::PageVisit.to_string() },
            },
            doc! {
                "$group": {
                    "_id": null,
                    "total_visits": { "$sum": 1 },
                    "visitor_ids": {
                        "$addToSet": { "$ifNull": ["$metadata.visitorId", null] }
                    },
                },
            },
            doc! {
                "$project": {
                    "total_visits": 1,
                    "unique_visitors": {
                        "$size": {
                            "$filter": {
                                "input": "$visitor_ids",
                                "as": "visitor",
                                "cond": { "$ne": ["$$visitor", null] },
                            }
                        }
                    },
                },
            },
        ]
    }

    fn daily_visits_pipeline(cutoff: DateTime<Utc>) -> Vec<Document> {
        vec![
            doc! {
                "$match": {
                    "eventType": EventType::PageVisit.to_string(),
                    "timestamp": { "$gte": Self::to_bson_datetime(cutoff) },
                },
            },
            doc! {
                "$group": {
                    "_id": {
                        "$dateToString": {
                            "format": "%Y-%m-%d",
                            "date": "$timestamp",
                        }
                    },
                    "count": { "$sum": 1 },
                },
            },
            doc! { "$sort": { "_id": 1 } },
        ]
    }

    async fn run_pipeline<T>(&self, pipeline: Vec<Document>) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|document| from_document::<T>(document).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl InteractionRepository for MongoInteractionRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert(&self, event: InteractionEvent) -> Result<InteractionEvent> {
        self.collection.insert_one(&event).await?;
        Ok(event)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &InteractionFilter) -> Result<Vec<InteractionEvent>> {
        use mongodb::options::FindOptions;

        let query = Self::build_filter(filter)?;
        let options = FindOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .skip(filter.skip)
            .limit(filter.limit)
            .build();

        let cursor = self.collection.find(query).with_options(options).await?;
        let events: Vec<InteractionEvent> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn event_type_counts(&self) -> Result<BTreeMap<String, u64>> {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(rename = "_id")]
            event_type: String,
            count: u64,
        }

        let rows: Vec<Row> = self.run_pipeline(Self::event_type_counts_pipeline()).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.event_type, row.count))
            .collect())
    }

    #[instrument(skip(self))]
    async fn project_popularity(&self, limit: i64) -> Result<Vec<ProjectPopularityRow>> {
        self.run_pipeline(Self::project_popularity_pipeline(limit))
            .await
    }

    #[instrument(skip(self))]
    async fn contact_item_stats(&self) -> Result<Vec<ContactItemCount>> {
        self.run_pipeline(Self::contact_item_stats_pipeline()).await
    }

    #[instrument(skip(self))]
    async fn visitor_totals(&self) -> Result<VisitorTotals> {
        let mut rows: Vec<VisitorTotals> =
            self.run_pipeline(Self::visitor_totals_pipeline()).await?;

        // No PAGE_VISIT events yet: both counts are zero
        Ok(rows.pop().unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn daily_visits(&self, days: i64) -> Result<Vec<DailyVisitCount>> {
        let cutoff = Utc::now() - Duration::days(days);
        self.run_pipeline(Self::daily_visits_pipeline(cutoff)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_build_filter_empty() {
        let filter = InteractionFilter::default();
        let doc = MongoInteractionRepository::build_filter(&filter).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_event_type() {
        let filter = InteractionFilter {
            event_type: Some(EventType::PageVisit),
            ..Default::default()
        };
        let doc = MongoInteractionRepository::build_filter(&filter).unwrap();
        assert_eq!(doc.get_str("eventType").unwrap(), "PAGE_VISIT");
    }

    #[test]
    fn test_build_filter_with_project_and_item() {
        let id = Uuid::now_v7();
        let filter = InteractionFilter {
            project_id: Some(id),
            item_type: Some(crate::models::ItemType::StickyNote),
            ..Default::default()
        };
        let doc = MongoInteractionRepository::build_filter(&filter).unwrap();
        assert_eq!(doc.get_str("projectId").unwrap(), id.to_string());
        assert_eq!(doc.get_str("itemType").unwrap(), "Sticky Note");
    }

    #[test]
    fn test_popularity_pipeline_shape() {
        let pipeline = MongoInteractionRepository::project_popularity_pipeline(10);
        assert_eq!(pipeline.len(), 4);

        let matched = pipeline[0].get_document("$match").unwrap();
        let types = matched
            .get_document("eventType")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(types.len(), 2);

        assert_eq!(pipeline[3].get_i64("$limit").unwrap(), 10);
    }

    #[test]
    fn test_daily_visits_pipeline_groups_by_date_string() {
        let pipeline = MongoInteractionRepository::daily_visits_pipeline(Utc::now());
        let group = pipeline[1].get_document("$group").unwrap();
        let date_to_string = group
            .get_document("_id")
            .unwrap()
            .get_document("$dateToString")
            .unwrap();
        assert_eq!(date_to_string.get_str("format").unwrap(), "%Y-%m-%d");

        // Ascending by date
        assert_eq!(
            pipeline[2].get_document("$sort").unwrap().get_i32("_id").unwrap(),
            1
        );
    }

    #[test]
    fn test_visitor_pipeline_filters_null_ids() {
        let pipeline = MongoInteractionRepository::visitor_totals_pipeline();
        let project = pipeline[2].get_document("$project").unwrap();
        let filter = project
            .get_document("unique_visitors")
            .unwrap()
            .get_document("$size")
            .unwrap()
            .get_document("$filter")
            .unwrap();
        assert_eq!(filter.get_str("as").unwrap(), "visitor");
    }
}
