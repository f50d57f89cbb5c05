//! Interaction analytics domain models.
//!
//! The persisted event embeds a tagged union ([`InteractionKind`]) with one
//! variant per event type, so a record whose conditional fields are missing
//! or misplaced cannot exist. The ingestion DTO ([`RecordInteraction`]) stays
//! flat and untyped on purpose: validation converts it into the union with
//! field-level errors in a fixed order.

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Closed set of interaction event types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A page load by an (anonymous) visitor
    PageVisit,
    /// A cassette was inserted into the VCR scene
    TapeInserted,
    /// The launch button was clicked for an inserted cassette
    LaunchClicked,
    /// A contact item on the desk was inspected
    ItemInspected,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::PageVisit,
        EventType::TapeInserted,
        EventType::LaunchClicked,
        EventType::ItemInspected,
    ];
}

/// Contact items that can be inspected in the 3D scene.
///
/// Wire values match the scene labels, including the space in "Sticky Note".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ItemType {
    Polaroid,
    Envelope,
    #[serde(rename = "PCB")]
    #[strum(serialize = "PCB")]
    Pcb,
    #[serde(rename = "Sticky Note")]
    #[strum(serialize = "Sticky Note")]
    StickyNote,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Polaroid,
        ItemType::Envelope,
        ItemType::Pcb,
        ItemType::StickyNote,
    ];
}

/// Event payload, discriminated by `eventType`.
///
/// Each variant carries exactly the fields its event type requires, so the
/// "projectId required iff TAPE_INSERTED/LAUNCH_CLICKED" and "itemType
/// required iff ITEM_INSPECTED" rules hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "eventType")]
pub enum InteractionKind {
    #[serde(rename = "PAGE_VISIT")]
    PageVisit,
    #[serde(rename = "TAPE_INSERTED")]
    TapeInserted {
        #[serde(rename = "projectId")]
        project_id: Uuid,
    },
    #[serde(rename = "LAUNCH_CLICKED")]
    LaunchClicked {
        #[serde(rename = "projectId")]
        project_id: Uuid,
    },
    #[serde(rename = "ITEM_INSPECTED")]
    ItemInspected {
        #[serde(rename = "itemType")]
        item_type: ItemType,
    },
}

impl InteractionKind {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::PageVisit => EventType::PageVisit,
            Self::TapeInserted { .. } => EventType::TapeInserted,
            Self::LaunchClicked { .. } => EventType::LaunchClicked,
            Self::ItemInspected { .. } => EventType::ItemInspected,
        }
    }

    pub fn project_id(&self) -> Option<Uuid> {
        match self {
            Self::TapeInserted { project_id } | Self::LaunchClicked { project_id } => {
                Some(*project_id)
            }
            _ => None,
        }
    }

    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            Self::ItemInspected { item_type } => Some(*item_type),
            _ => None,
        }
    }
}

/// One immutable interaction event.
///
/// Append-only: no update or delete surface exists anywhere in this domain.
/// The timestamp is assigned server-side at insert and stored as a real BSON
/// datetime so time-window matches and `$dateToString` grouping work.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InteractionEvent {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,

    /// Event payload, tagged by `eventType`
    #[serde(flatten)]
    pub kind: InteractionKind,

    /// When the event was recorded (server-assigned)
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,

    /// Free-form client context: visitorId, userAgent, locale, screen size,
    /// referrer. No schema is enforced beyond "is a map".
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl InteractionEvent {
    /// Create a new event with a generated ID and the current time.
    pub fn new(kind: InteractionKind, metadata: HashMap<String, serde_json::Value>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// One field-level validation failure, as surfaced to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// DTO for submitting one interaction event.
///
/// Every field is optional at the type level; [`RecordInteraction::validate`]
/// applies the actual rules so that missing and malformed inputs produce the
/// documented field errors in the documented order.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteraction {
    /// One of PAGE_VISIT, TAPE_INSERTED, LAUNCH_CLICKED, ITEM_INSPECTED
    pub event_type: Option<String>,

    /// Required for TAPE_INSERTED and LAUNCH_CLICKED
    pub project_id: Option<String>,

    /// Required for ITEM_INSPECTED
    pub item_type: Option<String>,

    /// Optional free-form client context
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl RecordInteraction {
    /// Validate and convert into an event payload plus metadata.
    ///
    /// Rules, checked in order (first failure wins):
    /// 1. `eventType` must be present
    /// 2. `eventType` must be in the closed set
    /// 3. TAPE_INSERTED / LAUNCH_CLICKED require `projectId`
    /// 4. ITEM_INSPECTED requires a valid `itemType`
    /// 5. Any supplied `projectId` must parse as a UUID, even when the event
    ///    type does not use it
    ///
    /// A format-valid `projectId` is accepted without checking that the
    /// project exists; dangling references degrade to "Unknown" at
    /// aggregation time. A valid `projectId` on PAGE_VISIT / ITEM_INSPECTED
    /// is ignored rather than stored.
    pub fn validate(
        self,
    ) -> Result<(InteractionKind, HashMap<String, serde_json::Value>), FieldError> {
        let event_type = match self.event_type.as_deref() {
            None | Some("") => {
                return Err(FieldError::new("eventType", "Event type is required"));
            }
            Some(raw) => raw.parse::<EventType>().map_err(|_| {
                let valid = EventType::ALL
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                FieldError::new(
                    "eventType",
                    format!("Event type must be one of: {}", valid),
                )
            })?,
        };

        let has_project_id = matches!(self.project_id.as_deref(), Some(s) if !s.is_empty());
        if matches!(
            event_type,
            EventType::TapeInserted | EventType::LaunchClicked
        ) && !has_project_id
        {
            return Err(FieldError::new(
                "projectId",
                "Project ID is required for this event type",
            ));
        }

        let item_type = match (event_type, self.item_type.as_deref()) {
            (EventType::ItemInspected, None | Some("")) => {
                return Err(FieldError::new(
                    "itemType",
                    "Item type is required for ITEM_INSPECTED events",
                ));
            }
            (EventType::ItemInspected, Some(raw)) => {
                Some(raw.parse::<ItemType>().map_err(|_| {
                    let valid = ItemType::ALL
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    FieldError::new("itemType", format!("Item type must be one of: {}", valid))
                })?)
            }
            _ => None,
        };

        let project_id = match self.project_id.as_deref() {
            Some(raw) if !raw.is_empty() => Some(Uuid::parse_str(raw).map_err(|_| {
                FieldError::new("projectId", "Invalid project ID format")
            })?),
            _ => None,
        };

        let missing_project = || {
            FieldError::new("projectId", "Project ID is required for this event type")
        };
        let missing_item = || {
            FieldError::new("itemType", "Item type is required for ITEM_INSPECTED events")
        };

        let kind = match event_type {
            EventType::PageVisit => InteractionKind::PageVisit,
            EventType::TapeInserted => InteractionKind::TapeInserted {
                project_id: project_id.ok_or_else(missing_project)?,
            },
            EventType::LaunchClicked => InteractionKind::LaunchClicked {
                project_id: project_id.ok_or_else(missing_project)?,
            },
            EventType::ItemInspected => InteractionKind::ItemInspected {
                item_type: item_type.ok_or_else(missing_item)?,
            },
        };

        Ok((kind, self.metadata.unwrap_or_default()))
    }
}

/// Query filters for the raw event listing.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct InteractionFilter {
    /// Filter by event type
    pub event_type: Option<EventType>,
    /// Filter by project reference
    pub project_id: Option<Uuid>,
    /// Filter by inspected item type
    pub item_type: Option<ItemType>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of results to skip
    #[serde(default)]
    pub skip: u64,
}

impl Default for InteractionFilter {
    fn default() -> Self {
        Self {
            event_type: None,
            project_id: None,
            item_type: None,
            limit: default_limit(),
            skip: 0,
        }
    }
}

fn default_limit() -> i64 {
    100
}

/// A raw event as returned by the listing, with the project reference
/// resolved to a display name at read time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionView {
    pub id: Uuid,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl InteractionView {
    pub fn from_event(event: InteractionEvent, project_name: Option<String>) -> Self {
        Self {
            id: event.id,
            event_type: event.kind.event_type(),
            project_id: event.kind.project_id(),
            project_name,
            item_type: event.kind.item_type(),
            metadata: event.metadata,
            timestamp: event.timestamp,
        }
    }
}

/// Popularity aggregation row before the project name join.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectPopularityRow {
    #[serde(rename = "_id")]
    pub project_id: Uuid,
    pub tape_inserted: u64,
    pub launch_clicked: u64,
    pub total: u64,
}

/// Per-project interaction counts, ranked by combined total.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPopularity {
    pub project_id: Uuid,
    /// Display name, or "Unknown" when the project no longer exists
    pub project_name: String,
    pub tape_inserted: u64,
    pub launch_clicked: u64,
    pub total: u64,
}

impl ProjectPopularity {
    pub fn from_row(row: ProjectPopularityRow, project_name: Option<String>) -> Self {
        Self {
            project_id: row.project_id,
            project_name: project_name.unwrap_or_else(|| "Unknown".to_string()),
            tape_inserted: row.tape_inserted,
            launch_clicked: row.launch_clicked,
            total: row.total,
        }
    }
}

/// Inspection counts for one contact item type, sorted descending by count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactItemCount {
    #[serde(rename = "_id")]
    pub item_type: ItemType,
    pub count: u64,
}

/// Visit count for one calendar day (`YYYY-MM-DD`, UTC). Days without
/// visits are not synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyVisitCount {
    #[serde(rename = "_id")]
    pub date: String,
    pub count: u64,
}

/// Totals over PAGE_VISIT events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VisitorTotals {
    pub total_visits: u64,
    pub unique_visitors: u64,
}

/// Page-visit statistics.
///
/// `unique_visitors` counts distinct non-null `metadata.visitorId` values.
/// The visitor token is generated client-side and cached in local storage,
/// so it is spoofable and resettable: treat this as a best-effort
/// approximation, not an identity-grade count.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub daily_visits: Vec<DailyVisitCount>,
}

/// The full derived summary, recomputed from raw events on every read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSummary {
    /// Event count per event type
    pub event_counts: BTreeMap<String, u64>,
    /// Top projects by combined insert+launch count (at most 10)
    pub project_popularity: Vec<ProjectPopularity>,
    /// Inspection counts per contact item
    pub contact_item_stats: Vec<ContactItemCount>,
    /// Page-visit totals and daily trend
    pub visitor_stats: VisitorStats,
}

/// Response body for the stats endpoint: recent raw events plus the
/// aggregated summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    pub stats: Vec<InteractionView>,
    pub summary: InteractionSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_type: Option<&str>, project_id: Option<&str>, item_type: Option<&str>) -> RecordInteraction {
        RecordInteraction {
            event_type: event_type.map(String::from),
            project_id: project_id.map(String::from),
            item_type: item_type.map(String::from),
            metadata: None,
        }
    }

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(EventType::PageVisit.to_string(), "PAGE_VISIT");
        assert_eq!("TAPE_INSERTED".parse::<EventType>().unwrap(), EventType::TapeInserted);
        assert!("tape_inserted".parse::<EventType>().is_err());
    }

    #[test]
    fn test_item_type_wire_names() {
        assert_eq!(ItemType::Pcb.to_string(), "PCB");
        assert_eq!(ItemType::StickyNote.to_string(), "Sticky Note");
        assert_eq!("Sticky Note".parse::<ItemType>().unwrap(), ItemType::StickyNote);
        assert_eq!(
            serde_json::to_string(&ItemType::StickyNote).unwrap(),
            "\"Sticky Note\""
        );
    }

    #[test]
    fn test_missing_event_type_rejected() {
        let err = record(None, None, None).validate().unwrap_err();
        assert_eq!(err, FieldError::new("eventType", "Event type is required"));

        // JS-style falsy empty string counts as missing too
        let err = record(Some(""), None, None).validate().unwrap_err();
        assert_eq!(err.field, "eventType");
    }

    #[test]
    fn test_unknown_event_type_lists_valid_set() {
        let err = record(Some("CASSETTE_EJECTED"), None, None).validate().unwrap_err();
        assert_eq!(err.field, "eventType");
        assert_eq!(
            err.message,
            "Event type must be one of: PAGE_VISIT, TAPE_INSERTED, LAUNCH_CLICKED, ITEM_INSPECTED"
        );
    }

    #[test]
    fn test_tape_inserted_requires_project_id() {
        for event_type in ["TAPE_INSERTED", "LAUNCH_CLICKED"] {
            let err = record(Some(event_type), None, None).validate().unwrap_err();
            assert_eq!(
                err,
                FieldError::new("projectId", "Project ID is required for this event type")
            );
        }
    }

    #[test]
    fn test_item_inspected_requires_item_type() {
        let err = record(Some("ITEM_INSPECTED"), None, None).validate().unwrap_err();
        assert_eq!(
            err,
            FieldError::new("itemType", "Item type is required for ITEM_INSPECTED events")
        );
    }

    #[test]
    fn test_item_inspected_rejects_unknown_item() {
        let err = record(Some("ITEM_INSPECTED"), None, Some("Floppy")).validate().unwrap_err();
        assert_eq!(err.field, "itemType");
        assert_eq!(
            err.message,
            "Item type must be one of: Polaroid, Envelope, PCB, Sticky Note"
        );
    }

    #[test]
    fn test_malformed_project_id_rejected() {
        let err = record(Some("TAPE_INSERTED"), Some("not-a-uuid"), None)
            .validate()
            .unwrap_err();
        assert_eq!(err, FieldError::new("projectId", "Invalid project ID format"));
    }

    #[test]
    fn test_malformed_project_id_rejected_even_for_page_visit() {
        // The format check applies to any supplied projectId
        let err = record(Some("PAGE_VISIT"), Some("xx"), None).validate().unwrap_err();
        assert_eq!(err, FieldError::new("projectId", "Invalid project ID format"));
    }

    #[test]
    fn test_page_visit_needs_only_event_type() {
        let (kind, metadata) = record(Some("PAGE_VISIT"), None, None).validate().unwrap();
        assert_eq!(kind, InteractionKind::PageVisit);
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_valid_project_id_on_page_visit_is_ignored() {
        let id = Uuid::now_v7();
        let (kind, _) = record(Some("PAGE_VISIT"), Some(&id.to_string()), None)
            .validate()
            .unwrap();
        assert_eq!(kind, InteractionKind::PageVisit);
        assert_eq!(kind.project_id(), None);
    }

    #[test]
    fn test_tape_inserted_round_trip() {
        let id = Uuid::now_v7();
        let (kind, _) = record(Some("TAPE_INSERTED"), Some(&id.to_string()), None)
            .validate()
            .unwrap();
        assert_eq!(kind, InteractionKind::TapeInserted { project_id: id });
        assert_eq!(kind.event_type(), EventType::TapeInserted);
        assert_eq!(kind.project_id(), Some(id));
    }

    #[test]
    fn test_dangling_project_id_accepted() {
        // Existence is not checked at write time, only UUID syntax
        let ghost = Uuid::now_v7();
        let result = record(Some("LAUNCH_CLICKED"), Some(&ghost.to_string()), None).validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_metadata_passes_through() {
        let mut input = record(Some("PAGE_VISIT"), None, None);
        input.metadata = Some(HashMap::from([(
            "visitorId".to_string(),
            serde_json::json!("visitor_123"),
        )]));

        let (_, metadata) = input.validate().unwrap();
        assert_eq!(metadata["visitorId"], serde_json::json!("visitor_123"));
    }

    #[test]
    fn test_kind_serializes_with_event_type_tag() {
        let id = Uuid::now_v7();
        let json = serde_json::to_value(InteractionKind::TapeInserted { project_id: id }).unwrap();
        assert_eq!(json["eventType"], "TAPE_INSERTED");
        assert_eq!(json["projectId"], serde_json::json!(id.to_string()));

        let json = serde_json::to_value(InteractionKind::PageVisit).unwrap();
        assert_eq!(json, serde_json::json!({ "eventType": "PAGE_VISIT" }));

        let json = serde_json::to_value(InteractionKind::ItemInspected {
            item_type: ItemType::StickyNote,
        })
        .unwrap();
        assert_eq!(json["itemType"], "Sticky Note");
    }

    #[test]
    fn test_event_new_assigns_id_and_timestamp() {
        let before = Utc::now();
        let event = InteractionEvent::new(InteractionKind::PageVisit, HashMap::new());
        assert!(!event.id.is_nil());
        assert!(event.timestamp >= before);
    }

    #[test]
    fn test_filter_defaults() {
        let filter = InteractionFilter::default();
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.skip, 0);
        assert!(filter.event_type.is_none());
    }

    #[test]
    fn test_popularity_unknown_fallback() {
        let row = ProjectPopularityRow {
            project_id: Uuid::now_v7(),
            tape_inserted: 2,
            launch_clicked: 1,
            total: 3,
        };
        let entry = ProjectPopularity::from_row(row.clone(), None);
        assert_eq!(entry.project_name, "Unknown");
        assert_eq!(entry.total, 3);

        let entry = ProjectPopularity::from_row(row, Some("VCR Demo".to_string()));
        assert_eq!(entry.project_name, "VCR Demo");
    }

    #[test]
    fn test_view_from_event() {
        let id = Uuid::now_v7();
        let event = InteractionEvent::new(
            InteractionKind::LaunchClicked { project_id: id },
            HashMap::new(),
        );
        let event_id = event.id;

        let view = InteractionView::from_event(event, Some("VCR Demo".to_string()));
        assert_eq!(view.id, event_id);
        assert_eq!(view.event_type, EventType::LaunchClicked);
        assert_eq!(view.project_id, Some(id));
        assert_eq!(view.project_name.as_deref(), Some("VCR Demo"));
        assert_eq!(view.item_type, None);
    }
}
