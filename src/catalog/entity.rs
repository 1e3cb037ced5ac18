//! `cortex_entity`: paginated catalog listing

use super::lenient::null_as_default;
use super::models::{link_urls, parse_timestamp, tags, Entity, SlackChannel};
use crate::api::{ApiRequest, ApiResult, QueryContext, Transport};
use crate::fetch::{ListSummary, PageInfo, Paged, PaginatedLister, RowSink};
use crate::filter::{join_group_filters, GroupQual};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

pub const ENTITIES_ENDPOINT: &str = "/api/v1/catalog";

#[derive(Debug, Deserialize)]
pub struct EntityPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
    #[serde(flatten)]
    pub info: PageInfo,
}

impl Paged for EntityPage {
    type Item = Entity;

    fn info(&self) -> PageInfo {
        self.info
    }

    fn into_items(self) -> Vec<Entity> {
        self.entities
    }
}

/// Server-side filters for the entity listing
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    pub include_archived: bool,
    /// Single entity type; an `IN (...)` list is issued as one listing per type
    pub entity_type: Option<String>,
    pub groups: Vec<GroupQual>,
}

impl EntityFilter {
    pub fn request(&self) -> ApiRequest {
        ApiRequest::get(ENTITIES_ENDPOINT)
            .query("includeArchived", self.include_archived.to_string())
            .query("types", self.entity_type.clone().unwrap_or_default())
            .query("groups", join_group_filters(&self.groups))
            .query("yaml", "false")
            .query("includeMetadata", "true")
            .query("includeLinks", "true")
            .query("includeSlackChannels", "true")
            .query("includeOwners", "true")
            .query("includeHierarchyFields", "true")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRow {
    pub name: String,
    pub tag: String,
    pub description: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub parents: Vec<String>,
    pub groups: Vec<String>,
    pub metadata: Map<String, Value>,
    pub last_updated: Option<DateTime<Utc>>,
    pub links: Vec<String>,
    pub archived: bool,
    pub repository: Option<String>,
    pub slack_channels: Vec<SlackChannel>,
    pub owner_teams: Vec<String>,
    pub owner_individuals: Vec<String>,
}

impl From<Entity> for EntityRow {
    fn from(entity: Entity) -> Self {
        let metadata = entity.metadata_map();
        let last_updated = parse_timestamp(entity.last_updated.as_deref());
        Self {
            parents: tags(&entity.hierarchy.parents),
            links: link_urls(&entity.links),
            repository: entity.git.map(|g| g.repository).filter(|r| !r.is_empty()),
            owner_teams: entity.owners.teams.into_iter().map(|t| t.tag).collect(),
            owner_individuals: entity
                .owners
                .individuals
                .into_iter()
                .map(|i| i.email)
                .collect(),
            name: entity.name,
            tag: entity.tag,
            description: entity.description,
            entity_type: entity.entity_type,
            groups: entity.groups,
            metadata,
            last_updated,
            archived: entity.archived,
            slack_channels: entity.slack_channels,
        }
    }
}

pub fn list_entities<T, S>(
    transport: T,
    ctx: &QueryContext,
    sink: &mut S,
    filter: &EntityFilter,
) -> ApiResult<ListSummary>
where
    T: Transport,
    S: RowSink<EntityRow>,
{
    let request = filter.request();
    info!(
        "listing entities (archived={}, types={:?}, groups={:?})",
        filter.include_archived,
        request.query_value("types").unwrap_or_default(),
        request.query_value("groups").unwrap_or_default()
    );
    PaginatedLister::new(transport).list_enriched::<EntityPage, _, _, _, _>(
        ctx,
        &request,
        sink,
        |entity| Some(EntityRow::from(entity)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedTransport;
    use crate::fetch::VecSink;
    use serde_json::json;

    fn page(names: &[&str], page: u32, total_pages: u32, total: u64) -> Value {
        let entities: Vec<Value> = names.iter().map(|n| json!({"name": n})).collect();
        json!({"entities": entities, "page": page, "totalPages": total_pages, "total": total})
    }

    #[test]
    fn test_single_page() {
        let transport = ScriptedTransport::new().respond_json(&page(&["entity1"], 0, 1, 1));
        let mut sink = VecSink::with_limit(100);

        list_entities(&transport, &QueryContext::background(), &mut sink, &EntityFilter::default()).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.items()[0].name, "entity1");
    }

    #[test]
    fn test_default_request_parameters() {
        let req = EntityFilter::default().request();
        assert_eq!(req.endpoint(), "/api/v1/catalog");
        assert_eq!(req.query_value("includeArchived"), Some("false"));
        assert_eq!(req.query_value("types"), Some(""));
        assert_eq!(req.query_value("groups"), Some(""));
        assert_eq!(req.query_value("includeHierarchyFields"), Some("true"));
    }

    #[test]
    fn test_filters_reach_the_request() {
        let transport = ScriptedTransport::new().respond_json(&page(&["entity1"], 0, 1, 1));
        let filter = EntityFilter {
            include_archived: true,
            entity_type: Some("service".into()),
            groups: vec![
                GroupQual::exists_one("platform"),
                GroupQual::exists_any(["infra", "data"]),
            ],
        };
        let mut sink = VecSink::unbounded();

        list_entities(&transport, &QueryContext::background(), &mut sink, &filter).unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.query_value("includeArchived"), Some("true"));
        assert_eq!(sent.query_value("types"), Some("service"));
        assert_eq!(sent.query_value("groups"), Some("platform,infra,data"));
        assert_eq!(sent.query_value("page"), Some("0"));
        assert_eq!(sent.query_value("pageSize"), Some("1000"));
    }

    #[test]
    fn test_row_projection() {
        let entity: Entity = serde_json::from_value(json!({
            "name": "Payments",
            "tag": "payments",
            "type": "service",
            "hierarchy": {"parents": [{"tag": "billing"}]},
            "metadata": [{"key": "tier", "value": 1}],
            "lastUpdated": "2025-05-02T12:00:00+02:00",
            "links": [{"name": "docs", "type": "doc", "url": "https://docs"}],
            "git": {"repository": "org/payments"},
            "owners": {"teams": [{"tag": "team-pay"}], "individuals": [{"email": "a@b.c"}]}
        }))
        .unwrap();

        let row = EntityRow::from(entity);
        assert_eq!(row.parents, vec!["billing"]);
        assert_eq!(row.metadata["tier"], json!(1));
        assert_eq!(row.links, vec!["https://docs"]);
        assert_eq!(row.repository.as_deref(), Some("org/payments"));
        assert_eq!(row.owner_teams, vec!["team-pay"]);
        assert_eq!(row.owner_individuals, vec!["a@b.c"]);
        assert_eq!(
            row.last_updated.unwrap().to_rfc3339(),
            "2025-05-02T10:00:00+00:00"
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_null() {
        let row = EntityRow::from(Entity {
            last_updated: Some("yesterday".into()),
            ..Entity::named("x")
        });
        assert!(row.last_updated.is_none());
        assert!(row.repository.is_none());
    }
}
