//! `cortex_team`: teams enriched with their hierarchy

use super::lenient::null_as_default;
use super::models::{link_urls, Link, SlackChannel, TeamMember};
use crate::api::{ApiError, ApiRequest, ApiResult, QueryContext, Transport};
use crate::fetch::{ListSummary, PaginatedLister, RowSink};
use crate::graph::{RelationshipEdge, RelationshipGraph};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

pub const TEAMS_ENDPOINT: &str = "/api/v1/teams";
pub const RELATIONSHIPS_ENDPOINT: &str = "/api/v1/teams/relationships";

#[derive(Debug, Default, Deserialize)]
pub struct TeamsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelationshipsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<RelationshipEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "teamTag", deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
    #[serde(rename = "isArchived", deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub slack_channels: Vec<SlackChannel>,
    #[serde(deserialize_with = "null_as_default")]
    pub idp_group: IdpGroup,
    /// Filled from the relationship graph, not part of the payload
    #[serde(skip_deserializing)]
    pub children: Vec<String>,
    #[serde(skip_deserializing)]
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpGroup {
    #[serde(deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub members: Vec<TeamMember>,
}

impl Team {
    /// Attach children/parents; a tag missing from the graph keeps both empty
    pub fn with_relationships(mut self, graph: &RelationshipGraph) -> Self {
        if let Some(rel) = graph.get(&self.tag) {
            self.children = rel.children.clone();
            self.parents = rel.parents.clone();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub name: Option<String>,
    pub tag: String,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub metadata: Map<String, Value>,
    pub links: Vec<String>,
    pub archived: bool,
    pub slack_channels: Vec<SlackChannel>,
    pub members: Vec<TeamMember>,
}

impl From<Team> for TeamRow {
    fn from(team: Team) -> Self {
        Self {
            name: team
                .metadata
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            links: link_urls(&team.links),
            tag: team.tag,
            parents: team.parents,
            children: team.children,
            metadata: team.metadata,
            archived: team.archived,
            slack_channels: team.slack_channels,
            members: team.idp_group.members,
        }
    }
}

/// Fetch the team hierarchy edges and index them
pub fn fetch_relationships<T: Transport>(
    lister: &PaginatedLister<T>,
    ctx: &QueryContext,
) -> ApiResult<RelationshipGraph> {
    let response: RelationshipsResponse = lister
        .fetcher()
        .fetch(ctx, &ApiRequest::get(RELATIONSHIPS_ENDPOINT))?;
    info!("fetched {} team relationship edges", response.edges.len());
    Ok(RelationshipGraph::build(&response.edges))
}

/// List all teams, each enriched with its parents and children.
///
/// A failed relationship lookup only costs the enrichment: it is logged and the
/// teams are listed without hierarchy. Cancellation still aborts.
pub fn list_teams<T, S>(transport: T, ctx: &QueryContext, sink: &mut S) -> ApiResult<ListSummary>
where
    T: Transport,
    S: RowSink<TeamRow>,
{
    let lister = PaginatedLister::new(transport);
    let graph = match fetch_relationships(&lister, ctx) {
        Ok(graph) => graph,
        Err(e @ (ApiError::Cancelled | ApiError::DeadlineExceeded)) => return Err(e),
        Err(e) => {
            warn!("listing teams without hierarchy: {}", e);
            RelationshipGraph::default()
        }
    };

    let graph = &graph;
    let request = ApiRequest::get(TEAMS_ENDPOINT).query("includeTeamsWithoutMembers", "true");
    let summary = lister.stream_once(ctx, &request, sink, move |response: TeamsResponse| {
        info!("fetched {} teams", response.teams.len());
        response
            .teams
            .into_iter()
            .map(move |team| TeamRow::from(team.with_relationships(graph)))
    })?;
    Ok(summary)
}
