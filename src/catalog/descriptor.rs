//! `cortex_descriptor`: OpenAPI-style entity descriptors

use super::lenient::{null_as_default, Lenient};
use super::models::{link_urls, tags, Link, SlackChannel, TagRef, TeamMember};
use crate::api::{ApiRequest, ApiResult, QueryContext, Transport};
use crate::fetch::{ListSummary, PageInfo, Paged, PaginatedLister, RowSink};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

pub const DESCRIPTORS_ENDPOINT: &str = "/api/v1/catalog/descriptors";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptor {
    #[serde(deserialize_with = "null_as_default")]
    pub openapi: String,
    #[serde(deserialize_with = "null_as_default")]
    pub info: DescriptorInfo,
}

/// The `info` block, where all `x-cortex-*` extensions live
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorInfo {
    #[serde(rename = "x-cortex-tag", deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "x-cortex-type")]
    pub descriptor_type: Option<String>,
    #[serde(rename = "x-cortex-parents", deserialize_with = "null_as_default")]
    pub parents: Vec<TagRef>,
    #[serde(rename = "x-cortex-groups", deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    #[serde(rename = "x-cortex-team", deserialize_with = "null_as_default")]
    pub team: TeamSpec,
    #[serde(rename = "x-cortex-owners", deserialize_with = "null_as_default")]
    pub owners: Vec<Owner>,
    #[serde(rename = "x-cortex-slack", deserialize_with = "null_as_default")]
    pub slack: SlackSpec,
    #[serde(rename = "x-cortex-link", deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
    #[serde(rename = "x-cortex-custom-metadata", deserialize_with = "null_as_default")]
    pub custom_metadata: Map<String, Value>,
    #[serde(rename = "x-cortex-git", deserialize_with = "null_as_default")]
    pub git: GitSpec,
    #[serde(rename = "x-cortex-oncall", deserialize_with = "null_as_default")]
    pub oncall: OncallSpec,
    #[serde(rename = "x-cortex-issues", deserialize_with = "null_as_default")]
    pub issues: IssuesSpec,
    #[serde(rename = "x-cortex-dependency")]
    pub dependency: Lenient<Dependency>,
    #[serde(rename = "x-cortex-slos", deserialize_with = "null_as_default")]
    pub slos: Slos,
    #[serde(rename = "x-cortex-static-analysis", deserialize_with = "null_as_default")]
    pub static_analysis: StaticAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub owner_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<TeamGroup>,
    #[serde(deserialize_with = "null_as_default")]
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamGroup {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub channels: Vec<SlackChannel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub github: GithubSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OncallSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub victorops: VictorOps,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictorOps {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub oncall_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub jira: JiraSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<String>,
}

/// `x-cortex-dependency`; decoded leniently, see [`Lenient`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependency {
    #[serde(deserialize_with = "null_as_default")]
    pub cortex: Vec<CortexDependency>,
    #[serde(deserialize_with = "null_as_default")]
    pub aws: AwsDependency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexDependency {
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsDependency {
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyValue {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slos {
    #[serde(deserialize_with = "null_as_default")]
    pub newrelic: Vec<Slo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slo {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub sonarqube: Sonarqube,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sonarqube {
    #[serde(deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DescriptorPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub descriptors: Vec<Descriptor>,
    #[serde(flatten)]
    pub info: PageInfo,
}

impl Paged for DescriptorPage {
    type Item = Descriptor;

    fn info(&self) -> PageInfo {
        self.info
    }

    fn into_items(self) -> Vec<Descriptor> {
        self.descriptors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptorRow {
    pub tag: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub descriptor_type: Option<String>,
    pub parents: Vec<String>,
    pub groups: Vec<String>,
    pub team: TeamSpec,
    pub owners: Vec<Owner>,
    pub slack: SlackSpec,
    pub links: Vec<String>,
    pub metadata: Map<String, Value>,
    pub repository: Option<String>,
    pub victorops: Option<String>,
    pub jira: Vec<String>,
    pub slos: Slos,
    pub static_analysis: StaticAnalysis,
    pub dependency: Dependency,
}

fn non_empty(s: String) -> Option<String> {
    Some(s).filter(|s| !s.is_empty())
}

impl From<DescriptorInfo> for DescriptorRow {
    fn from(info: DescriptorInfo) -> Self {
        Self {
            parents: tags(&info.parents),
            links: link_urls(&info.links),
            tag: info.tag,
            title: info.title,
            description: info.description,
            descriptor_type: info.descriptor_type,
            groups: info.groups,
            team: info.team,
            owners: info.owners,
            slack: info.slack,
            metadata: info.custom_metadata,
            repository: non_empty(info.git.github.repository),
            victorops: non_empty(info.oncall.victorops.id),
            jira: info.issues.jira.projects,
            slos: info.slos,
            static_analysis: info.static_analysis,
            dependency: info.dependency.into_inner(),
        }
    }
}

pub fn list_descriptors<T, S>(transport: T, ctx: &QueryContext, sink: &mut S) -> ApiResult<ListSummary>
where
    T: Transport,
    S: RowSink<DescriptorRow>,
{
    info!("listing descriptors");
    let request = ApiRequest::get(DESCRIPTORS_ENDPOINT).query("yaml", "false");
    PaginatedLister::new(transport).list_enriched::<DescriptorPage, _, _, _, _>(
        ctx,
        &request,
        sink,
        |descriptor| Some(DescriptorRow::from(descriptor.info)),
    )
}
