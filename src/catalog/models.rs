//! Wire types shared by several catalog endpoints

use super::lenient::null_as_default;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRef {
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub link_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlackChannel {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notifications_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notifications_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Git repository reference on an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitRepo {
    #[serde(deserialize_with = "null_as_default")]
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Custom metadata entry. Values are arbitrary JSON: scalars or nested maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hierarchy {
    #[serde(deserialize_with = "null_as_default")]
    pub parents: Vec<TagRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerTeam {
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerIndividual {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owners {
    #[serde(deserialize_with = "null_as_default")]
    pub teams: Vec<OwnerTeam>,
    #[serde(deserialize_with = "null_as_default")]
    pub individuals: Vec<OwnerIndividual>,
}

/// A catalog entity (service, resource, domain...) as returned by `/api/v1/catalog`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hierarchy: Hierarchy,
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Vec<MetadataEntry>,
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
    #[serde(rename = "isArchived", deserialize_with = "null_as_default")]
    pub archived: bool,
    pub git: Option<GitRepo>,
    #[serde(deserialize_with = "null_as_default")]
    pub slack_channels: Vec<SlackChannel>,
    #[serde(deserialize_with = "null_as_default")]
    pub owners: Owners,
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Metadata list folded into a key → value object (later keys win)
    pub fn metadata_map(&self) -> Map<String, Value> {
        self.metadata
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }
}

pub(crate) fn tags(refs: &[TagRef]) -> Vec<String> {
    refs.iter().map(|r| r.tag.clone()).collect()
}

pub(crate) fn link_urls(links: &[Link]) -> Vec<String> {
    links.iter().map(|l| l.url.clone()).collect()
}

/// RFC 3339 timestamp in UTC. A timestamp without an offset is read as UTC;
/// anything else unparseable becomes `None`.
pub(crate) fn parse_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    let ts = ts?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
