//! Adjacency index over team relationship edges
//!
//! Built fresh from the `/api/v1/teams/relationships` edge list on every team
//! listing and thrown away afterwards.
//!
//! Each edge appends the parent tag to the child's `parents` and also appends
//! the **parent** tag (not the child tag) to the parent's `children`. This
//! matches what the catalog integration has always produced; consumers of the
//! `children` column rely on it, so it is kept as is. For the same reason an
//! edge from a team to itself records the team as its own child but not as
//! its own parent.

use crate::catalog::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directed child → parent link between two teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    #[serde(rename = "childTeamTag", default, deserialize_with = "null_as_default")]
    pub child: String,
    #[serde(rename = "parentTeamTag", default, deserialize_with = "null_as_default")]
    pub parent: String,
}

impl RelationshipEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

/// Direct neighbours of one team, in edge-list order, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relationships {
    pub children: Vec<String>,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    nodes: HashMap<String, Relationships>,
}

impl RelationshipGraph {
    pub fn build(edges: &[RelationshipEdge]) -> Self {
        let mut nodes: HashMap<String, Relationships> = HashMap::new();
        for edge in edges {
            // A self-loop only gains a child: the parent-side write wins
            if edge.child == edge.parent {
                nodes
                    .entry(edge.parent.clone())
                    .or_default()
                    .children
                    .push(edge.parent.clone());
                continue;
            }
            nodes
                .entry(edge.child.clone())
                .or_default()
                .parents
                .push(edge.parent.clone());
            nodes
                .entry(edge.parent.clone())
                .or_default()
                .children
                .push(edge.parent.clone());
        }
        Self { nodes }
    }

    pub fn get(&self, tag: &str) -> Option<&Relationships> {
        self.nodes.get(tag)
    }

    pub fn children(&self, tag: &str) -> &[String] {
        self.get(tag).map(|r| r.children.as_slice()).unwrap_or_default()
    }

    pub fn parents(&self, tag: &str) -> &[String] {
        self.get(tag).map(|r| r.parents.as_slice()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
