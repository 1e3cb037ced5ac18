//! Catalog tables
//!
//! Each table pairs the wire models of one Cortex endpoint with a listing
//! function that streams projected rows into a [`RowSink`](crate::fetch::RowSink).

mod descriptor;
mod entity;
mod lenient;
mod models;
mod package;
mod scorecard_score;
mod team;

pub use descriptor::{
    list_descriptors, AwsDependency, CortexDependency, Dependency, Descriptor, DescriptorInfo,
    DescriptorPage, DescriptorRow, DESCRIPTORS_ENDPOINT,
};
pub use entity::{list_entities, EntityFilter, EntityPage, EntityRow, ENTITIES_ENDPOINT};
pub use lenient::Lenient;
pub(crate) use lenient::null_as_default;
pub use models::{
    Entity, GitRepo, Hierarchy, Link, MetadataEntry, OwnerIndividual, OwnerTeam, Owners, SlackChannel,
    TagRef, TeamMember,
};
pub use package::{list_packages, Package, PackageRow, PACKAGES_ENDPOINT};
pub use scorecard_score::{
    fetch_scorecard, list_scorecard_scores, ScorecardScoreRow, SCORECARD_ENDPOINT, SCORES_ENDPOINT,
};
pub use team::{
    fetch_relationships, list_teams, IdpGroup, RelationshipsResponse, Team, TeamRow, TeamsResponse,
    RELATIONSHIPS_ENDPOINT, TEAMS_ENDPOINT,
};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Entity,
    Descriptor,
    Team,
    Packages,
    ScorecardScore,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Entity,
        Table::Descriptor,
        Table::Team,
        Table::Packages,
        Table::ScorecardScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Entity => "cortex_entity",
            Table::Descriptor => "cortex_descriptor",
            Table::Team => "cortex_team",
            Table::Packages => "cortex_packages",
            Table::ScorecardScore => "cortex_scorecard_score",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Table::Entity => "Catalog entities with owners, groups and hierarchy",
            Table::Descriptor => "Entity descriptors (x-cortex-* fields)",
            Table::Team => "Teams with parents and children",
            Table::Packages => "Packages declared by one entity (requires a tag)",
            Table::ScorecardScore => "Rule results per service for one scorecard (requires a tag)",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("cortex_unknown"), None);
        assert_eq!(Table::ScorecardScore.to_string(), "cortex_scorecard_score");
    }
}
