use crate::catalog::{null_as_default, Entity};
use crate::fetch::{PageInfo, Paged};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/v1/scorecards/{tag}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScorecardResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scorecard {
    #[serde(deserialize_with = "null_as_default")]
    pub levels: Vec<ScorecardLevel>,
    #[serde(deserialize_with = "null_as_default")]
    pub rules: Vec<RuleInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardLevel {
    #[serde(deserialize_with = "null_as_default")]
    pub level: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
}

impl ScorecardLevel {
    pub fn new(name: impl Into<String>, number: i64) -> Self {
        Self {
            level: Level {
                name: name.into(),
                number,
            },
        }
    }
}

/// A rule from the scorecard catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub effective_from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub weight: i64,
    /// Resolved from `levels` by name; 0 when the level is unknown
    #[serde(skip_deserializing)]
    pub level_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleScore {
    #[serde(deserialize_with = "null_as_default")]
    pub expression: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBlock {
    #[serde(deserialize_with = "null_as_default")]
    pub rules: Vec<RuleScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceScore {
    pub last_evaluated: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub service: Entity,
    pub score: Option<ScoreBlock>,
}

/// One page of `GET /api/v1/scorecards/{tag}/scores`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scorecard_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scorecard_tag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_scores: Vec<ServiceScore>,
    #[serde(flatten)]
    pub info: PageInfo,
}

/// A service score together with the scorecard it belongs to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredService {
    pub scorecard_name: String,
    pub scorecard_tag: String,
    pub score: ServiceScore,
}

impl Paged for ScorePage {
    type Item = ScoredService;

    fn info(&self) -> PageInfo {
        self.info
    }

    fn into_items(self) -> Vec<ScoredService> {
        let ScorePage {
            scorecard_name,
            scorecard_tag,
            service_scores,
            ..
        } = self;
        service_scores
            .into_iter()
            .map(|score| ScoredService {
                scorecard_name: scorecard_name.clone(),
                scorecard_tag: scorecard_tag.clone(),
                score,
            })
            .collect()
    }
}
