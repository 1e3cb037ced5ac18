//! Join of rule catalog and per-service rule scores

use super::models::{RuleInfo, RuleScore, Scorecard, ScorecardLevel, ScoredService};
use crate::catalog::Entity;
use serde::Serialize;
use std::collections::HashMap;

/// Level number for `level_name`; when several levels share the name the last one wins
pub fn resolve_level_number(levels: &[ScorecardLevel], level_name: &str) -> Option<i64> {
    levels
        .iter()
        .rev()
        .find(|l| l.level.name == level_name)
        .map(|l| l.level.number)
}

/// Rules by identifier, with level numbers resolved
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    rules: HashMap<String, RuleInfo>,
}

impl RuleIndex {
    pub fn build(scorecard: &Scorecard) -> Self {
        let mut rules = HashMap::with_capacity(scorecard.rules.len());
        for rule in &scorecard.rules {
            let mut rule = rule.clone();
            rule.level_number = resolve_level_number(&scorecard.levels, &rule.level_name).unwrap_or(0);
            rules.insert(rule.identifier.clone(), rule);
        }
        Self { rules }
    }

    pub fn get(&self, identifier: &str) -> Option<&RuleInfo> {
        self.rules.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One (service, rule) result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedScoreRow {
    pub scorecard_name: String,
    pub scorecard_tag: String,
    pub last_evaluated: Option<String>,
    pub service: Entity,
    pub rule_score: RuleScore,
    pub rule_info: RuleInfo,
}

impl EnrichedScoreRow {
    /// A rule passes when it scored its full weight
    pub fn pass(&self) -> bool {
        self.rule_score.score == self.rule_info.weight
    }
}

pub struct ScorecardEnricher {
    index: RuleIndex,
}

impl ScorecardEnricher {
    pub fn new(scorecard: &Scorecard) -> Self {
        Self {
            index: RuleIndex::build(scorecard),
        }
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    /// Rows for one service. Scores for rules missing from the catalog are dropped.
    pub fn enrich(&self, scored: ScoredService) -> Vec<EnrichedScoreRow> {
        let ScoredService {
            scorecard_name,
            scorecard_tag,
            score,
        } = scored;
        let Some(block) = score.score else {
            return Vec::new();
        };

        block
            .rules
            .into_iter()
            .filter_map(|rule_score| {
                let rule_info = self.index.get(&rule_score.identifier)?.clone();
                Some(EnrichedScoreRow {
                    scorecard_name: scorecard_name.clone(),
                    scorecard_tag: scorecard_tag.clone(),
                    last_evaluated: score.last_evaluated.clone(),
                    service: score.service.clone(),
                    rule_score,
                    rule_info,
                })
            })
            .collect()
    }

    pub fn enrich_all<'a, I>(&'a self, scores: I) -> impl Iterator<Item = EnrichedScoreRow> + 'a
    where
        I: IntoIterator<Item = ScoredService>,
        I::IntoIter: 'a,
    {
        scores.into_iter().flat_map(move |scored| self.enrich(scored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::{ScoreBlock, ServiceScore};

    fn rule(identifier: &str, level_name: &str, weight: i64) -> RuleInfo {
        RuleInfo {
            identifier: identifier.into(),
            title: format!("Rule {identifier}"),
            level_name: level_name.into(),
            weight,
            ..Default::default()
        }
    }

    fn scored(service: &str, scores: &[(&str, i64)]) -> ScoredService {
        ScoredService {
            scorecard_name: "Production Readiness".into(),
            scorecard_tag: "prod-ready".into(),
            score: ServiceScore {
                last_evaluated: Some("2025-05-02T12:00:00Z".into()),
                service: Entity::named(service),
                score: Some(ScoreBlock {
                    rules: scores
                        .iter()
                        .map(|(id, score)| RuleScore {
                            identifier: id.to_string(),
                            score: *score,
                            ..Default::default()
                        })
                        .collect(),
                }),
            },
        }
    }

    fn scorecard() -> Scorecard {
        Scorecard {
            rules: vec![rule("rule1", "Level 1", 10)],
            levels: vec![ScorecardLevel::new("Level 1", 1)],
        }
    }

    #[test]
    fn test_matching_rule_passes_with_level() {
        let enricher = ScorecardEnricher::new(&scorecard());
        let rows = enricher.enrich(scored("Service 1", &[("rule1", 10)]));

        assert_eq!(rows.len(), 1);
        assert!(rows[0].pass());
        assert_eq!(rows[0].rule_info.level_number, 1);
        assert_eq!(rows[0].service.name, "Service 1");
        assert_eq!(rows[0].scorecard_tag, "prod-ready");
    }

    #[test]
    fn test_unknown_rule_is_dropped() {
        let enricher = ScorecardEnricher::new(&scorecard());
        assert!(enricher.enrich(scored("Service 1", &[("rule2", 10)])).is_empty());
    }

    #[test]
    fn test_partial_score_fails() {
        let enricher = ScorecardEnricher::new(&scorecard());
        let rows = enricher.enrich(scored("Service 1", &[("rule1", 4)]));
        assert!(!rows[0].pass());
    }

    #[test]
    fn test_unknown_level_leaves_zero() {
        let card = Scorecard {
            rules: vec![rule("rule1", "Gold", 5)],
            levels: vec![ScorecardLevel::new("Bronze", 1)],
        };
        assert_eq!(RuleIndex::build(&card).get("rule1").unwrap().level_number, 0);
    }

    #[test]
    fn test_duplicate_level_names_last_wins() {
        let levels = vec![ScorecardLevel::new("Gold", 2), ScorecardLevel::new("Gold", 3)];
        assert_eq!(resolve_level_number(&levels, "Gold"), Some(3));
        assert_eq!(resolve_level_number(&levels, "Silver"), None);
    }

    #[test]
    fn test_cardinality_is_services_times_scored_rules() {
        let card = Scorecard {
            rules: vec![rule("r1", "L", 1), rule("r2", "L", 1), rule("r3", "L", 1)],
            levels: vec![ScorecardLevel::new("L", 1)],
        };
        let enricher = ScorecardEnricher::new(&card);
        let rows: Vec<_> = enricher
            .enrich_all(vec![
                scored("a", &[("r1", 1), ("r2", 0)]),
                scored("b", &[("r3", 1), ("unknown", 1)]),
            ])
            .collect();

        let pairs: Vec<_> = rows
            .iter()
            .map(|r| (r.service.name.as_str(), r.rule_score.identifier.as_str(), r.pass()))
            .collect();
        assert_eq!(
            pairs,
            vec![("a", "r1", true), ("a", "r2", false), ("b", "r3", true)]
        );
    }

    #[test]
    fn test_service_without_score_block_emits_nothing() {
        let enricher = ScorecardEnricher::new(&scorecard());
        let mut service = scored("Service 1", &[]);
        service.score.score = None;
        assert!(enricher.enrich(service).is_empty());
    }
}
