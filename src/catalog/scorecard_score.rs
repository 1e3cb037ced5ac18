//! `cortex_scorecard_score`: one row per (service, scored rule)

use crate::api::{ApiRequest, ApiResult, QueryContext, Transport};
use crate::fetch::{ListSummary, PaginatedLister, RowSink};
use crate::scorecard::{EnrichedScoreRow, ScorePage, Scorecard, ScorecardEnricher, ScorecardResponse};
use serde::Serialize;
use tracing::info;

pub const SCORECARD_ENDPOINT: &str = "/api/v1/scorecards/{tag}";
pub const SCORES_ENDPOINT: &str = "/api/v1/scorecards/{tag}/scores";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardScoreRow {
    pub scorecard_tag: String,
    pub scorecard_name: String,
    pub service_tag: String,
    pub service_name: String,
    pub service_groups: Vec<String>,
    /// As reported by the API; formats vary between tenants
    pub last_evaluated: Option<String>,
    pub rule_identifier: String,
    pub rule_title: String,
    pub rule_description: String,
    pub rule_expression: String,
    pub rule_effective_from: String,
    pub rule_level_name: String,
    pub rule_level_number: i64,
    pub rule_weight: i64,
    pub rule_score: i64,
    pub rule_pass: bool,
}

impl From<EnrichedScoreRow> for ScorecardScoreRow {
    fn from(row: EnrichedScoreRow) -> Self {
        let rule_pass = row.pass();
        let EnrichedScoreRow {
            scorecard_name,
            scorecard_tag,
            last_evaluated,
            service,
            rule_score,
            rule_info,
        } = row;
        Self {
            scorecard_tag,
            scorecard_name,
            service_tag: service.tag,
            service_name: service.name,
            service_groups: service.groups,
            last_evaluated,
            rule_identifier: rule_score.identifier,
            rule_title: rule_info.title,
            rule_description: rule_info.description,
            rule_expression: rule_score.expression,
            rule_effective_from: rule_info.effective_from,
            rule_level_name: rule_info.level_name,
            rule_level_number: rule_info.level_number,
            rule_weight: rule_info.weight,
            rule_score: rule_score.score,
            rule_pass,
        }
    }
}

pub fn fetch_scorecard<T: Transport>(
    lister: &PaginatedLister<T>,
    ctx: &QueryContext,
    scorecard_tag: &str,
) -> ApiResult<Scorecard> {
    ctx.check()?;
    let request = ApiRequest::get(SCORECARD_ENDPOINT).path_param("tag", scorecard_tag);
    let response: ScorecardResponse = lister.fetcher().fetch(ctx, &request)?;
    info!(
        "scorecard {}: {} rules, {} levels",
        scorecard_tag,
        response.scorecard.rules.len(),
        response.scorecard.levels.len()
    );
    Ok(response.scorecard)
}

/// Stream rule results for every service evaluated by `scorecard_tag`.
///
/// The scorecard definition is fetched first; if that fails nothing is streamed.
pub fn list_scorecard_scores<T, S>(
    transport: T,
    ctx: &QueryContext,
    sink: &mut S,
    scorecard_tag: &str,
) -> ApiResult<ListSummary>
where
    T: Transport,
    S: RowSink<ScorecardScoreRow>,
{
    let lister = PaginatedLister::new(transport);
    let scorecard = fetch_scorecard(&lister, ctx, scorecard_tag)?;
    let enricher = ScorecardEnricher::new(&scorecard);

    let request = ApiRequest::get(SCORES_ENDPOINT).path_param("tag", scorecard_tag);
    lister.list_enriched::<ScorePage, _, _, _, _>(ctx, &request, sink, |scored| {
        enricher
            .enrich(scored)
            .into_iter()
            .map(ScorecardScoreRow::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedTransport;
    use crate::fetch::VecSink;
    use serde_json::{json, Value};

    fn scorecard_body() -> Value {
        json!({"scorecard": {
            "rules": [{
                "identifier": "rule1",
                "title": "Has owner",
                "description": "Every service needs an owner",
                "effectiveFrom": "2025-01-01",
                "levelName": "Level 1",
                "weight": 10
            }],
            "levels": [{"level": {"name": "Level 1", "number": 1}}]
        }})
    }

    fn scores_page(rules: Value, page: u32, total_pages: u32) -> Value {
        json!({
            "scorecardName": "Production Readiness",
            "scorecardTag": "prod-ready",
            "serviceScores": [{
                "lastEvaluated": "2025-05-02T12:00:00Z",
                "service": {"name": "Service 1", "tag": "service-1", "groups": ["platform"]},
                "score": {"rules": rules}
            }],
            "page": page,
            "totalPages": total_pages,
            "total": total_pages
        })
    }

    #[test]
    fn test_scores_are_joined_with_rules() {
        let transport = ScriptedTransport::new()
            .respond_json(&scorecard_body())
            .respond_json(&scores_page(
                json!([
                    {"identifier": "rule1", "score": 10, "expression": "owners.count > 0"},
                    {"identifier": "rule2", "score": 10}
                ]),
                0,
                1,
            ));
        let mut sink = VecSink::unbounded();

        list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready").unwrap();

        assert_eq!(sink.len(), 1);
        let row = &sink.items()[0];
        assert_eq!(row.scorecard_name, "Production Readiness");
        assert_eq!(row.service_tag, "service-1");
        assert_eq!(row.service_groups, vec!["platform"]);
        assert_eq!(row.rule_identifier, "rule1");
        assert_eq!(row.rule_title, "Has owner");
        assert_eq!(row.rule_expression, "owners.count > 0");
        assert_eq!(row.rule_level_number, 1);
        assert!(row.rule_pass);

        let requests = transport.requests();
        assert_eq!(requests[0].resolved_path(), "/api/v1/scorecards/prod-ready");
        assert_eq!(requests[1].resolved_path(), "/api/v1/scorecards/prod-ready/scores");
    }

    #[test]
    fn test_scorecard_failure_aborts_before_scores() {
        let transport = ScriptedTransport::new()
            .respond(500, r#"{"details": "fake error on scorecard"}"#)
            .respond_json(&scores_page(json!([{"identifier": "rule1", "score": 10}]), 0, 1));
        let mut sink = VecSink::unbounded();

        let err = list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready")
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"error from cortex API 500 Internal Server Error: {"details": "fake error on scorecard"}"#
        );
        assert!(sink.is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_scores_span_pages() {
        let transport = ScriptedTransport::new()
            .respond_json(&scorecard_body())
            .respond_json(&scores_page(json!([{"identifier": "rule1", "score": 10}]), 0, 2))
            .respond_json(&scores_page(json!([{"identifier": "rule1", "score": 3}]), 1, 2));
        let mut sink = VecSink::unbounded();

        let summary =
            list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready").unwrap();

        assert_eq!(summary.pages_fetched, 2);
        let passes: Vec<_> = sink.items().iter().map(|r| r.rule_pass).collect();
        assert_eq!(passes, vec![true, false]);
    }

    #[test]
    fn test_service_without_score_is_skipped() {
        let transport = ScriptedTransport::new()
            .respond_json(&scorecard_body())
            .respond_json(&json!({
                "scorecardName": "Production Readiness",
                "scorecardTag": "prod-ready",
                "serviceScores": [{"service": {"name": "Service 1"}, "score": null}],
                "page": 0,
                "totalPages": 1,
                "total": 1
            }));
        let mut sink = VecSink::unbounded();

        list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready").unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_last_evaluated_is_kept_verbatim() {
        let mut page = scores_page(json!([{"identifier": "rule1", "score": 10}]), 0, 1);
        page["serviceScores"][0]["lastEvaluated"] = json!("2025-05-02T12:00:00.640218");
        let transport = ScriptedTransport::new()
            .respond_json(&scorecard_body())
            .respond_json(&page);
        let mut sink = VecSink::unbounded();

        list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready").unwrap();

        assert_eq!(
            sink.items()[0].last_evaluated.as_deref(),
            Some("2025-05-02T12:00:00.640218")
        );
    }

    #[test]
    fn test_null_rule_identifier_is_dropped_not_fatal() {
        let transport = ScriptedTransport::new()
            .respond_json(&scorecard_body())
            .respond_json(&scores_page(
                json!([
                    {"identifier": null, "score": null, "expression": null},
                    {"identifier": "rule1", "score": 10}
                ]),
                0,
                1,
            ));
        let mut sink = VecSink::unbounded();

        list_scorecard_scores(&transport, &QueryContext::background(), &mut sink, "prod-ready").unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.items()[0].rule_identifier, "rule1");
    }
}
