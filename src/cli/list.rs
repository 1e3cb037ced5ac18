//! Table listing commands

use super::{Cli, Commands};
use crate::api::{ApiResult, HttpTransport, QueryContext};
use crate::catalog::{
    list_descriptors, list_entities, list_packages, list_scorecard_scores, list_teams, EntityFilter,
};
use crate::config::ConnectionConfig;
use crate::fetch::{JsonLinesSink, ListSummary};
use crate::filter::GroupQual;
use anyhow::{Context, Result};
use std::io::{self, StdoutLock};
use std::time::Duration;
use tracing::info;

pub(super) fn run(cli: &Cli, config: &ConnectionConfig) -> Result<()> {
    let transport = HttpTransport::from_config(config)?;
    let ctx = match cli.timeout {
        Some(secs) => QueryContext::with_timeout(Duration::from_secs(secs)),
        None => QueryContext::background(),
    };

    match &cli.command {
        Commands::Entities {
            archived,
            entity_type,
            groups,
            groups_any,
        } => {
            let filter = entity_filter(*archived, entity_type.clone(), groups, groups_any);
            emit(cli.limit, |sink| list_entities(&transport, &ctx, sink, &filter))
        }
        Commands::Descriptors => emit(cli.limit, |sink| list_descriptors(&transport, &ctx, sink)),
        Commands::Teams => emit(cli.limit, |sink| list_teams(&transport, &ctx, sink)),
        Commands::Packages { tag } => emit(cli.limit, |sink| list_packages(&transport, &ctx, sink, tag)),
        Commands::Scores { scorecard_tag } => emit(cli.limit, |sink| {
            list_scorecard_scores(&transport, &ctx, sink, scorecard_tag)
        }),
        Commands::Tables => Ok(()),
    }
}

fn entity_filter(
    include_archived: bool,
    entity_type: Option<String>,
    groups: &[String],
    groups_any: &[String],
) -> EntityFilter {
    let mut quals: Vec<GroupQual> = groups.iter().map(GroupQual::exists_one).collect();
    if !groups_any.is_empty() {
        quals.push(GroupQual::exists_any(groups_any.iter().cloned()));
    }
    EntityFilter {
        include_archived,
        entity_type,
        groups: quals,
    }
}

/// Run one listing into a JSON lines sink on stdout
fn emit<F>(limit: Option<u64>, list: F) -> Result<()>
where
    F: FnOnce(&mut JsonLinesSink<StdoutLock<'static>>) -> ApiResult<ListSummary>,
{
    let mut sink = JsonLinesSink::new(io::stdout().lock(), limit);
    let summary = list(&mut sink)?;
    let _stdout = sink.finish().context("Failed to write rows to stdout")?;
    info!(
        "streamed {} rows from {} pages{}",
        summary.rows_streamed,
        summary.pages_fetched,
        if summary.stopped_early { " (limit reached)" } else { "" }
    );
    Ok(())
}
