//! Pagination driver

use crate::api::{ApiRequest, ApiResult, QueryContext, Transport};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{PageFetcher, Paged, RowSink};

/// Items requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// What a listing call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSummary {
    pub pages_fetched: u32,
    pub rows_streamed: u64,
    /// The sink ran out of capacity before the data did
    pub stopped_early: bool,
}

pub struct PaginatedLister<T> {
    fetcher: PageFetcher<T>,
    page_size: u32,
}

impl<T: Transport> PaginatedLister<T> {
    pub fn new(transport: T) -> Self {
        Self {
            fetcher: PageFetcher::new(transport),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn fetcher(&self) -> &PageFetcher<T> {
        &self.fetcher
    }

    /// Stream every item of a paginated endpoint into `sink` as-is
    pub fn list<P, S>(&self, ctx: &QueryContext, request: &ApiRequest, sink: &mut S) -> ApiResult<ListSummary>
    where
        P: Paged,
        S: RowSink<P::Item>,
    {
        self.list_enriched::<P, _, _, _, _>(ctx, request, sink, std::iter::once)
    }

    /// Stream a paginated endpoint, turning each item into zero or more rows.
    ///
    /// Starts at page 0 and stops when the sink has no capacity left (success,
    /// even mid-page) or once `page >= totalPages`. `totalPages == 0` still
    /// costs exactly one fetch. Any fetch or decode error aborts the listing;
    /// rows already streamed stay delivered.
    pub fn list_enriched<P, R, I, S, F>(
        &self,
        ctx: &QueryContext,
        request: &ApiRequest,
        sink: &mut S,
        mut enrich: F,
    ) -> ApiResult<ListSummary>
    where
        P: Paged,
        I: IntoIterator<Item = R>,
        S: RowSink<R>,
        F: FnMut(P::Item) -> I,
    {
        let mut summary = ListSummary::default();
        let mut page = 0u32;
        loop {
            ctx.check()?;
            debug!("{}: fetching page {}", request.endpoint(), page);
            let response: P = self
                .fetcher
                .fetch_page(ctx, request, page, self.page_size)?;
            summary.pages_fetched += 1;

            let info = response.info();
            debug!(
                "{}: page {} of {} ({} total)",
                request.endpoint(),
                info.page,
                info.total_pages,
                info.total
            );

            let rows = response.into_items().into_iter().flat_map(&mut enrich);
            if !stream_rows(ctx, sink, rows, &mut summary)? {
                debug!("{}: sink full after {} rows", request.endpoint(), summary.rows_streamed);
                return Ok(summary);
            }

            page += 1;
            if page >= info.total_pages {
                break;
            }
        }
        Ok(summary)
    }

    /// One unpaginated GET whose decoded body is turned into rows and streamed
    /// with the same per-row budget check
    pub fn stream_once<D, R, I, S, F>(
        &self,
        ctx: &QueryContext,
        request: &ApiRequest,
        sink: &mut S,
        into_rows: F,
    ) -> ApiResult<ListSummary>
    where
        D: DeserializeOwned,
        I: IntoIterator<Item = R>,
        S: RowSink<R>,
        F: FnOnce(D) -> I,
    {
        ctx.check()?;
        let body: D = self.fetcher.fetch(ctx, request)?;
        let mut summary = ListSummary {
            pages_fetched: 1,
            ..Default::default()
        };
        if !stream_rows(ctx, sink, into_rows(body), &mut summary)? {
            debug!("{}: sink full after {} rows", request.endpoint(), summary.rows_streamed);
        }
        Ok(summary)
    }
}

/// Deliver rows until they run out (`true`) or the sink is full (`false`)
fn stream_rows<R, S: RowSink<R>>(
    ctx: &QueryContext,
    sink: &mut S,
    rows: impl IntoIterator<Item = R>,
    summary: &mut ListSummary,
) -> ApiResult<bool> {
    for row in rows {
        if sink.rows_remaining() == Some(0) {
            summary.stopped_early = true;
            return Ok(false);
        }
        sink.stream_list_item(row);
        summary.rows_streamed += 1;

        if sink.rows_remaining() == Some(0) {
            summary.stopped_early = true;
            return Ok(false);
        }
        ctx.check()?;
    }
    Ok(true)
}
