//! Paginated, row-budget-aware streaming
//!
//! [`PaginatedLister`] drives [`PageFetcher`] page by page, enriches each item
//! and pushes the resulting rows into a [`RowSink`]. After every row the sink's
//! remaining capacity is polled; zero stops paging immediately, mid-page.

mod fetcher;
mod lister;
mod page;
mod sink;

pub use fetcher::PageFetcher;
pub use lister::{ListSummary, PaginatedLister, DEFAULT_PAGE_SIZE};
pub use page::{PageInfo, Paged};
pub use sink::{JsonLinesSink, RowSink, VecSink};
