//! Cortex catalog - streaming fetch engine for the Cortex service catalog API
//!
//! Lists catalog entities, descriptors, teams, packages and scorecard scores
//! page by page, pushing projected rows into a caller-supplied
//! [`RowSink`](fetch::RowSink) that can stop the listing early.
//!
//! ```no_run
//! use cortex_catalog::api::{HttpTransport, QueryContext};
//! use cortex_catalog::catalog::{list_entities, EntityFilter};
//! use cortex_catalog::fetch::VecSink;
//!
//! let transport = HttpTransport::new("https://api.getcortexapp.com", "token");
//! let mut sink = VecSink::with_limit(50);
//! list_entities(&transport, &QueryContext::background(), &mut sink, &EntityFilter::default())?;
//! # Ok::<(), cortex_catalog::api::ApiError>(())
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod graph;
pub mod scorecard;
