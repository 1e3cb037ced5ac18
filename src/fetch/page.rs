//! Page envelope
//!
//! Paginated endpoints answer `{<items>: [...], page, totalPages, total}` where
//! the items key differs per endpoint. `page` is zero-based.

use crate::catalog::null_as_default;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

/// A decoded page of some endpoint
pub trait Paged: DeserializeOwned {
    type Item;

    fn info(&self) -> PageInfo;

    fn into_items(self) -> Vec<Self::Item>;
}
