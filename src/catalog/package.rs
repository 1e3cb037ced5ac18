//! `cortex_package`: packages declared by one catalog entity

use super::lenient::null_as_default;
use crate::api::{ApiRequest, ApiResult, QueryContext, Transport};
use crate::fetch::{ListSummary, PaginatedLister, RowSink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub const PACKAGES_ENDPOINT: &str = "/api/v1/catalog/{tag}/packages";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Package {
    pub date_created: Option<String>,
    pub id: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub package_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRow {
    pub package_tag: String,
    pub package_type: String,
    pub name: String,
    pub version: String,
}

impl PackageRow {
    fn new(package_tag: &str, package: Package) -> Self {
        Self {
            package_tag: package_tag.to_string(),
            package_type: package.package_type,
            name: package.name,
            version: package.version,
        }
    }
}

/// List the packages of the entity tagged `package_tag` (one unpaginated call)
pub fn list_packages<T, S>(
    transport: T,
    ctx: &QueryContext,
    sink: &mut S,
    package_tag: &str,
) -> ApiResult<ListSummary>
where
    T: Transport,
    S: RowSink<PackageRow>,
{
    info!("listing packages for {}", package_tag);
    let request = ApiRequest::get(PACKAGES_ENDPOINT)
        .path_param("tag", package_tag)
        .query("yaml", "false");
    PaginatedLister::new(transport).stream_once(ctx, &request, sink, move |packages: Vec<Package>| {
        packages
            .into_iter()
            .map(move |package| PackageRow::new(package_tag, package))
    })
}
