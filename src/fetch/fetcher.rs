//! Single request + decode

use crate::api::{ApiError, ApiRequest, ApiResult, QueryContext, Transport};
use serde::de::DeserializeOwned;
use tracing::error;

use super::Paged;

pub struct PageFetcher<T> {
    transport: T,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `request` and decode the body as `D`.
    ///
    /// An error status aborts with the status line and raw body; a body that
    /// does not match `D` aborts with a decode error.
    pub fn fetch<D: DeserializeOwned>(&self, ctx: &QueryContext, request: &ApiRequest) -> ApiResult<D> {
        let response = self.transport.get(ctx, request)?;

        if response.is_error_state() {
            error!(
                "{}: status {}, body {}",
                request.endpoint(),
                response.status_line(),
                response.body
            );
            return Err(response.into_error());
        }

        serde_json::from_str(&response.body).map_err(|source| {
            error!("{}: decode failed: {}", request.endpoint(), source);
            ApiError::Decode {
                endpoint: request.endpoint().to_string(),
                source,
            }
        })
    }

    /// Fetch page `page` of a paginated endpoint
    pub fn fetch_page<P: Paged>(
        &self,
        ctx: &QueryContext,
        request: &ApiRequest,
        page: u32,
        page_size: u32,
    ) -> ApiResult<P> {
        let mut request = request.clone();
        request.set_query("pageSize", page_size.to_string());
        request.set_query("page", page.to_string());
        self.fetch(ctx, &request)
    }
}
