//! Transport seam between the listing core and HTTP

use super::{ApiError, ApiResult, QueryContext};

/// One GET against the Cortex API.
///
/// `path` may contain `{name}` placeholders that are filled from the path
/// parameters, e.g. `/api/v1/scorecards/{tag}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    path: String,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_params: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_query(key, value);
        self
    }

    /// Set a query parameter, replacing an existing value for the same key
    pub fn set_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key, value)),
        }
    }

    /// Path template as given, used to label logs and errors
    pub fn endpoint(&self) -> &str {
        &self.path
    }

    /// Path with placeholders substituted (values are percent-encoded)
    pub fn resolved_path(&self) -> String {
        let mut path = self.path.clone();
        for (name, value) in &self.path_params {
            path = path.replace(
                &format!("{{{}}}", name),
                &urlencoding::encode(value),
            );
        }
        path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Whether the API reported an error, independent of decoding the body
    pub fn is_error_state(&self) -> bool {
        self.status >= 400
    }

    /// `"<code> <reason>"`, e.g. `500 Internal Server Error`
    pub fn status_line(&self) -> String {
        match ureq::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }

    pub fn into_error(self) -> ApiError {
        ApiError::Status {
            status: self.status_line(),
            body: self.body,
        }
    }
}

/// Performs authenticated GETs for the listing core.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; `Err` is reserved for connection failures and context aborts.
/// Retrying transient failures is the transport's job, not the caller's.
pub trait Transport {
    fn get(&self, ctx: &QueryContext, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, ctx: &QueryContext, request: &ApiRequest) -> ApiResult<ApiResponse> {
        (**self).get(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params_are_substituted() {
        let req = ApiRequest::get("/api/v1/scorecards/{tag}/scores").path_param("tag", "tag1");
        assert_eq!(req.resolved_path(), "/api/v1/scorecards/tag1/scores");
        assert_eq!(req.endpoint(), "/api/v1/scorecards/{tag}/scores");
    }

    #[test]
    fn test_path_params_are_encoded() {
        let req = ApiRequest::get("/api/v1/catalog/{tag}/packages").path_param("tag", "a b/c");
        assert_eq!(req.resolved_path(), "/api/v1/catalog/a%20b%2Fc/packages");
    }

    #[test]
    fn test_set_query_replaces_existing_value() {
        let mut req = ApiRequest::get("/api/v1/catalog")
            .query("page", "0")
            .query("pageSize", "1000");
        req.set_query("page", "3");
        assert_eq!(req.query_value("page"), Some("3"));
        assert_eq!(req.query_pairs().len(), 2);
    }

    #[test]
    fn test_status_line_and_error_state() {
        let resp = ApiResponse::new(500, "boom");
        assert!(resp.is_error_state());
        assert_eq!(resp.status_line(), "500 Internal Server Error");
        assert!(!ApiResponse::ok("{}").is_error_state());
        assert!(!ApiResponse::new(302, "").is_error_state());
    }

    #[test]
    fn test_unknown_status_has_no_reason() {
        assert_eq!(ApiResponse::new(599, "").status_line(), "599");
    }
}
