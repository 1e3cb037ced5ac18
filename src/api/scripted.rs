//! Canned-response transport for tests and offline replay

use super::{ApiRequest, ApiResponse, ApiResult, QueryContext, Transport};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Replays queued responses in order and records every request it receives.
///
/// Requests beyond the script get a `404` so a runaway pagination loop shows
/// up as an API error instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<ApiResult<ApiResponse>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a `200 OK` JSON body
    pub fn respond_json(self, body: &serde_json::Value) -> Self {
        self.respond(200, body.to_string())
    }

    /// Queue a transport-level failure
    pub fn fail(self, error: super::ApiError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, result: ApiResult<ApiResponse>) {
        self.script.borrow_mut().push_back(result);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn remaining_responses(&self) -> usize {
        self.script.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, ctx: &QueryContext, request: &ApiRequest) -> ApiResult<ApiResponse> {
        ctx.check()?;
        self.requests.borrow_mut().push(request.clone());
        self.script.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(ApiResponse::new(
                404,
                format!("no scripted response for {}", request.resolved_path()),
            ))
        })
    }
}
