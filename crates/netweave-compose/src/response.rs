//! Helpers that build and mark a [`RunFunctionResponse`].

use std::time::Duration;

use crate::function::{
    DesiredResources, FnResult, ResponseMeta, RunFunctionRequest, RunFunctionResponse, Severity,
};

/// Starts a response to `req`.
///
/// The tag, the desired state, and the context are carried over from the
/// request so that a function which adds nothing passes the pipeline state
/// through unchanged.
#[must_use]
pub fn to(req: &RunFunctionRequest, ttl: Duration) -> RunFunctionResponse {
    RunFunctionResponse {
        meta: ResponseMeta {
            tag: req.meta.tag.clone(),
            ttl: Some(ttl),
        },
        desired: req.desired.clone(),
        results: Vec::new(),
        context: req.context.clone(),
    }
}

/// Marks `rsp` as fatal with `context: err` as its message.
pub fn fatal(rsp: &mut RunFunctionResponse, context: &str, err: &dyn std::error::Error) {
    let message = format!("{context}: {err}");
    tracing::error!(tag = %rsp.meta.tag, error = %message, "function failed");
    rsp.results.push(FnResult {
        severity: Severity::Fatal,
        message,
    });
}

/// Replaces the desired composed resources carried by `rsp`.
pub fn set_desired_resources(rsp: &mut RunFunctionResponse, desired: DesiredResources) {
    rsp.desired.resources = desired;
}
