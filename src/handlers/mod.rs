// handlers/mod.rs - Route handlers
//
// Every admin handler is a one-liner around `delegate`: pull the request
// apart, hand it to the backend, relay whatever comes back. Method
// checking happens in the router (see `middleware::method`).

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod homework;
pub mod school;
pub mod service;
pub mod student;
pub mod subject;
pub mod teacher;

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Invoke `delegate` once and relay its answer.
pub async fn delegate(
    state: &AppState,
    delegate: Delegate,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    let request_id = request.request_id.clone();
    match state.backend.call(delegate.clone(), request).await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::warn!(request_id = %request_id, delegate = %delegate, "Delegate failed: {}", e);
            Err(e)
        }
    }
}
