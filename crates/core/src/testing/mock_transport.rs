//! Mock transport for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::fixtures;
use crate::transport::{ApiRequest, Transport, TransportError, TransportResponse};

type Reply = Result<TransportResponse, TransportError>;

/// Mock implementation of the Transport trait.
///
/// Provides controllable behavior for testing:
/// - Replay queued responses or errors, in order
/// - Fall back to a canned success once the queue is empty
/// - Record every request for assertions
///
/// Clones share state, so a test can keep one handle and give another to
/// the client.
#[derive(Debug, Clone)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    default_reply: Arc<Mutex<TransportResponse>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock that answers every request with a success body.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_reply: Arc::new(Mutex::new(TransportResponse::new(
                200,
                fixtures::success_body(),
            ))),
        }
    }

    // =========================================================================
    // Reply Configuration
    // =========================================================================

    /// Queue a response for the next unanswered request.
    pub fn push_response(&self, response: TransportResponse) {
        self.lock_replies().push_back(Ok(response));
    }

    /// Queue a response built from a status and body.
    pub fn push_body(&self, status: u16, body: impl Into<String>) {
        self.push_response(TransportResponse::new(status, body));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.lock_replies().push_back(Err(error));
    }

    /// Replace the response used once the queue is empty.
    pub fn set_default_response(&self, response: TransportResponse) {
        *self
            .default_reply
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = response;
    }

    // =========================================================================
    // Request Recording
    // =========================================================================

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock_requests().clone()
    }

    /// Get the most recent request.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.lock_requests().last().cloned()
    }

    /// Get the number of requests sent.
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Clear recorded requests.
    pub fn clear_recorded(&self) {
        self.lock_requests().clear();
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ApiRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportError> {
        self.lock_requests().push(request);

        let queued = self.lock_replies().pop_front();
        match queued {
            Some(reply) => reply,
            None => Ok(self
                .default_reply
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()),
        }
    }
}
