use super::{HttpRequest, HttpResponse, Transport};
use crate::error::{DkapiError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Scripted transport for tests.
///
/// Responses are returned in the order they were queued; every request is
/// recorded so tests can assert on what went over the wire. Running out of
/// responses is reported as a transport failure.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(DkapiError::Transport(reason.into())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn pending(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(DkapiError::Transport("no scripted response".to_string())))
    }
}
