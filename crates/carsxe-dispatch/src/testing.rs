//! Shared test utilities for dispatcher testing
//!
//! [`ScriptedTransport`] replays canned responses in order and records every
//! request it receives, so tests can assert on both sides of the call.

use crate::request::OutboundRequest;
use crate::transport::{HttpResponse, HttpTransport, TransportFailure};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

type Scripted = Result<HttpResponse, TransportFailure>;

/// Transport that answers from a script instead of the network.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and JSON `body`.
    pub fn respond(self, status: u16, body: Value) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn fail(self, message: impl Into<String>, status: Option<u16>) -> Self {
        self.push(Err(TransportFailure {
            message: message.into(),
            status,
        }))
    }

    fn push(self, entry: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of scripted entries not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<HttpResponse, TransportFailure> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(TransportFailure::new("no scripted response left")))
    }
}
