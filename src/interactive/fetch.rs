//! Network capability for mounted components.
//!
//! Components never touch the real network. The default capability rejects
//! every request; checks that need data swap in a [`FakeFetch`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: String,
    pub url: String,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        FetchRequest {
            method: "GET".to_string(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network access is disabled: {method} {url}")]
    Offline { method: String, url: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Body(#[from] serde_json::Error),
}

pub trait Fetch {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;

    /// Delay before the response is delivered. `None` uses the configured default.
    fn latency_ms(&self) -> Option<u64> {
        None
    }
}

/// Rejects every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetch;

impl Fetch for OfflineFetch {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        Err(FetchError::Offline {
            method: request.method.clone(),
            url: request.url.clone(),
        })
    }

    fn latency_ms(&self) -> Option<u64> {
        Some(0)
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String },
    Fail(String),
}

/// Deterministic stand-in for the network. Clones share the call log.
#[derive(Debug, Clone)]
pub struct FakeFetch {
    reply: Reply,
    latency_ms: Option<u64>,
    calls: Rc<RefCell<Vec<FetchRequest>>>,
}

impl FakeFetch {
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        FakeFetch {
            reply: Reply::Respond {
                status,
                body: body.into(),
            },
            latency_ms: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// 200 with `value` serialized as the body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::respond(200, serde_json::to_string(value)?))
    }

    /// Every request fails at the network level.
    pub fn failing(message: impl Into<String>) -> Self {
        FakeFetch {
            reply: Reply::Fail(message.into()),
            latency_ms: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetch for FakeFetch {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.borrow_mut().push(request.clone());
        match &self.reply {
            Reply::Respond { status, body } => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            Reply::Fail(message) => Err(FetchError::Network(message.clone())),
        }
    }

    fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }
}
