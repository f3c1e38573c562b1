//! Session scoped store of the active remote context.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{RemixError, Result, common::MemCache};

/// Identifies one run of a graph.
pub type SessionId = String;

/// Session used by hosts that do not scope their runs.
pub const DEFAULT_SESSION: &str = "default";

/// Network location of the remote service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemixContext {
    pub address: String,
    pub port: u16,
}

impl RemixContext {
    pub fn new(
        address: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Base url of the service, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}

impl fmt::Display for RemixContext {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Holds at most one active [`RemixContext`] per session.
///
/// Writes to a session overwrite whatever was there: the last start context
/// wins. Sessions never observe each other's context. A context stays until
/// its session clears it, however many sessions are active.
pub struct ContextStore {
    contexts: MemCache<SessionId, RemixContext>,
}

impl ContextStore {
    pub fn new(capacity: u64) -> Self {
        Self {
            contexts: MemCache::new(capacity),
        }
    }

    pub fn set(
        &self,
        session: &str,
        address: impl Into<String>,
        port: u16,
    ) -> RemixContext {
        let context = RemixContext::new(address, port);
        if let Some(previous) = self.contexts.get(&session.to_string()) {
            if previous != context {
                warn!(session, %previous, %context, "overwriting active remix context");
            }
        }
        trace!(session, %context, "set remix context");
        self.contexts.set(session.to_string(), context.clone());
        context
    }

    pub fn get(
        &self,
        session: &str,
    ) -> Result<RemixContext> {
        self.contexts.get(&session.to_string()).ok_or_else(|| RemixError::NoActiveContext(session.to_string()))
    }

    /// Clearing an unset session is a no-op.
    pub fn clear(
        &self,
        session: &str,
    ) {
        if let Some(context) = self.contexts.remove(&session.to_string()) {
            trace!(session, %context, "cleared remix context");
        }
    }
}
