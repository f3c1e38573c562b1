use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    Result,
    client::RemixClient,
    runtime::{ContextStore, RemixContext, SessionId},
};

/// Everything a node invocation may reach: its session, the context store,
/// the HTTP client and the host managed output directory.
#[derive(Clone)]
pub struct Context {
    session: SessionId,
    store: Arc<ContextStore>,
    client: Arc<RemixClient>,
    output_directory: PathBuf,
}

impl Context {
    pub fn new(
        session: impl Into<SessionId>,
        store: Arc<ContextStore>,
        client: Arc<RemixClient>,
        output_directory: PathBuf,
    ) -> Self {
        Self {
            session: session.into(),
            store,
            client,
            output_directory,
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// The active remote context of this session.
    ///
    /// The store is only read here, so a node that never calls this never
    /// fails with [`crate::RemixError::NoActiveContext`].
    pub fn remix(&self) -> Result<RemixContext> {
        self.store.get(&self.session)
    }

    pub fn start_context(
        &self,
        address: impl Into<String>,
        port: u16,
    ) -> RemixContext {
        self.store.set(&self.session, address, port)
    }

    pub fn end_context(&self) {
        self.store.clear(&self.session);
    }

    pub fn client(&self) -> &RemixClient {
        &self.client
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}
