use std::{path::Path, sync::Arc};

use crate::{
    client::RemixClient,
    runtime::{Context, ContextStore, DEFAULT_SESSION},
};

/// A session without any active remote context.
pub fn unbound_context() -> Context {
    context_in(&std::env::temp_dir())
}

/// A session without any active remote context, writing to `output_directory`.
pub fn context_in(output_directory: &Path) -> Context {
    let client = RemixClient::new().expect("http client");
    Context::new(DEFAULT_SESSION, Arc::new(ContextStore::new(16)), Arc::new(client), output_directory.to_path_buf())
}

/// A session whose context points at the mock server.
pub fn context_for(server: &mockito::Server) -> Context {
    bind(unbound_context(), server)
}

/// Starts the context of `ctx` on the mock server.
pub fn bind(
    ctx: Context,
    server: &mockito::Server,
) -> Context {
    let host = server.host_with_port();
    let (address, port) = host.rsplit_once(':').expect("host with port");
    ctx.start_context(address, port.parse().expect("port"));
    ctx
}
