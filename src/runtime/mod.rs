mod context;
mod store;

pub use context::Context;
pub use store::{ContextStore, DEFAULT_SESSION, RemixContext, SessionId};
