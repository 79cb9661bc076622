//! Network Module
//!
//! TCP client connection and the reference server.
//!
//! ## Architecture
//! - `Connection`: one client socket per benchmark worker
//! - `Server`: single acceptor thread, one thread per session
//! - `MemoryStore`: shared map behind the server sessions

mod connection;
mod server;
mod session;
mod store;

pub use connection::Connection;
pub use server::{Server, ServerHandle};
pub use session::Session;
pub use store::MemoryStore;
