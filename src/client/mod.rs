//! Client Module
//!
//! The capability every benchmark backend provides, and the factory that
//! picks one by name.
//!
//! Only the length-prefixed TCP client is implemented; the `redis` and
//! `http` kinds are recognised but rejected when connecting.

mod request;

pub use request::Request;

use crate::config::{BenchConfig, ClientKind};
use crate::error::{BenchError, Result};
use crate::network::Connection;

/// A connection able to execute benchmark requests
///
/// Implementations must pair replies with requests strictly in send order.
pub trait Client: Send {
    /// Send one request and store its reply in `request.outcome`
    fn execute_one(&mut self, request: &mut Request) -> Result<()>;

    /// Send every request, then read one reply per request in the same order
    ///
    /// An empty batch is a no-op.
    fn execute_pipeline(&mut self, requests: &mut [Request]) -> Result<()>;
}

impl<C: Client + ?Sized> Client for Box<C> {
    fn execute_one(&mut self, request: &mut Request) -> Result<()> {
        (**self).execute_one(request)
    }

    fn execute_pipeline(&mut self, requests: &mut [Request]) -> Result<()> {
        (**self).execute_pipeline(requests)
    }
}

/// Open a client of the configured kind against the configured server
pub fn connect(config: &BenchConfig) -> Result<Box<dyn Client>> {
    match config.client_kind {
        ClientKind::Tcp => {
            let mut conn = Connection::connect(&config.server_addr())?;
            conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
            Ok(Box::new(conn))
        }
        kind @ (ClientKind::Redis | ClientKind::Http) => Err(BenchError::UnsupportedClient(
            format!("{} client is not implemented", kind),
        )),
    }
}
