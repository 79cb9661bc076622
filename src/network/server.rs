//! TCP Server
//!
//! Reference server for the wire protocol: accepts connections and serves
//! each one on its own thread against a shared in-memory store.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{BenchError, Result};

use super::{MemoryStore, Session};

/// TCP server speaking the benchmark wire protocol
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    store: Arc<MemoryStore>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind to `addr`; port 0 picks a free port
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| BenchError::Transport(format!("failed to bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            store: Arc::new(MemoryStore::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared store, for inspection and seeding
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Start the server (blocking until shutdown is signalled)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr);

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let store = Arc::clone(&self.store);
            let spawned = thread::Builder::new()
                .name("kvbench-session".to_string())
                .spawn(move || {
                    let mut session = match Session::new(stream, store) {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!("Failed to set up session: {}", e);
                            return;
                        }
                    };
                    if let Err(e) = session.handle() {
                        tracing::debug!("Session {} ended with error: {}", session.peer_addr(), e);
                    }
                });

            if let Err(e) = spawned {
                tracing::error!("Failed to spawn session thread: {}", e);
            }
        }

        tracing::info!("Server on {} stopped", self.local_addr);
        Ok(())
    }

    /// Run the accept loop on a background thread
    pub fn spawn(self) -> Result<ServerHandle> {
        let addr = self.local_addr;
        let store = self.store();
        let shutdown = Arc::clone(&self.shutdown);

        let thread = thread::Builder::new()
            .name("kvbench-server".to_string())
            .spawn(move || self.run())?;

        Ok(ServerHandle {
            addr,
            store,
            shutdown,
            thread: Some(thread),
        })
    }

    /// Signal the server to stop accepting connections
    pub fn shutdown(&self) {
        signal_shutdown(&self.shutdown, self.local_addr);
    }
}

/// Handle to a server running on a background thread
///
/// Dropping the handle stops the accept loop.
pub struct ServerHandle {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Stop the accept loop and wait for it to exit
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        signal_shutdown(&self.shutdown, self.addr);
        thread
            .join()
            .map_err(|_| BenchError::Transport("server thread panicked".to_string()))?
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Set the flag, then wake the blocking accept with a throwaway connection
fn signal_shutdown(flag: &AtomicBool, addr: SocketAddr) {
    flag.store(true, Ordering::Release);
    let _ = TcpStream::connect(addr);
}
