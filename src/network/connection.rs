//! Client Connection
//!
//! One TCP connection to the key-value server, used by exactly one worker.

use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use bytes::BytesMut;

use crate::client::{Client, Request};
use crate::error::{BenchError, Result};
use crate::protocol::{read_reply, Reply};

/// A client connection executing requests in strict FIFO order
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer; each request goes out in a single write
    writer: TcpStream,

    /// Scratch buffer reused for request encoding
    buf: BytesMut,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `addr` (`host:port`)
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|e| {
            BenchError::Transport(format!("failed to connect to {}: {}", addr, e))
        })?;
        Self::new(stream)
    }

    /// Wrap an already connected stream
    pub fn new(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: stream,
            buf: BytesMut::with_capacity(4096),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves the direction blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Encode and write one request
    fn send(&mut self, request: &Request) -> Result<()> {
        tracing::debug!(
            op = request.command.name(),
            key = %request.key,
            value_len = request.value.len(),
            "send request"
        );

        self.buf.clear();
        request.encode(&mut self.buf);
        self.writer.write_all(&self.buf)?;
        Ok(())
    }

    /// Send a request, logging rather than returning a failure
    ///
    /// The matching reply is still read afterwards so that later replies stay
    /// paired with their requests.
    fn send_logged(&mut self, request: &Request, context: &str) {
        if let Err(e) = self.send(request) {
            tracing::error!(
                peer = %self.peer_addr,
                op = request.command.name(),
                key = %request.key,
                "[{}] failed to send request: {}",
                context,
                e
            );
        }
    }

    /// Read the next reply on the wire
    fn recv(&mut self) -> Result<Reply> {
        let reply = read_reply(&mut self.reader)?;
        tracing::trace!(
            error = reply.is_error(),
            len = reply.payload().len(),
            "recv reply"
        );
        Ok(reply)
    }
}

impl Client for Connection {
    fn execute_one(&mut self, request: &mut Request) -> Result<()> {
        self.send_logged(request, "single");
        request.outcome = Some(self.recv()?);
        Ok(())
    }

    fn execute_pipeline(&mut self, requests: &mut [Request]) -> Result<()> {
        if requests.is_empty() {
            return Ok(());
        }

        // Phase 1: write every request before reading anything
        for request in requests.iter() {
            self.send_logged(request, "pipeline");
        }

        tracing::debug!(batch = requests.len(), "pipeline written, reading replies");

        // Phase 2: the i-th reply belongs to the i-th request. A failed read
        // ends the batch; later outcomes stay unset.
        for request in requests.iter_mut() {
            request.outcome = Some(self.recv()?);
        }

        Ok(())
    }
}
