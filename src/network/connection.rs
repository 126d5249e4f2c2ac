//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::error::{KdictError, Result};
use crate::protocol::{read_request, write_response, Request, Response, GET_CODE, PAIR_SIZE};
use super::ShutdownHandle;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Routes requests to the store
    dispatcher: Dispatcher,

    /// Checked between requests
    shutdown: ShutdownHandle,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, dispatcher: Dispatcher, shutdown: ShutdownHandle) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Requests are small and synchronous; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
            shutdown,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction without timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends responses.
    /// Returns when the client disconnects, goes idle past the read timeout,
    /// sends a malformed frame, or the server is shutting down.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if self.shutdown.is_shutdown() {
                tracing::debug!("Closing {} for shutdown", self.peer_addr);
                return Ok(());
            }

            let request = match read_request(&mut self.reader) {
                Ok(request) => request,
                Err(KdictError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(KdictError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(Response::from_error(&e));
                    return Err(e);
                }
            };

            tracing::trace!(
                "Received code 0x{:08x} ({} bytes) from {}",
                request.code,
                request.payload.len(),
                self.peer_addr
            );

            let response = self.execute(request);

            if let Err(e) = self.send_response(response) {
                if let KdictError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Run one control call and build its response
    ///
    /// The request payload plays the caller's memory: the dispatcher reads
    /// the record from it and, for a successful GET, writes the result back
    /// into it.
    fn execute(&self, request: Request) -> Response {
        let Request { code, mut payload } = request;

        match self.dispatcher.dispatch(code, &mut payload) {
            Ok(()) if code == GET_CODE => {
                payload.truncate(PAIR_SIZE);
                Response::ok(Some(payload))
            }
            Ok(()) => Response::ok(None),
            Err(e) => {
                tracing::trace!("Request 0x{:08x} from {} failed: {}", code, self.peer_addr, e);
                Response::from_error(&e)
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
