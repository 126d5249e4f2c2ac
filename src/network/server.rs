//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};
use parking_lot::Mutex;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Stops a running [`Server`] from another thread
///
/// Besides the flag, the handle tracks a clone of every live connection's
/// socket so that shutdown can wake workers blocked in a read.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    inner: Arc<ShutdownState>,
}

#[derive(Debug, Default)]
struct ShutdownState {
    flag: AtomicBool,
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, TcpStream>>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and return from `run()`
    ///
    /// Every live connection is shut down in both directions; a worker
    /// blocked reading from it sees end-of-stream and moves on.
    pub fn shutdown(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);

        let mut live = self.inner.live.lock();
        for (_, stream) in live.drain() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Track `stream` until the returned guard is dropped
    ///
    /// A stream registered after shutdown is closed straight away.
    fn register(&self, stream: &TcpStream) -> Result<Registration> {
        let clone = stream.try_clone()?;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let mut live = self.inner.live.lock();
        if self.is_shutdown() {
            let _ = clone.shutdown(Shutdown::Both);
        } else {
            live.insert(id, clone);
        }

        Ok(Registration {
            handle: self.clone(),
            id,
        })
    }
}

/// Removes a connection from the live set when it ends
struct Registration {
    handle: ShutdownHandle,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.handle.inner.live.lock().remove(&self.id);
    }
}

/// TCP server for kdict
pub struct Server {
    config: Config,
    dispatcher: Dispatcher,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, dispatcher: Dispatcher) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can notice shutdown
        listener.set_nonblocking(true)?;

        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            dispatcher,
            listener,
            shutdown: ShutdownHandle::default(),
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops this server
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serve connections until shutdown is requested (blocking)
    ///
    /// Once shutdown is seen, no new connections are accepted, open and
    /// queued connections are closed after their current request, and `run`
    /// returns after every worker has exited.
    pub fn run(self) -> Result<()> {
        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_pending_connections);

        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            workers.push(self.spawn_worker(id, rx.clone())?);
        }
        drop(rx);

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", peer, e);
                        continue;
                    }
                    match tx.try_send(stream) {
                        Ok(()) => tracing::trace!("Queued connection from {}", peer),
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Connection backlog full, refusing {}", peer);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::error!("All workers exited, stopping acceptor");
                            break;
                        }
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutting down, waiting for {} workers", workers.len());
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let dispatcher = self.dispatcher.clone();
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;
        let shutdown = self.shutdown.clone();

        let handle = thread::Builder::new()
            .name(format!("kdict-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    if let Err(e) = serve(stream, dispatcher.clone(), &shutdown, read_ms, write_ms) {
                        tracing::debug!("Connection closed with error: {}", e);
                    }
                }
                tracing::trace!("Worker {} exiting", id);
            })?;

        Ok(handle)
    }
}

fn serve(
    stream: TcpStream,
    dispatcher: Dispatcher,
    shutdown: &ShutdownHandle,
    read_ms: u64,
    write_ms: u64,
) -> Result<()> {
    let _registration = shutdown.register(&stream)?;
    let mut connection = Connection::new(stream, dispatcher, shutdown.clone())?;
    connection.set_timeouts(read_ms, write_ms)?;
    connection.handle()
}
