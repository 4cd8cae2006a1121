//! The service wrapper: one HTTP listener around a caller-supplied handler.

use std::mem;
use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, ServerTimeouts};
use crate::env::{Environment, PORT_KEY};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::lifecycle::ShutdownHandle;

/// Lifecycle of the listener. One-way: Unstarted → Listening → Closed.
enum ServerState {
    Unstarted,
    Listening {
        shutdown: ShutdownHandle,
        task: JoinHandle<()>,
        addr: watch::Receiver<Option<SocketAddr>>,
    },
    Closed,
}

/// Owns one HTTP listener bound to a caller-supplied [`Router`].
///
/// The listen port comes from the resolved environment's `PORT` key. The
/// accept loop runs as a detached task; [`start`] returns immediately and
/// [`kill`] closes the listener abruptly, without draining in-flight
/// requests.
///
/// [`start`]: Server::start
/// [`kill`]: Server::kill
pub struct Server {
    env: Environment,
    config: ServerConfig,
    router: Router,
    timeouts: ServerTimeouts,
    state: ServerState,
}

impl Server {
    /// Create a server around `handler`. Opens no socket and cannot fail.
    pub fn new(env: Environment, handler: Router) -> Self {
        let config = ServerConfig::from_env(&env);
        let timeouts = ServerTimeouts::default();
        let router = Self::build_router(handler, &timeouts);

        Self {
            env,
            config,
            router,
            timeouts,
            state: ServerState::Unstarted,
        }
    }

    /// Wrap the handler with the fixed middleware layers.
    ///
    /// The read timeout wraps the request body at the connection boundary
    /// instead (see [`serve_connection`]), since it changes the body type.
    fn build_router(handler: Router, timeouts: &ServerTimeouts) -> Router {
        handler
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeouts.write))
    }

    /// Launch the accept loop and return without blocking on it.
    ///
    /// The task binds `0.0.0.0:{PORT}`, logs a startup banner with the bound
    /// port and the microseconds elapsed since this call, then accepts
    /// connections until [`kill`]. A bind failure is fatal to the process;
    /// it is not reported through this call.
    ///
    /// # Panics
    ///
    /// Panics when the server was already started.
    ///
    /// [`kill`]: Server::kill
    pub fn start(&mut self) {
        let started_at = Instant::now();

        if !matches!(self.state, ServerState::Unstarted) {
            panic!("start() called on a server that is already started");
        }

        let port = self.env.value(PORT_KEY);
        let (shutdown, signal) = ShutdownHandle::new();
        let (addr_tx, addr_rx) = watch::channel(None);

        let task = tokio::spawn(accept_loop(
            port,
            self.router.clone(),
            self.config.clone(),
            self.timeouts,
            signal,
            addr_tx,
            started_at,
        ));

        self.state = ServerState::Listening {
            shutdown,
            task,
            addr: addr_rx,
        };
    }

    /// Close the listener, releasing the bound port before returning.
    ///
    /// Abrupt: in-flight requests are not drained.
    ///
    /// # Panics
    ///
    /// Panics when the server was never started or is already closed.
    pub async fn kill(&mut self) {
        match mem::replace(&mut self.state, ServerState::Closed) {
            ServerState::Listening { shutdown, task, .. } => {
                shutdown.trigger();
                if let Err(err) = task.await {
                    tracing::error!(error = %err, "accept task failed during shutdown");
                }
            }
            ServerState::Unstarted => panic!("kill() called on a server that was never started"),
            ServerState::Closed => panic!("kill() called on a server that is already closed"),
        }
    }

    /// The resolved environment this server was built from.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// This instance's identity config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Address the accept task has bound, `None` while unstarted, not yet
    /// bound, or closed.
    pub fn bound_addr(&self) -> Option<SocketAddr> {
        match &self.state {
            ServerState::Listening { addr, .. } => *addr.borrow(),
            _ => None,
        }
    }

    /// Wait for the accept task to report its bound address.
    ///
    /// # Panics
    ///
    /// Panics when the server is not started, or when the accept task exits
    /// before binding.
    pub async fn wait_until_listening(&mut self) -> SocketAddr {
        let ServerState::Listening { addr, .. } = &mut self.state else {
            panic!("wait_until_listening() called on a server that is not started");
        };

        loop {
            if let Some(bound) = *addr.borrow() {
                return bound;
            }
            if addr.changed().await.is_err() {
                panic!("accept task exited before binding");
            }
        }
    }
}

/// Bind, announce, and accept until shutdown. Runs as a detached task.
async fn accept_loop(
    port: String,
    router: Router,
    config: ServerConfig,
    timeouts: ServerTimeouts,
    mut signal: ShutdownSignal,
    addr_tx: watch::Sender<Option<SocketAddr>>,
    started_at: Instant,
) {
    let addr: SocketAddr = match format!("0.0.0.0:{port}").parse() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(port = %port, error = %err, "invalid PORT value, cannot derive listen address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(address = %addr, error = %err, "failed to bind listener");
            std::process::exit(1);
        }
    };

    let local = match listener.local_addr() {
        Ok(local) => local,
        Err(err) => {
            tracing::error!(address = %addr, error = %err, "failed to read bound address");
            std::process::exit(1);
        }
    };

    let _ = addr_tx.send(Some(local));

    tracing::info!(
        service = %config.name(),
        id = %config.id(),
        port = local.port(),
        elapsed_us = started_at.elapsed().as_micros() as u64,
        "service listening"
    );

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(serve_connection(stream, peer, router.clone(), timeouts));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "accept failed");
                    }
                }
            }
            _ = signal.triggered() => break,
        }
    }

    tracing::info!(address = %local, "listener closed");
    // Listener drops here, releasing the port.
}

/// Drive one connection with the fixed transport timeouts.
async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer: SocketAddr,
    router: Router,
    timeouts: ServerTimeouts,
) {
    let mut builder = auto::Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read_header)
        .max_buf_size(timeouts.max_header_bytes);
    builder
        .http2()
        .timer(TokioTimer::new())
        .keep_alive_interval(timeouts.idle / 2)
        .keep_alive_timeout(timeouts.idle / 2);

    let svc = ServiceBuilder::new()
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
        .service(router);
    let service = service_fn(move |request: Request<Incoming>| svc.clone().oneshot(request));

    if let Err(err) = builder
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        tracing::debug!(peer_addr = %peer, error = %err, "connection ended with error");
    }
}
