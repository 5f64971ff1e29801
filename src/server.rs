//! TCP server for [`GraphEngine`].
//!
//! One tokio task per connection; requests on a connection are answered in
//! order. Store operations are synchronous and CPU-bound, so each runs on the
//! blocking pool where it may wait on the store lock without stalling the
//! runtime.
//!
//! ```text
//! accept ─► connection task ─► read_frame ─► decode ─► dispatch ─► write_frame
//!                                                        │
//!                                             spawn_blocking(store op)
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::expand::CancelToken;
use crate::service::wire::{self, Request, Response};
use crate::service::{Ack, GraphEngine};
use crate::{export, Error, Result};

/// Bind the configured address, replay the bootstrap file if any, and serve
/// until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let engine = GraphEngine::new();

    if let Some(path) = &config.bootstrap {
        let file = std::fs::File::open(path)?;
        let replayed = export::replay_jsonl(engine.store(), std::io::BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            nodes = replayed.nodes,
            edges = replayed.edges,
            "replayed bootstrap stream"
        );
    }

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "graph engine listening");

    serve(listener, engine, config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }).await
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    engine: GraphEngine,
    config: ServerConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let config = Arc::new(config);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let engine = engine.clone();
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, engine, config).await {
                        tracing::warn!(%peer, error = %e, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                tracing::info!(stats = ?engine.store().stats(), "graph engine shutting down");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    engine: GraphEngine,
    config: Arc<ServerConfig>,
) -> Result<()> {
    tracing::debug!(%peer, "client connected");

    loop {
        let payload = match wire::read_frame(&mut stream, config.max_frame_bytes).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(%peer, "client disconnected");
                return Ok(());
            }
            Err(e @ Error::Protocol(_)) => {
                // The rest of the oversized frame is still in the socket, so
                // the stream cannot be resynchronised.
                let reply = wire::encode(&Response::error(&e))?;
                wire::write_frame(&mut stream, &reply).await?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let response = match wire::decode::<Request>(&payload) {
            Ok(request) => dispatch(&engine, config.expand_timeout(), request).await,
            Err(e) => {
                tracing::warn!(%peer, error = %e, "undecodable request");
                Response::error(&e)
            }
        };

        wire::write_frame(&mut stream, &wire::encode(&response)?).await?;
    }
}

/// Execute one request against the engine.
///
/// With `expand_timeout` set, an expansion still running at the deadline is
/// cancelled and answered with `CANCELLED`.
pub async fn dispatch(engine: &GraphEngine, expand_timeout: Option<Duration>, request: Request) -> Response {
    let op = request.name();
    let engine = engine.clone();

    let result = match request {
        Request::UpsertNodes(req) => {
            blocking(move || {
                engine.store().upsert_nodes(req.nodes)?;
                Ok(Response::Ack(Ack::ok()))
            }).await
        }
        Request::UpsertEdges(req) => {
            blocking(move || {
                engine.store().upsert_edges(req.edges)?;
                Ok(Response::Ack(Ack::ok()))
            }).await
        }
        Request::ExpandTimeWindow(req) => {
            let token = CancelToken::new();
            let watchdog = expand_timeout.map(|timeout| {
                let token = token.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    token.cancel();
                })
            });

            let result = blocking(move || engine.expand(&req, Some(&token)).map(Response::Fragment)).await;
            if let Some(watchdog) = watchdog {
                watchdog.abort();
            }
            result
        }
        Request::Stats => Ok(Response::Stats(engine.store().stats())),
        Request::Ping => Ok(Response::Ack(Ack::ok())),
    };

    if let Err(e) = &result {
        tracing::debug!(op, code = e.code(), error = %e, "request rejected");
    }
    result.into()
}

async fn blocking<F>(f: F) -> Result<Response>
where
    F: FnOnce() -> Result<Response> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("worker task failed: {e}")))?
}
