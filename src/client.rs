//! TCP client for a running `graph-engine` server.
//!
//! Used by the ingestion pipeline and the query gateway. Implements
//! [`GraphService`], so callers can swap it for an in-process [`GraphEngine`]
//! in tests.
//!
//! [`GraphEngine`]: crate::GraphEngine

use async_trait::async_trait;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::expand::ExpandRequest;
use crate::model::{Edge, GraphFragment, Node};
use crate::service::wire::{self, Request, Response, DEFAULT_MAX_FRAME_BYTES};
use crate::service::{Ack, GraphService, UpsertEdgesRequest, UpsertNodesRequest};
use crate::storage::StoreStats;
use crate::{Error, Result};

/// One connection; calls are serialized over it.
pub struct RemoteGraph {
    stream: Mutex<TcpStream>,
    max_frame_bytes: usize,
}

impl RemoteGraph {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: Mutex::new(stream),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    /// Cap on response frames accepted from the server.
    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    async fn call(&self, request: &Request) -> Result<Response> {
        let payload = wire::encode(request)?;
        let mut stream = self.stream.lock().await;

        wire::write_frame(&mut *stream, &payload).await?;
        let reply = wire::read_frame(&mut *stream, self.max_frame_bytes)
            .await?
            .ok_or_else(|| Error::Protocol("server closed the connection".into()))?;

        wire::decode::<Response>(&reply)?.into_result()
    }

    async fn call_ack(&self, request: &Request) -> Result<Ack> {
        match self.call(request).await? {
            Response::Ack(ack) => Ok(ack),
            other => Err(unexpected(request, &other)),
        }
    }
}

fn unexpected(request: &Request, response: &Response) -> Error {
    Error::Protocol(format!("unexpected response to {}: {response:?}", request.name()))
}

#[async_trait]
impl GraphService for RemoteGraph {
    async fn upsert_nodes(&self, nodes: Vec<Node>) -> Result<Ack> {
        self.call_ack(&Request::UpsertNodes(UpsertNodesRequest { nodes })).await
    }

    async fn upsert_edges(&self, edges: Vec<Edge>) -> Result<Ack> {
        self.call_ack(&Request::UpsertEdges(UpsertEdgesRequest { edges })).await
    }

    async fn expand_time_window(&self, request: ExpandRequest) -> Result<GraphFragment> {
        let request = Request::ExpandTimeWindow(request);
        match self.call(&request).await? {
            Response::Fragment(fragment) => Ok(fragment),
            other => Err(unexpected(&request, &other)),
        }
    }

    async fn stats(&self) -> Result<StoreStats> {
        let request = Request::Stats;
        match self.call(&request).await? {
            Response::Stats(stats) => Ok(stats),
            other => Err(unexpected(&request, &other)),
        }
    }

    async fn ping(&self) -> Result<Ack> {
        self.call_ack(&Request::Ping).await
    }
}
