//! Wire protocol.
//!
//! ```text
//! Request:  [4-byte length BE] [JSON payload]
//! Response: [4-byte length BE] [JSON payload]
//! ```
//!
//! Requests are tagged by `"op"`, responses by `"status"`:
//!
//! ```text
//! {"op":"expand_time_window","seed_ids":["ent:TATA"],"window":{"start_ms":0,"end_ms":150},"max_hops":2}
//! {"status":"fragment","nodes":[...],"edges":[...]}
//! {"status":"error","code":"INVALID_ARGUMENT","message":"..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::expand::ExpandRequest;
use crate::model::GraphFragment;
use crate::storage::StoreStats;
use crate::{Error, Result};
use super::{Ack, UpsertEdgesRequest, UpsertNodesRequest};

/// Default cap on a single frame's payload.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    UpsertNodes(UpsertNodesRequest),
    UpsertEdges(UpsertEdgesRequest),
    ExpandTimeWindow(ExpandRequest),
    Stats,
    Ping,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::UpsertNodes(_) => "upsert_nodes",
            Request::UpsertEdges(_) => "upsert_edges",
            Request::ExpandTimeWindow(_) => "expand_time_window",
            Request::Stats => "stats",
            Request::Ping => "ping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ack(Ack),
    Fragment(GraphFragment),
    Stats(StoreStats),
    Error { code: String, message: String },
}

impl Response {
    pub fn error(err: &Error) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.detail(),
        }
    }

    /// Turn an error response back into an [`Error`].
    pub fn into_result(self) -> Result<Response> {
        match self {
            Response::Error { code, message } => Err(Error::from_code(&code, message)),
            other => Ok(other),
        }
    }
}

impl From<Result<Response>> for Response {
    fn from(result: Result<Response>) -> Self {
        result.unwrap_or_else(|e| Response::error(&e))
    }
}

// ============================================================================
// Payload codec
// ============================================================================

pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

pub fn decode<'a, T: Deserialize<'a>>(payload: &'a [u8]) -> Result<T> {
    Ok(serde_json::from_slice(payload)?)
}

// ============================================================================
// Framing
// ============================================================================

#[cfg(feature = "server")]
pub use framing::{read_frame, write_frame};

#[cfg(feature = "server")]
mod framing {
    use bytes::{BufMut, BytesMut};
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

    use crate::{Error, Result};

    /// Read one frame. `Ok(None)` on a clean end of stream between frames; a
    /// stream that stops partway through the header is a protocol error.
    pub async fn read_frame<R>(reader: &mut R, max_bytes: usize) -> Result<Option<Vec<u8>>>
    where
        R: AsyncRead + Unpin,
    {
        let mut len_buf = [0u8; 4];
        if reader.read(&mut len_buf[..1]).await? == 0 {
            return Ok(None);
        }
        match reader.read_exact(&mut len_buf[1..]).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(Error::Protocol("stream ended inside a frame header".into()));
            }
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > max_bytes {
            return Err(Error::Protocol(format!(
                "frame of {len} bytes exceeds limit of {max_bytes}"
            )));
        }

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await?;
        Ok(Some(payload))
    }

    pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let len = u32::try_from(payload.len())
            .map_err(|_| Error::Protocol(format!("payload of {} bytes is too large", payload.len())))?;

        let mut frame = BytesMut::with_capacity(4 + payload.len());
        frame.put_u32(len);
        frame.put_slice(payload);

        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
