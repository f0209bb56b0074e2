//! Low-level Redis (RESP2) connection handling
//!
//! Implements the small protocol subset the service needs: `PING`, `SELECT`
//! and `INCR`. Commands are encoded as RESP arrays of bulk strings; replies
//! are parsed into [`RespValue`].

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Connection timeout (5 seconds)
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-command reply timeout (5 seconds)
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Subset of RESP2 reply types the service can receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Option<String>),
}

/// Encodes a command as a RESP array of bulk strings
#[must_use]
pub fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for a in args {
        out.extend_from_slice(format!("${}\r\n", a.len()).as_bytes());
        out.extend_from_slice(a.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// Low-level Redis connection over a buffered TCP stream
pub(super) struct RedisConnection {
    stream: BufReader<TcpStream>,
}

impl RedisConnection {
    pub(super) async fn connect(
        addr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!("Attempting TCP connection to: {}", addr);
        let stream = timeout(CONNECTION_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| format!("Connect timeout to {addr}"))??;
        tracing::trace!("TCP connection established to: {}", addr);
        Ok(Self {
            stream: BufReader::new(stream),
        })
    }

    /// Sends a command and reads a single reply
    pub(super) async fn command(
        &mut self,
        args: &[&str],
    ) -> Result<RespValue, Box<dyn std::error::Error + Send + Sync>> {
        let encoded = encode_command(args);
        self.stream.get_mut().write_all(&encoded).await?;
        timeout(COMMAND_TIMEOUT, self.read_reply())
            .await
            .map_err(|_| format!("Reply timeout for {}", args.first().unwrap_or(&"?")))?
    }

    async fn read_reply(&mut self) -> Result<RespValue, Box<dyn std::error::Error + Send + Sync>> {
        let line = self.read_line().await?;
        let kind = line.chars().next().unwrap_or('?');
        let rest = &line[kind.len_utf8()..];
        match kind {
            '+' => Ok(RespValue::Simple(rest.to_string())),
            '-' => Ok(RespValue::Error(rest.to_string())),
            ':' => Ok(RespValue::Integer(rest.parse::<i64>()?)),
            '$' => {
                let len = rest.parse::<i64>()?;
                if len < 0 {
                    return Ok(RespValue::Bulk(None));
                }
                #[allow(clippy::cast_sign_loss)]
                let mut buf = vec![0u8; len as usize + 2];
                self.stream.read_exact(&mut buf).await?;
                buf.truncate(buf.len() - 2);
                Ok(RespValue::Bulk(Some(String::from_utf8_lossy(&buf).into())))
            }
            other => Err(format!("Unexpected RESP type marker: {other:?}").into()),
        }
    }

    async fn read_line(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut line = String::new();
        let n = self.stream.read_line(&mut line).await?;
        if n == 0 {
            return Err("Connection closed by store".into());
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        if line.is_empty() {
            return Err("Empty RESP line".into());
        }
        Ok(line)
    }
}
