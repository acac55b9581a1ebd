//! Simulated lights for channel integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use yeelight_channel::{BoxedStream, Connector, Endpoint, LineError};

pub const PUSH_FRAME: &str = r#"{"method":"props","params":{"power":"off"}}"#;

/// How a simulated light answers each request on one connection
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Reply `["ok"]` echoing the request id
    Ack,
    /// Send `n` push frames before the reply
    PushesThenAck(u32),
    /// Reply, then push once the channel is idle
    AckThenIdlePush(Duration),
    /// Reply with the given result array
    Result(Vec<Value>),
    /// Read requests, never answer
    Silent,
    /// Answer with an endless unterminated frame, one byte at a time
    DripFeed(Duration),
    /// Close the socket as soon as a request arrives
    HangUp,
    /// Answer with bytes that are not UTF-8
    Garbage,
    /// Non-UTF-8 bytes followed by the real reply
    GarbageThenAck,
}

/// Counters shared by every connection to one simulated light
#[derive(Debug, Default)]
pub struct LightStats {
    pub dials: AtomicU32,
    pub requests: AtomicU32,
    pub outstanding: AtomicU32,
    pub max_outstanding: AtomicU32,
}

impl LightStats {
    pub fn dials(&self) -> u32 {
        self.dials.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn max_outstanding(&self) -> u32 {
        self.max_outstanding.load(Ordering::SeqCst)
    }
}

/// Serve one connection according to `behavior`
///
/// Requests are read on a separate task so a client that pipelined a second
/// request before the first reply would show up in `max_outstanding`.
pub async fn serve_light<S>(stream: S, behavior: Behavior, stats: Arc<LightStats>)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    let reader_stats = stats.clone();
    let reader_task = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            reader_stats.requests.fetch_add(1, Ordering::SeqCst);
            let outstanding = reader_stats.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
            reader_stats
                .max_outstanding
                .fetch_max(outstanding, Ordering::SeqCst);
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = line_rx.recv().await {
        let request: Value = serde_json::from_str(&line).unwrap_or(Value::Null);
        let id = request["id"].clone();

        let written = match &behavior {
            Behavior::Ack => {
                tokio::time::sleep(Duration::from_millis(2)).await;
                reply(&mut writer, &id, json!(["ok"]), &stats).await
            }
            Behavior::PushesThenAck(n) => {
                let mut ok = true;
                for _ in 0..*n {
                    ok &= write_frame(&mut writer, PUSH_FRAME.as_bytes()).await;
                }
                ok && reply(&mut writer, &id, json!(["ok"]), &stats).await
            }
            Behavior::AckThenIdlePush(delay) => {
                let ok = reply(&mut writer, &id, json!(["ok"]), &stats).await;
                tokio::time::sleep(*delay).await;
                ok && write_frame(&mut writer, PUSH_FRAME.as_bytes()).await
            }
            Behavior::Result(values) => {
                reply(&mut writer, &id, Value::Array(values.clone()), &stats).await
            }
            Behavior::Silent => true,
            Behavior::DripFeed(every) => {
                while writer.write_all(b"{").await.is_ok() {
                    tokio::time::sleep(*every).await;
                }
                false
            }
            Behavior::HangUp => false,
            Behavior::Garbage => write_frame(&mut writer, &[0xff, 0xfe, 0xfd]).await,
            Behavior::GarbageThenAck => {
                write_frame(&mut writer, &[0xff, 0xfe, 0xfd]).await
                    && reply(&mut writer, &id, json!(["ok"]), &stats).await
            }
        };

        if !written {
            break;
        }
    }

    reader_task.abort();
}

async fn reply<W>(writer: &mut W, id: &Value, result: Value, stats: &LightStats) -> bool
where
    W: AsyncWrite + Unpin,
{
    // Count the request as answered before the bytes leave
    stats.outstanding.fetch_sub(1, Ordering::SeqCst);
    let frame = json!({"id": id, "result": result}).to_string();
    write_frame(writer, frame.as_bytes()).await
}

async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> bool
where
    W: AsyncWrite + Unpin,
{
    let mut line = frame.to_vec();
    line.extend_from_slice(b"\r\n");
    writer.write_all(&line).await.is_ok() && writer.flush().await.is_ok()
}

/// Connector backed by in-memory streams
///
/// The first `fail_dials` dials fail. Successful dial `n` is served with
/// `script[n]`, the last entry repeating.
pub struct ScriptedConnector {
    fail_dials: u32,
    script: Vec<Behavior>,
    connections: AtomicU32,
    pub stats: Arc<LightStats>,
}

impl ScriptedConnector {
    pub fn new(script: Vec<Behavior>) -> Arc<Self> {
        Self::failing_first(0, script)
    }

    pub fn failing_first(fail_dials: u32, script: Vec<Behavior>) -> Arc<Self> {
        assert!(!script.is_empty(), "script needs at least one behavior");
        Arc::new(Self {
            fail_dials,
            script,
            connections: AtomicU32::new(0),
            stats: Arc::new(LightStats::default()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Self::failing_first(u32::MAX, vec![Behavior::Ack])
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _timeout: Duration,
    ) -> Result<BoxedStream, LineError> {
        let dial = self.stats.dials.fetch_add(1, Ordering::SeqCst) + 1;
        if dial <= self.fail_dials {
            return Err(LineError::Dial("connection refused".to_string()));
        }

        let n = self.connections.fetch_add(1, Ordering::SeqCst) as usize;
        let behavior = self.script[n.min(self.script.len() - 1)].clone();

        let (client, server) = tokio::io::duplex(4096);
        tokio::spawn(serve_light(server, behavior, self.stats.clone()));
        Ok(Box::new(client))
    }
}

/// A simulated light listening on a real TCP port
pub async fn spawn_tcp_light(behavior: Behavior) -> (Endpoint, Arc<LightStats>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let port = listener.local_addr().expect("local addr").port();
    let stats = Arc::new(LightStats::default());

    let accept_stats = stats.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            accept_stats.dials.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(serve_light(socket, behavior.clone(), accept_stats.clone()));
        }
    });

    (Endpoint::new("127.0.0.1").with_port(port), stats)
}
