//! Per-light command channel
//!
//! One tokio task owns a light's socket and serves commands strictly one at a
//! time from a request queue. Callers never touch the socket: they send a
//! [`Command`] and await exactly one outcome. Because only the task holds the
//! connection, there is no lock to take, leak or release twice.
//!
//! Each attempt walks the same path:
//!
//! ```text
//! dial (if no socket) -> pace -> write -> read frames -> reply
//!                                            ^    |
//!                                            +----+ push: forward, keep reading
//! ```
//!
//! Write and read run under the [`Watchdog`]. Transport failures close the
//! socket and start the next attempt with a fresh dial until the budget is
//! spent. Push frames never count against the budget.

use std::sync::Arc;

use line_client::{Connection, Connector, DialOutcome, Endpoint, TcpConnector};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, Result};
use crate::frame::{classify, Frame, PushNotification};
use crate::watchdog::{Guarded, Watchdog};

/// A formatted request payload plus the number of attempts it may use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    payload: String,
    max_attempts: u32,
}

impl Command {
    /// Budget for commands that change light state
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// A budget of 0 is raised to 1: every command is tried at least once.
    pub fn new(payload: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            payload: payload.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// A payload must be exactly one frame once the terminator is appended
    fn check_single_line(&self) -> Result<()> {
        if self.payload.contains(['\r', '\n']) {
            return Err(ChannelError::InvalidPayload(
                "payload contains a line break".to_string(),
            ));
        }
        Ok(())
    }
}

/// What it took to get a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    /// The reply frame, without its terminator
    pub reply: String,
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// Dials performed after the first attempt
    pub redials: u32,
    /// Push frames read while waiting for the reply
    pub pushes: u32,
}

enum Request {
    Send {
        command: Command,
        reply: oneshot::Sender<Result<SendReport>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a light's command channel
///
/// Cheap to clone. The channel task exits once every handle is dropped or
/// [`shutdown`](CommandChannel::shutdown) is called.
#[derive(Clone)]
pub struct CommandChannel {
    endpoint: Endpoint,
    requests: mpsc::Sender<Request>,
    pushes: broadcast::Sender<PushNotification>,
}

impl CommandChannel {
    /// Spawn a channel that dials real TCP sockets
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(endpoint: Endpoint, config: ChannelConfig) -> Result<Self> {
        Self::with_connector(endpoint, config, Arc::new(TcpConnector))
    }

    pub fn with_connector(
        endpoint: Endpoint,
        config: ChannelConfig,
        connector: Arc<dyn Connector>,
    ) -> Result<Self> {
        config.validate()?;

        let (request_tx, request_rx) = mpsc::channel(config.request_buffer);
        let (push_tx, _) = broadcast::channel(config.push_buffer);

        let actor = ChannelActor {
            conn: Connection::new(
                endpoint.clone(),
                connector,
                config.connect_timeout,
                config.read_timeout,
            ),
            watchdog: Watchdog::new(config.watchdog_timeout),
            config,
            requests: request_rx,
            pushes: push_tx.clone(),
        };
        tokio::spawn(actor.run());

        Ok(Self {
            endpoint,
            requests: request_tx,
            pushes: push_tx,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Queue `command` and wait for its outcome
    ///
    /// Payloads containing a line break are refused before anything is queued.
    pub async fn send(&self, command: Command) -> Result<SendReport> {
        command.check_single_line()?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(Request::Send {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ChannelError::Closed)?;

        reply_rx.await.map_err(|_| ChannelError::Closed)?
    }

    /// Receive push notifications from this light
    pub fn subscribe_pushes(&self) -> broadcast::Receiver<PushNotification> {
        self.pushes.subscribe()
    }

    /// Stop the channel task after any command already in flight
    pub async fn shutdown(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .requests
            .send(Request::Shutdown { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

impl std::fmt::Debug for CommandChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandChannel")
            .field("endpoint", &self.endpoint)
            .field("closed", &self.requests.is_closed())
            .finish()
    }
}

enum Event {
    Request(Option<Request>),
    Idle(std::result::Result<Vec<u8>, line_client::LineError>),
}

#[derive(Default)]
struct AttemptStats {
    redials: u32,
    pushes: u32,
}

struct ChannelActor {
    conn: Connection,
    watchdog: Watchdog,
    config: ChannelConfig,
    requests: mpsc::Receiver<Request>,
    pushes: broadcast::Sender<PushNotification>,
}

impl ChannelActor {
    async fn run(mut self) {
        info!(light = %self.conn.endpoint(), "Command channel started");

        loop {
            // Keep draining the socket between commands so pushes arrive promptly
            let idle_read = self.conn.is_connected();
            let event = tokio::select! {
                biased;
                request = self.requests.recv() => Event::Request(request),
                frame = self.conn.wait_frame(), if idle_read => Event::Idle(frame),
            };

            match event {
                Event::Request(Some(Request::Send { command, reply })) => {
                    let outcome = self.execute(&command).await;
                    let replied = outcome.is_ok();
                    if reply.send(outcome).is_err() {
                        debug!(light = %self.conn.endpoint(), "Caller dropped before reply");
                    }
                    if replied && !self.config.cooldown.is_zero() {
                        tokio::time::sleep(self.config.cooldown).await;
                    }
                }
                Event::Request(Some(Request::Shutdown { reply })) => {
                    self.conn.close();
                    let _ = reply.send(());
                    break;
                }
                Event::Request(None) => break,
                Event::Idle(Ok(frame)) => self.handle_idle_frame(frame),
                Event::Idle(Err(e)) => {
                    debug!(light = %self.conn.endpoint(), error = %e, "Idle connection dropped");
                }
            }
        }

        self.conn.close();
        info!(light = %self.conn.endpoint(), "Command channel stopped");
    }

    async fn execute(&mut self, command: &Command) -> Result<SendReport> {
        let max_attempts = command.max_attempts();
        let mut stats = AttemptStats::default();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(command, attempt, &mut stats).await {
                Ok(reply) => {
                    return Ok(SendReport {
                        reply,
                        attempts: attempt,
                        redials: stats.redials,
                        pushes: stats.pushes,
                    });
                }
                Err(e) if e.is_transport() && attempt < max_attempts => {
                    debug!(
                        light = %self.conn.endpoint(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                }
                Err(e) if e.is_transport() => {
                    warn!(
                        light = %self.conn.endpoint(),
                        attempts = attempt,
                        error = %e,
                        "Attempt budget exhausted"
                    );
                    return Err(ChannelError::AttemptsExhausted {
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &mut self,
        command: &Command,
        attempt: u32,
        stats: &mut AttemptStats,
    ) -> Result<String> {
        let was_connected = self.conn.is_connected();
        if !was_connected && attempt > 1 {
            stats.redials += 1;
        }

        match self.conn.ensure_connected().await {
            Ok(DialOutcome::Dialed) => {
                debug!(light = %self.conn.endpoint(), attempt, "Connected");
            }
            Ok(DialOutcome::Reused) => {}
            Err(source) => {
                return Err(ChannelError::Dial {
                    endpoint: self.conn.endpoint().clone(),
                    source,
                });
            }
        }

        if !self.config.pacing_delay.is_zero() {
            tokio::time::sleep(self.config.pacing_delay).await;
        }

        let outcome = self
            .watchdog
            .guard(exchange(
                &mut self.conn,
                command.payload(),
                &self.pushes,
                &mut stats.pushes,
            ))
            .await;

        match outcome {
            Guarded::Completed(result) => result,
            Guarded::Expired => {
                warn!(
                    light = %self.conn.endpoint(),
                    deadline = ?self.watchdog.deadline(),
                    "Watchdog expired, force-closing connection"
                );
                self.conn.close();
                Err(ChannelError::Watchdog(self.watchdog.deadline()))
            }
        }
    }

    fn handle_idle_frame(&self, frame: Vec<u8>) {
        match classify(frame) {
            Frame::Push(push) => {
                debug!(light = %self.conn.endpoint(), push = push.raw(), "Push received");
                let _ = self.pushes.send(push);
            }
            Frame::Reply(reply) => {
                debug!(light = %self.conn.endpoint(), reply = %reply, "Discarding unsolicited reply");
            }
            Frame::Malformed(bytes) => {
                debug!(
                    light = %self.conn.endpoint(),
                    len = bytes.len(),
                    "Discarding malformed frame"
                );
            }
        }
    }
}

/// Write one request and read frames until the reply arrives
async fn exchange(
    conn: &mut Connection,
    payload: &str,
    pushes: &broadcast::Sender<PushNotification>,
    pushes_seen: &mut u32,
) -> Result<String> {
    conn.write_line(payload).await.map_err(ChannelError::Write)?;

    loop {
        let frame = conn.read_frame().await.map_err(ChannelError::Read)?;
        match classify(frame) {
            Frame::Push(push) => {
                *pushes_seen += 1;
                debug!(light = %conn.endpoint(), push = push.raw(), "Push received while awaiting reply");
                // No subscribers is fine
                let _ = pushes.send(push);
            }
            Frame::Reply(reply) => return Ok(reply),
            Frame::Malformed(bytes) => {
                // A reply may still follow; it must not reach the next command
                conn.close();
                return Err(ChannelError::MalformedFrame(
                    String::from_utf8_lossy(&bytes).into_owned(),
                ));
            }
        }
    }
}
