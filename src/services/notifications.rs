//! Notification Client
//!
//! STOMP over a plain WebSocket. After the CONNECTED handshake it subscribes
//! to the assignment broadcast and to the signed-in user's topic, forwarding
//! every MESSAGE as a [`ServiceEvent::Notification`]. Dropped connections are
//! retried with the supervisor's backoff until [`NotificationClient::disconnect`].

use crate::constants::{CONNECT_TIMEOUT_SECS, STOMP_HEART_BEAT_MS};
use crate::domain::Notification;
use crate::error::{Error, Result};
use crate::services::stomp::{Command, Frame};
use crate::services::{
    ConnectionState, Generation, RetryConfig, ServiceEvent, Supervisor, spawn_named_in_tokio,
};
use crossbeam_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep_until, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Default broker endpoint (raw WebSocket transport of the `/ws` endpoint)
pub const DEFAULT_WS_URL: &str = "ws://localhost:9090/ws/websocket";

/// Broadcast topic for task assignments
pub const ASSIGNMENTS_TOPIC: &str = "/topic/asignaciones";

/// Application destination for outbound messages
pub const SEND_DESTINATION: &str = "/app/sendMessage";

const ASSIGNMENTS_SUBSCRIPTION: &str = "sub-0";
const PERSONAL_SUBSCRIPTION: &str = "sub-1";

/// Per-user notification topic
pub fn user_topic(user_id: i64) -> String {
    format!("/topic/user/{user_id}/notifications")
}

/// Map a MESSAGE frame onto a notification, by subscription id first and
/// destination second.
pub fn notification_from_frame(frame: &Frame, user_id: i64) -> Option<Notification> {
    if frame.command != Command::Message {
        return None;
    }
    let subscription = frame.get("subscription");
    let destination = frame.get("destination");

    if subscription == Some(ASSIGNMENTS_SUBSCRIPTION) || destination == Some(ASSIGNMENTS_TOPIC) {
        if frame.body.is_empty() {
            return None;
        }
        return Some(Notification::assignment(&frame.body));
    }
    if subscription == Some(PERSONAL_SUBSCRIPTION)
        || destination == Some(user_topic(user_id).as_str())
    {
        return Some(Notification::personal(&frame.body));
    }
    None
}

/// Host part of a ws:// URL, for the CONNECT `host` header
fn host_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or_default()
        .to_string()
}

enum Outbound {
    Send(String),
    Disconnect,
}

enum SessionEnd {
    /// The client asked to disconnect
    Requested,
    /// The broker or the network closed the socket
    Closed,
}

struct Control {
    commands: mpsc::UnboundedSender<Outbound>,
    task: JoinHandle<()>,
}

pub struct NotificationClient {
    url: Arc<str>,
    supervisor: Arc<Supervisor>,
    tx: Sender<ServiceEvent>,
    control: Mutex<Option<Control>>,
}

impl NotificationClient {
    pub fn new(url: &str, retry: RetryConfig, tx: Sender<ServiceEvent>) -> Self {
        Self {
            url: url.into(),
            supervisor: Arc::new(Supervisor::new("notifications", retry, tx.clone())),
            tx,
            control: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.supervisor.state() == ConnectionState::Connected
    }

    /// Start listening for `user_id`. An existing connection is replaced; the
    /// old loop keeps closing in the background but no longer reports state.
    pub fn connect(&self, user_id: i64) {
        self.disconnect();
        let generation = self.supervisor.begin();

        let (commands, rx) = mpsc::unbounded_channel();
        let url = self.url.clone();
        let tx = self.tx.clone();
        let task = spawn_named_in_tokio("notifications", async move {
            run(url, user_id, generation, tx, rx).await;
        });

        if let Ok(mut control) = self.control.lock() {
            *control = Some(Control { commands, task });
        }
        info!(user_id, url = %self.url, "Notification client started");
    }

    /// Publish `body` to [`SEND_DESTINATION`]. Fails while not connected.
    pub fn send_message(&self, body: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::Connection {
                message: "WebSocket not connected".to_string(),
            });
        }
        let control = self.control.lock().map_err(|_| Error::ChannelSend {
            message: "notification control poisoned".to_string(),
        })?;
        let Some(control) = control.as_ref() else {
            return Err(Error::Connection {
                message: "WebSocket not connected".to_string(),
            });
        };
        control
            .commands
            .send(Outbound::Send(body.to_string()))
            .map_err(|e| Error::ChannelSend {
                message: e.to_string(),
            })
    }

    /// Close the socket gracefully and stop reconnecting.
    pub fn disconnect(&self) {
        let control = self.control.lock().ok().and_then(|mut c| c.take());
        if let Some(control) = control {
            if control.commands.send(Outbound::Disconnect).is_err() {
                control.task.abort();
            }
            info!("Notification client stopped");
        }
    }
}

impl Drop for NotificationClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for NotificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationClient")
            .field("url", &self.url)
            .field("state", &self.supervisor.state())
            .finish()
    }
}

async fn run(
    url: Arc<str>,
    user_id: i64,
    supervisor: Generation,
    tx: Sender<ServiceEvent>,
    mut commands: mpsc::UnboundedReceiver<Outbound>,
) {
    loop {
        supervisor.on_connecting();
        match session(&url, user_id, &supervisor, &tx, &mut commands).await {
            Ok(SessionEnd::Requested) => {
                supervisor.on_disconnected("Closed by client");
                return;
            }
            Ok(SessionEnd::Closed) => supervisor.on_disconnected("Closed by server"),
            Err(e) => supervisor.on_disconnected(&e.to_string()),
        }

        let Some(delay) = supervisor.next_retry_delay() else {
            return;
        };
        let deadline = Instant::now() + delay;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                command = commands.recv() => match command {
                    Some(Outbound::Send(_)) => warn!("Dropping outbound message while reconnecting"),
                    Some(Outbound::Disconnect) | None => {
                        supervisor.on_disconnected("Closed by client");
                        return;
                    }
                },
            }
        }
    }
}

async fn session(
    url: &str,
    user_id: i64,
    supervisor: &Generation,
    tx: &Sender<ServiceEvent>,
    commands: &mut mpsc::UnboundedReceiver<Outbound>,
) -> Result<SessionEnd> {
    let (ws, _) = connect_async(url).await?;
    let (mut write, mut read) = ws.split();

    write
        .send(Message::text(
            Frame::connect(&host_of(url), STOMP_HEART_BEAT_MS).encode(),
        ))
        .await?;

    let handshake = async {
        while let Some(message) = read.next().await {
            let Message::Text(text) = message? else {
                continue;
            };
            for frame in Frame::decode_all(text.as_str())? {
                match frame.command {
                    Command::Connected => return Ok(()),
                    Command::Error => return Err(broker_error(&frame)),
                    _ => {}
                }
            }
        }
        Err(Error::Connection {
            message: "socket closed before CONNECTED".to_string(),
        })
    };
    timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), handshake)
        .await
        .map_err(|_| Error::Timeout {
            message: "STOMP handshake".to_string(),
        })??;

    supervisor.on_connected();

    let personal = user_topic(user_id);
    for frame in [
        Frame::subscribe(ASSIGNMENTS_SUBSCRIPTION, ASSIGNMENTS_TOPIC),
        Frame::subscribe(PERSONAL_SUBSCRIPTION, &personal),
    ] {
        write.send(Message::text(frame.encode())).await?;
    }
    debug!(topics = ?[ASSIGNMENTS_TOPIC, personal.as_str()], "Subscribed");

    let period = Duration::from_millis(STOMP_HEART_BEAT_MS);
    let mut heart_beat = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    for frame in Frame::decode_all(text.as_str())? {
                        if frame.command == Command::Error {
                            return Err(broker_error(&frame));
                        }
                        if let Some(notification) = notification_from_frame(&frame, user_id) {
                            debug!(message = %notification.message, "Notification received");
                            let _ = tx.send(ServiceEvent::Notification(notification));
                        }
                    }
                }
                Some(Ok(Message::Ping(data))) => write.send(Message::Pong(data)).await?,
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            command = commands.recv() => match command {
                Some(Outbound::Send(body)) => {
                    write
                        .send(Message::text(Frame::send(SEND_DESTINATION, &body).encode()))
                        .await?;
                }
                Some(Outbound::Disconnect) | None => {
                    let _ = write
                        .send(Message::text(Frame::disconnect("disconnect").encode()))
                        .await;
                    let _ = write.close().await;
                    return Ok(SessionEnd::Requested);
                }
            },
            _ = heart_beat.tick() => {
                write.send(Message::text("\n")).await?;
            }
        }
    }
}

fn broker_error(frame: &Frame) -> Error {
    let message = frame
        .get("message")
        .map(str::to_string)
        .unwrap_or_else(|| frame.body.clone());
    Error::Stomp { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationSource;

    fn message(subscription: &str, destination: &str, body: &str) -> Frame {
        Frame::new(Command::Message)
            .header("subscription", subscription)
            .header("destination", destination)
            .body(body)
    }

    #[test]
    fn test_user_topic() {
        assert_eq!(user_topic(12), "/topic/user/12/notifications");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("ws://localhost:9090/ws/websocket"), "localhost");
        assert_eq!(host_of("wss://tasks.example.com/ws"), "tasks.example.com");
    }

    #[test]
    fn test_assignment_frames_are_verbatim() {
        let frame = message("sub-0", ASSIGNMENTS_TOPIC, "Tarea 9 asignada");
        let n = notification_from_frame(&frame, 1).expect("notification");
        assert_eq!(n.source, NotificationSource::Assignment);
        assert_eq!(n.message, "Tarea 9 asignada");

        let empty = message("sub-0", ASSIGNMENTS_TOPIC, "");
        assert!(notification_from_frame(&empty, 1).is_none());
    }

    #[test]
    fn test_personal_frames_decode_json() {
        let frame = message("other", &user_topic(5), r#"{"message":"Te asignaron una tarea"}"#);
        let n = notification_from_frame(&frame, 5).expect("notification");
        assert_eq!(n.source, NotificationSource::Personal);
        assert_eq!(n.message, "Te asignaron una tarea");
    }

    #[test]
    fn test_foreign_frames_are_ignored() {
        let frame = message("sub-9", "/topic/other", "x");
        assert!(notification_from_frame(&frame, 5).is_none());
        assert!(notification_from_frame(&Frame::new(Command::Receipt), 5).is_none());
    }

    #[test]
    fn test_send_requires_connection() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let client = NotificationClient::new(DEFAULT_WS_URL, RetryConfig::default(), tx);
        assert!(client.send_message("hola").is_err());
        client.disconnect();
    }

    /// Local broker that answers every CONNECT with CONNECTED and keeps the
    /// socket open until the client leaves.
    async fn local_broker() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                        return;
                    };
                    while let Some(Ok(message)) = ws.next().await {
                        let Message::Text(text) = message else {
                            continue;
                        };
                        let frames = Frame::decode_all(text.as_str()).unwrap_or_default();
                        if frames.iter().any(|f| f.command == Command::Connect) {
                            let reply = Frame::new(Command::Connected).header("version", "1.2");
                            if ws.send(Message::text(reply.encode())).await.is_err() {
                                return;
                            }
                        }
                    }
                });
            }
        });
        format!("ws://{addr}/ws")
    }

    fn connected_flags(rx: &crossbeam_channel::Receiver<ServiceEvent>) -> Vec<bool> {
        rx.try_iter()
            .filter_map(|event| match event {
                ServiceEvent::ConnectionState { connected, .. } => Some(connected),
                _ => None,
            })
            .collect()
    }

    async fn wait_until_connected(rx: &crossbeam_channel::Receiver<ServiceEvent>) -> Vec<bool> {
        let mut flags = Vec::new();
        for _ in 0..250 {
            flags.extend(connected_flags(rx));
            if flags.contains(&true) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        flags
    }

    #[tokio::test]
    async fn test_reconnect_keeps_the_new_connection_live() {
        let url = local_broker().await;
        let (tx, rx) = crossbeam_channel::unbounded();
        let client = NotificationClient::new(&url, RetryConfig::default(), tx);

        client.connect(1);
        assert!(wait_until_connected(&rx).await.contains(&true));

        client.connect(2);
        let mut flags = wait_until_connected(&rx).await;
        assert!(flags.contains(&true), "never reconnected: {flags:?}");

        // Give the replaced loop time to finish closing
        tokio::time::sleep(Duration::from_millis(300)).await;
        flags.extend(connected_flags(&rx));
        assert_eq!(flags.last(), Some(&true), "state overwritten: {flags:?}");
        assert!(client.is_connected());
        assert!(client.send_message("hola").is_ok());

        client.disconnect();
    }
}
