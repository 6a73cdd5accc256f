//! Wire payloads and channel endpoints between host and twin
//!
//! Both directions carry JSON strings over `std::sync::mpsc`: the host never
//! touches twin state, it only sends commands and reads reports.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Mutex;

use crate::errors::BridgeError;
use crate::logger::log_warning;

/// Host → twin
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    GoToLocation { location_id: String },
}

/// Twin → host
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TwinMessage {
    /// Monotonic load progress in [0, 1]
    LoadProgress { progress: f32 },
    Ready,
    Arrived { location_id: String },
    Error { reason: String },
}

fn encode<T: Serialize>(message: &T) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(message)?)
}

fn decode<'a, T: Deserialize<'a>>(payload: &'a str) -> Result<T, BridgeError> {
    Ok(serde_json::from_str(payload)?)
}

/// Creates a connected host/twin endpoint pair
pub fn bridge_channel() -> (HostHandle, TwinEndpoint) {
    let (to_twin, twin_inbound) = mpsc::channel();
    let (twin_outbound, from_twin) = mpsc::channel();

    let host = HostHandle {
        to_twin,
        from_twin,
        observed_progress: 0.0,
        ready: false,
        arrived: None,
        errors: Vec::new(),
        twin_disconnected: false,
    };
    let twin = TwinEndpoint {
        inbound: Mutex::new(twin_inbound),
        outbound: twin_outbound,
    };
    (host, twin)
}

/// Host-application side of the bridge (may live on another thread)
#[derive(Debug)]
pub struct HostHandle {
    to_twin: Sender<String>,
    from_twin: Receiver<String>,
    observed_progress: f32,
    ready: bool,
    arrived: Option<String>,
    errors: Vec<String>,
    twin_disconnected: bool,
}

impl HostHandle {
    /// Fire-and-forget: does not wait for dispatch or arrival
    pub fn request_go_to_location(&self, location_id: impl Into<String>) -> Result<(), BridgeError> {
        let payload = encode(&HostMessage::GoToLocation {
            location_id: location_id.into(),
        })?;
        self.send_raw(payload)
    }

    /// Sends an already-encoded payload (host-side bindings forward strings as-is)
    pub fn send_raw(&self, payload: String) -> Result<(), BridgeError> {
        self.to_twin
            .send(payload)
            .map_err(|_| BridgeError::ChannelClosed)
    }

    /// Drains every pending report without blocking
    pub fn poll(&mut self) -> Vec<TwinMessage> {
        let mut messages = Vec::new();
        loop {
            let payload = match self.from_twin.try_recv() {
                Ok(payload) => payload,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.twin_disconnected = true;
                    break;
                }
            };

            match decode::<TwinMessage>(&payload) {
                Ok(message) => {
                    self.observe(&message);
                    messages.push(message);
                }
                Err(e) => log_warning(&format!("Host: dropping twin payload {:?}: {}", payload, e)),
            }
        }
        messages
    }

    fn observe(&mut self, message: &TwinMessage) {
        match message {
            TwinMessage::LoadProgress { progress } => {
                self.observed_progress = self.observed_progress.max(*progress);
            }
            TwinMessage::Ready => {
                self.ready = true;
                self.observed_progress = 1.0;
            }
            TwinMessage::Arrived { location_id } => self.arrived = Some(location_id.clone()),
            TwinMessage::Error { reason } => self.errors.push(reason.clone()),
        }
    }

    pub fn observed_progress(&self) -> f32 {
        self.observed_progress
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn arrived_at(&self) -> Option<&str> {
        self.arrived.as_deref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// False once the twin side was dropped and every report has been read
    pub fn is_twin_connected(&self) -> bool {
        !self.twin_disconnected
    }
}

/// Twin side of the bridge (owned by `CommandBridge`)
#[derive(Debug)]
pub struct TwinEndpoint {
    inbound: Mutex<Receiver<String>>,
    outbound: Sender<String>,
}

impl TwinEndpoint {
    /// Decoded host commands; malformed payloads are reported per item
    pub(crate) fn drain(&self) -> (Vec<Result<HostMessage, BridgeError>>, bool) {
        let inbound = self
            .inbound
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut decoded = Vec::new();
        let mut disconnected = false;
        loop {
            match inbound.try_recv() {
                Ok(payload) => decoded.push(decode::<HostMessage>(&payload)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        (decoded, disconnected)
    }

    pub(crate) fn send(&self, message: &TwinMessage) -> Result<(), BridgeError> {
        let payload = encode(message)?;
        self.outbound
            .send(payload)
            .map_err(|_| BridgeError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_message_wire_format() {
        let json = encode(&HostMessage::GoToLocation {
            location_id: "Rack_A_Shelf_1".into(),
        })
        .expect("encode");
        assert_eq!(json, r#"{"type":"go_to_location","location_id":"Rack_A_Shelf_1"}"#);
    }

    #[test]
    fn test_twin_message_wire_format() {
        assert_eq!(encode(&TwinMessage::Ready).expect("encode"), r#"{"type":"ready"}"#);

        let decoded: TwinMessage =
            decode(r#"{"type":"error","reason":"location not found: X"}"#).expect("decode");
        assert_eq!(
            decoded,
            TwinMessage::Error {
                reason: "location not found: X".into()
            }
        );
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(matches!(
            decode::<HostMessage>(r#"{"type":"teleport"}"#),
            Err(BridgeError::Malformed(_))
        ));
    }

    #[test]
    fn test_host_observes_reports() {
        let (mut host, twin) = bridge_channel();
        twin.send(&TwinMessage::LoadProgress { progress: 0.4 }).expect("send");
        twin.send(&TwinMessage::Ready).expect("send");
        twin.send(&TwinMessage::Arrived {
            location_id: "Reading_Area".into(),
        })
        .expect("send");

        let messages = host.poll();
        assert_eq!(messages.len(), 3);
        assert!(host.is_ready());
        assert_eq!(host.observed_progress(), 1.0);
        assert_eq!(host.arrived_at(), Some("Reading_Area"));
        assert!(host.poll().is_empty());
    }

    #[test]
    fn test_send_after_twin_dropped() {
        let (mut host, twin) = bridge_channel();
        twin.send(&TwinMessage::Ready).expect("send");
        drop(twin);

        assert!(matches!(
            host.request_go_to_location("Rack_A_Shelf_1"),
            Err(BridgeError::ChannelClosed)
        ));
        // Buffered reports are still delivered
        assert_eq!(host.poll(), vec![TwinMessage::Ready]);
        assert!(!host.is_twin_connected());
    }
}
