use bytes::BytesMut;
use lcdlink_proto::{encode_frame, Command, DeviceConfig, GLYPH_COUNT, HEADER_SIZE, MAX_PAYLOAD};
use lcdlink_transport::{LinkCloser, LinkTx};
use tracing::{debug, warn};

/// Connection status as seen through the command gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkState {
    Disconnected,
    Connected,
}

/// Everything the command gate protects: the connection flag, the
/// reusable outbound frame buffer, the device configuration and the
/// sending half of the live link.
///
/// Holding the gate is the only way to touch any of these, which
/// guarantees at most one frame is in flight at a time and that the
/// configuration always reflects the latest caller intent.
pub(crate) struct Shared {
    pub state: LinkState,
    pub config: DeviceConfig,
    pub tx: Option<Box<dyn LinkTx>>,
    pub closer: Option<Box<dyn LinkCloser>>,
    frame_buf: BytesMut,
}

impl Shared {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            state: LinkState::Disconnected,
            config,
            tx: None,
            closer: None,
            frame_buf: BytesMut::with_capacity(HEADER_SIZE + 1 + MAX_PAYLOAD),
        }
    }

    /// Build one frame in the shared buffer and send it.
    ///
    /// A no-op while disconnected, so setters are safe to invoke
    /// unconditionally. On send failure the link is torn down and the
    /// state flips to Disconnected; retrying is the supervisor's job,
    /// never this call's.
    pub fn send_frame(&mut self, command: Command, payload: &[u8]) {
        if self.state != LinkState::Connected {
            return;
        }
        self.frame_buf.clear();
        if let Err(err) = encode_frame(command, payload, &mut self.frame_buf) {
            warn!(%err, ?command, "dropping unencodable frame");
            return;
        }
        let Some(tx) = self.tx.as_mut() else {
            return;
        };
        if let Err(err) = tx.send_all(&self.frame_buf) {
            warn!(%err, ?command, "send failed, marking link down");
            self.disconnect();
        }
    }

    /// Drop both link halves and mark the connection down.
    pub fn disconnect(&mut self) {
        self.state = LinkState::Disconnected;
        self.tx = None;
        self.closer = None;
    }

    /// Replay the device configuration after a reconnect, before any
    /// other traffic: one `Init` frame, then the eight glyph
    /// definitions in index order. The device rejects custom characters
    /// until it has seen `Init`.
    ///
    /// Cursor, backlight, contrast, brightness, GPO and fan state are
    /// not replayed; this minimal-restore policy matches the display
    /// firmware's expectations and is a known limitation.
    pub fn replay(&mut self) {
        debug!("replaying device configuration");
        self.send_frame(Command::Init, &self.config.init_payload());
        for index in 0..GLYPH_COUNT {
            if self.state != LinkState::Connected {
                // A send already failed; the supervisor will retry the
                // whole replay on the next connect.
                return;
            }
            self.send_frame(Command::CustomChar, &self.config.glyph_payload(index));
        }
    }
}
