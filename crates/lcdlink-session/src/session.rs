use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use lcdlink_proto::{Command, DeviceConfig, GLYPH_COUNT, GLYPH_ROWS};
use lcdlink_transport::{Dial, DisplayTarget, TcpDialer};
use tracing::{debug, warn};

use crate::error::{Result, SessionError};
use crate::keys::{key_queue, KeyConsumer};
use crate::shared::{LinkState, Shared};
use crate::supervisor::Supervisor;

/// Human-readable driver identification.
pub const DRIVER_NAME: &str = "lcdlink TCP display driver";

/// How to write a display target string.
pub const USAGE_TEXT: &str = "IP address like 192.168.1.134:2400";

/// Conventional default target for these displays.
pub const DEFAULT_TARGET: &str = "192.168.1.134:2400";

/// Timing knobs for a display session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bound on one TCP connect attempt.
    pub connect_timeout: Duration,
    /// Inbound poll interval while connected. Also bounds how quickly
    /// the supervisor notices a stop request.
    pub poll_interval: Duration,
    /// Backoff between failed connect attempts.
    pub retry_delay: Duration,
    /// How long shutdown waits for the supervisor to exit before
    /// declaring the thread leaked.
    pub join_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(50),
            retry_delay: Duration::from_secs(2),
            join_timeout: Duration::from_secs(3),
        }
    }
}

/// One networked display.
///
/// Owns the device configuration, the connection supervisor and the
/// keypad queue. Hosts driving several displays hold one session per
/// display. Dropping the session (or calling [`shutdown`]) cancels the
/// supervisor, force-closes the link to unblock any pending wait and
/// joins the thread within a bound.
///
/// [`shutdown`]: DisplaySession::shutdown
pub struct DisplaySession {
    gate: Arc<Mutex<Shared>>,
    keys: KeyConsumer,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl std::fmt::Debug for DisplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySession").finish_non_exhaustive()
    }
}

impl DisplaySession {
    /// Open a session for the display at `target` (`a.b.c.d:port`) with
    /// the given dimensions.
    ///
    /// A malformed target is the only synchronous failure; connecting
    /// happens in the background and is retried forever.
    pub fn open(target: &str, width: u8, height: u8) -> Result<Self> {
        let config = SessionConfig::default();
        let dialer = TcpDialer {
            connect_timeout: config.connect_timeout,
        };
        Self::open_with(target.parse()?, width, height, config, dialer)
    }

    /// Open a session with explicit timings and dialer.
    pub fn open_with(
        target: DisplayTarget,
        width: u8,
        height: u8,
        config: SessionConfig,
        dialer: impl Dial + 'static,
    ) -> Result<Self> {
        let gate = Arc::new(Mutex::new(Shared::new(DeviceConfig::new(width, height))));
        let (producer, consumer) = key_queue();
        let (stop_tx, stop_rx) = mpsc::channel();

        let supervisor = Supervisor {
            target,
            dialer: Box::new(dialer),
            gate: Arc::clone(&gate),
            keys: producer,
            stop_rx,
            poll_interval: config.poll_interval,
            retry_delay: config.retry_delay,
        };
        let worker = std::thread::Builder::new()
            .name("lcdlink-supervisor".into())
            .spawn(move || supervisor.run())
            .map_err(SessionError::Spawn)?;

        Ok(Self {
            gate,
            keys: consumer,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
            join_timeout: config.join_timeout,
        })
    }

    /// Whether the link is currently up.
    pub fn is_connected(&self) -> bool {
        self.gate().state == LinkState::Connected
    }

    /// Snapshot of the device configuration.
    pub fn device_config(&self) -> DeviceConfig {
        self.gate().config.clone()
    }

    /// Move the cursor (1-based; values below 1 are clamped to 1).
    pub fn set_cursor(&self, x: u8, y: u8) {
        let mut shared = self.gate();
        let wire = shared.config.set_cursor(x, y);
        shared.send_frame(Command::SetCursor, &wire);
    }

    /// Write one line of text at the current cursor position, truncated
    /// or space-padded to exactly the display width.
    pub fn write_line(&self, text: &str) {
        let mut shared = self.gate();
        let payload = shared.config.line_payload(text);
        shared.send_frame(Command::WriteData, &payload);
    }

    /// Switch the backlight.
    pub fn set_backlight(&self, on: bool) {
        let mut shared = self.gate();
        shared.config.backlight_on = on;
        shared.send_frame(Command::SetBacklight, &[u8::from(on)]);
    }

    /// Set the contrast level.
    pub fn set_contrast(&self, level: u8) {
        let mut shared = self.gate();
        shared.config.contrast = level;
        shared.send_frame(Command::SetContrast, &[level]);
    }

    /// Set the brightness level.
    pub fn set_brightness(&self, level: u8) {
        let mut shared = self.gate();
        shared.config.brightness = level;
        shared.send_frame(Command::SetBrightness, &[level]);
    }

    /// Program custom glyph `index` (1..=8). Out-of-range indices are
    /// ignored. The glyph is remembered and replayed after reconnects.
    pub fn set_custom_char(&self, index: u8, rows: [u8; GLYPH_ROWS]) {
        if index < 1 || index as usize > GLYPH_COUNT {
            warn!(index, "custom glyph index out of range, ignoring");
            return;
        }
        let slot = (index - 1) as usize;
        let mut shared = self.gate();
        shared.config.glyphs[slot] = rows;
        let payload = shared.config.glyph_payload(slot);
        shared.send_frame(Command::CustomChar, &payload);
    }

    /// Switch a general-purpose output.
    pub fn set_gpo(&self, index: u8, on: bool) {
        self.gate()
            .send_frame(Command::SetGpo, &[index, u8::from(on)]);
    }

    /// Set the fan throttles.
    pub fn set_fan(&self, t1: u8, t2: u8) {
        self.gate().send_frame(Command::SetFan, &[t1, t2]);
    }

    /// Pop the oldest buffered keypad byte, if any. Never blocks.
    pub fn poll_key(&mut self) -> Option<u8> {
        self.keys.pop()
    }

    /// Stop the supervisor and close the link.
    ///
    /// Equivalent to dropping the session, but explicit at call sites
    /// that care about shutdown ordering.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        debug!("shutting down display session");

        // Dropping the sender wakes any retry sleep; closing the link
        // unblocks a pending poll or recv.
        drop(self.stop_tx.take());
        {
            let mut shared = self.gate();
            if let Some(closer) = shared.closer.take() {
                closer.close();
            }
            shared.disconnect();
        }

        let deadline = Instant::now() + self.join_timeout;
        while !worker.is_finished() {
            if Instant::now() >= deadline {
                warn!(
                    timeout = ?self.join_timeout,
                    "supervisor did not exit in time, leaking its thread"
                );
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let _ = worker.join();
    }

    fn gate(&self) -> MutexGuard<'_, Shared> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}
