use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lcdlink_transport::{Dial, DisplayTarget, LinkRx, Readiness};
use tracing::{debug, info, warn};

use crate::keys::KeyProducer;
use crate::shared::{LinkState, Shared};

/// Inbound read chunk. Keypad traffic is a trickle of single bytes, so
/// a small stack buffer is plenty.
const RECV_CHUNK: usize = 32;

/// The connection supervisor: a long-lived loop on its own thread that
/// owns the connection lifecycle for one session.
///
/// While disconnected it dials with backoff; on success it replays the
/// device configuration under the gate and hands the sending half to
/// the session. While connected it polls for inbound keypad bytes with
/// a short timeout so a stop request is honoured within roughly one
/// poll interval.
///
/// Stop signalling: the session drops the sender of `stop_rx`. Backoff
/// sleeps run through `recv_timeout` on the same channel, so they wake
/// immediately on shutdown.
pub(crate) struct Supervisor {
    pub target: DisplayTarget,
    pub dialer: Box<dyn Dial>,
    pub gate: Arc<Mutex<Shared>>,
    pub keys: KeyProducer,
    pub stop_rx: Receiver<()>,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
}

impl Supervisor {
    pub fn run(mut self) {
        debug!(display = %self.target, "connection supervisor started");
        while !self.stopping() {
            match self.connect() {
                Some(rx) => self.drain(rx),
                None => {
                    if self.sleep_interrupted(self.retry_delay) {
                        break;
                    }
                }
            }
        }
        self.gate().disconnect();
        debug!("connection supervisor exiting");
    }

    /// One connection attempt. On success the gate is updated and the
    /// configuration replayed before the receiving half is returned.
    fn connect(&mut self) -> Option<Box<dyn LinkRx>> {
        let pair = match self.dialer.dial(self.target) {
            Ok(pair) => pair,
            Err(err) => {
                debug!(%err, display = %self.target, "connect failed, will retry");
                return None;
            }
        };
        if self.stopping() {
            return None;
        }

        let mut shared = self.gate();
        shared.state = LinkState::Connected;
        shared.tx = Some(pair.tx);
        shared.closer = Some(pair.closer);
        shared.replay();
        if shared.state != LinkState::Connected {
            // Replay failed; treat this attempt as a connect failure.
            return None;
        }
        info!(display = %self.target, "connected, configuration restored");
        Some(pair.rx)
    }

    /// Drain inbound keypad bytes until the link dies, a setter marks
    /// the link down, or a stop is requested.
    fn drain(&mut self, mut rx: Box<dyn LinkRx>) {
        loop {
            if self.stopping() {
                return;
            }
            // A setter's failed send flips the state without touching
            // our receiving half.
            if self.gate().state != LinkState::Connected {
                debug!("link marked down, redialing");
                return;
            }

            match rx.poll_readable(self.poll_interval) {
                Ok(Readiness::TimedOut) => {}
                Ok(Readiness::Ready) => {
                    let mut buf = [0u8; RECV_CHUNK];
                    match rx.recv(&mut buf) {
                        Ok(0) => {
                            info!("display closed the connection");
                            self.gate().disconnect();
                            return;
                        }
                        Ok(n) => {
                            for &key in &buf[..n] {
                                if !self.keys.push(key) {
                                    debug!(key, "key queue full, dropping key");
                                }
                            }
                        }
                        Err(err) => {
                            warn!(%err, "receive failed");
                            self.gate().disconnect();
                            return;
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "poll failed");
                    self.gate().disconnect();
                    return;
                }
            }
        }
    }

    /// True once the session has dropped its stop sender.
    fn stopping(&self) -> bool {
        matches!(self.stop_rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Interruptible backoff sleep. Returns `true` if a stop arrived.
    fn sleep_interrupted(&self, duration: Duration) -> bool {
        matches!(
            self.stop_rx.recv_timeout(duration),
            Ok(()) | Err(RecvTimeoutError::Disconnected)
        )
    }

    fn gate(&self) -> MutexGuard<'_, Shared> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
