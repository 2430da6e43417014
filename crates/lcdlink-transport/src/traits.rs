use std::time::Duration;

use crate::error::Result;
use crate::target::DisplayTarget;

/// Outcome of a bounded readability poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Inbound data (or EOF) is ready to be read.
    Ready,
    /// The timeout elapsed with nothing to read.
    TimedOut,
}

/// Sending half of a display link.
///
/// Held inside the session's command gate so at most one frame is in
/// flight at a time.
pub trait LinkTx: Send {
    /// Write the whole buffer to the link (blocking).
    fn send_all(&mut self, buf: &[u8]) -> Result<()>;
}

/// Receiving half of a display link. Owned by the connection supervisor.
pub trait LinkRx: Send {
    /// Wait up to `timeout` for inbound data.
    fn poll_readable(&self, timeout: Duration) -> Result<Readiness>;

    /// Read available bytes. `Ok(0)` means the display closed the
    /// connection.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Cross-thread teardown handle for a display link.
///
/// `close` may be called from any thread and unblocks a pending
/// [`LinkRx::poll_readable`] or [`LinkRx::recv`].
pub trait LinkCloser: Send + Sync {
    fn close(&self);
}

/// The three handles onto one established connection.
pub struct LinkPair {
    pub tx: Box<dyn LinkTx>,
    pub rx: Box<dyn LinkRx>,
    pub closer: Box<dyn LinkCloser>,
}

/// Connects to a display target.
///
/// The supervisor only sees this trait; tests substitute a scripted
/// dialer for the real [`crate::TcpDialer`].
pub trait Dial: Send {
    fn dial(&self, target: DisplayTarget) -> Result<LinkPair>;
}
