//! TCP link layer for networked character LCD devices.
//!
//! Provides the transport primitives the connection supervisor builds on:
//! - [`DisplayTarget`]: the `a.b.c.d:port` address of a display
//! - [`Dial`] / [`LinkTx`] / [`LinkRx`] / [`LinkCloser`]: the seam traits
//!   between the supervisor and the wire
//! - [`TcpDialer`]: the real implementation over `std::net::TcpStream`
//!
//! This is the lowest layer of lcdlink. Everything else builds on the
//! link handles produced by [`Dial::dial`].

pub mod error;
pub mod target;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use target::{DisplayTarget, TargetError};
pub use tcp::{TcpDialer, TcpLink};
pub use traits::{Dial, LinkCloser, LinkPair, LinkRx, LinkTx, Readiness};
