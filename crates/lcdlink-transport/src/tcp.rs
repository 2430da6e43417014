use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::target::DisplayTarget;
use crate::traits::{Dial, LinkCloser, LinkPair, LinkRx, LinkTx, Readiness};

/// Default bound on a connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// One handle onto a connected display socket.
///
/// A connection is split into three clones of the underlying stream:
/// the sending half (lives inside the session's command gate), the
/// receiving half (owned by the supervisor) and the closer (callable
/// from any thread to unblock the supervisor).
pub struct TcpLink {
    stream: TcpStream,
}

impl TcpLink {
    /// Connect to a display with a bounded connect attempt.
    pub fn connect(target: DisplayTarget, timeout: Duration) -> Result<Self> {
        let addr = target.socket_addr();
        let stream = TcpStream::connect_timeout(&SocketAddr::V4(addr), timeout)
            .map_err(|e| TransportError::Connect { addr, source: e })?;
        // Frames are a handful of bytes; never batch them.
        stream.set_nodelay(true)?;
        debug!(%target, "connected to display");
        Ok(Self { stream })
    }

    /// Split the connection into its tx/rx/closer handles.
    pub fn into_pair(self) -> Result<LinkPair> {
        let rx = self.stream.try_clone()?;
        let closer = self.stream.try_clone()?;
        Ok(LinkPair {
            tx: Box::new(TcpLink {
                stream: self.stream,
            }),
            rx: Box::new(TcpLink { stream: rx }),
            closer: Box::new(TcpCloser { stream: closer }),
        })
    }
}

impl LinkTx for TcpLink {
    fn send_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < buf.len() {
            match self.stream.write(&buf[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        loop {
            match self.stream.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl LinkRx for TcpLink {
    #[cfg(unix)]
    fn poll_readable(&self, timeout: Duration) -> Result<Readiness> {
        use std::os::fd::AsRawFd;

        let mut fds = libc::pollfd {
            fd: self.stream.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        // SAFETY: `fds` points to one valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if rc > 0 {
            Ok(Readiness::Ready)
        } else if rc == 0 {
            Ok(Readiness::TimedOut)
        } else {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                // The caller re-polls on its next loop iteration.
                Ok(Readiness::TimedOut)
            } else {
                Err(TransportError::Poll(err))
            }
        }
    }

    #[cfg(windows)]
    fn poll_readable(&self, timeout: Duration) -> Result<Readiness> {
        use std::os::windows::io::AsRawSocket;
        use windows_sys::Win32::Networking::WinSock::{WSAPoll, POLLRDNORM, WSAPOLLFD};

        let mut fds = WSAPOLLFD {
            fd: self.stream.as_raw_socket() as usize,
            events: POLLRDNORM,
            revents: 0,
        };
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        // SAFETY: `fds` points to one valid WSAPOLLFD for the duration of the call.
        let rc = unsafe { WSAPoll(&mut fds, 1, timeout_ms) };
        if rc > 0 {
            Ok(Readiness::Ready)
        } else if rc == 0 {
            Ok(Readiness::TimedOut)
        } else {
            Err(TransportError::Poll(std::io::Error::last_os_error()))
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

struct TcpCloser {
    stream: TcpStream,
}

impl LinkCloser for TcpCloser {
    fn close(&self) {
        debug!("closing display link");
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Dials displays over plain TCP.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    pub connect_timeout: Duration,
}

impl Default for TcpDialer {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl Dial for TcpDialer {
    fn dial(&self, target: DisplayTarget) -> Result<LinkPair> {
        TcpLink::connect(target, self.connect_timeout)?.into_pair()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};
    use std::time::Instant;

    use super::*;

    fn local_target(listener: &TcpListener) -> DisplayTarget {
        let port = listener.local_addr().unwrap().port();
        DisplayTarget {
            ip: Ipv4Addr::LOCALHOST,
            port,
        }
    }

    #[test]
    fn connect_send_recv_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = local_target(&listener);

        let link = TcpLink::connect(target, Duration::from_secs(1)).unwrap();
        let (mut server, _) = listener.accept().unwrap();
        let mut pair = link.into_pair().unwrap();

        pair.tx.send_all(b"nw\x03\x01\x14\x04").unwrap();
        let mut buf = [0u8; 6];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"nw\x03\x01\x14\x04");

        server.write_all(&[0x41, 0x42]).unwrap();
        assert_eq!(
            pair.rx.poll_readable(Duration::from_secs(1)).unwrap(),
            Readiness::Ready
        );
        let mut inbound = [0u8; 32];
        let n = pair.rx.recv(&mut inbound).unwrap();
        assert_eq!(&inbound[..n], &[0x41, 0x42]);
    }

    #[test]
    fn poll_times_out_when_idle() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = local_target(&listener);

        let link = TcpLink::connect(target, Duration::from_secs(1)).unwrap();
        let (_server, _) = listener.accept().unwrap();
        let pair = link.into_pair().unwrap();

        let readiness = pair.rx.poll_readable(Duration::from_millis(50)).unwrap();
        assert_eq!(readiness, Readiness::TimedOut);
    }

    #[test]
    fn recv_reports_eof_when_peer_disconnects() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = local_target(&listener);

        let link = TcpLink::connect(target, Duration::from_secs(1)).unwrap();
        let (server, _) = listener.accept().unwrap();
        let mut pair = link.into_pair().unwrap();

        drop(server);
        assert_eq!(
            pair.rx.poll_readable(Duration::from_secs(1)).unwrap(),
            Readiness::Ready
        );
        let mut buf = [0u8; 32];
        assert_eq!(pair.rx.recv(&mut buf).unwrap(), 0);
    }

    #[test]
    fn closer_unblocks_pending_poll() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = local_target(&listener);

        let link = TcpLink::connect(target, Duration::from_secs(1)).unwrap();
        let (_server, _) = listener.accept().unwrap();
        let mut pair = link.into_pair().unwrap();

        let closer = pair.closer;
        let waker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            closer.close();
        });

        let start = Instant::now();
        let readiness = pair.rx.poll_readable(Duration::from_secs(10)).unwrap();
        assert_eq!(readiness, Readiness::Ready);
        assert!(start.elapsed() < Duration::from_secs(5));

        let mut buf = [0u8; 8];
        assert_eq!(pair.rx.recv(&mut buf).unwrap(), 0);
        waker.join().unwrap();
    }

    #[test]
    fn connect_failure_is_reported() {
        // Port 1 on localhost is almost certainly closed.
        let target = DisplayTarget {
            ip: Ipv4Addr::LOCALHOST,
            port: 1,
        };
        let result = TcpLink::connect(target, Duration::from_millis(250));
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }
}
