use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

/// Errors produced while parsing a display target string.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The string is empty.
    #[error("display target must not be empty")]
    Empty,

    /// The string is missing the `:port` suffix.
    #[error("display target {0:?} is missing a port (expected a.b.c.d:port)")]
    MissingPort(String),

    /// The address part is not a dotted-quad IPv4 address.
    #[error("invalid IPv4 address in display target {0:?}")]
    InvalidAddress(String),

    /// The port part is not a valid 16-bit port number.
    #[error("invalid port in display target {0:?}")]
    InvalidPort(String),
}

/// Address of a networked display, parsed once from `a.b.c.d:port`.
///
/// Set at session open and read-only for the life of the session; opening
/// a new session is the only way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTarget {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl DisplayTarget {
    /// The target as a connectable socket address.
    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.ip, self.port)
    }
}

impl FromStr for DisplayTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }
        let (addr, port) = s
            .split_once(':')
            .ok_or_else(|| TargetError::MissingPort(s.to_string()))?;
        let ip: Ipv4Addr = addr
            .parse()
            .map_err(|_| TargetError::InvalidAddress(s.to_string()))?;
        let port: u16 = port
            .parse()
            .map_err(|_| TargetError::InvalidPort(s.to_string()))?;
        if port == 0 {
            return Err(TargetError::InvalidPort(s.to_string()));
        }
        Ok(Self { ip, port })
    }
}

impl fmt::Display for DisplayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_quad_with_port() {
        let target: DisplayTarget = "192.168.1.134:2400".parse().unwrap();
        assert_eq!(target.ip, Ipv4Addr::new(192, 168, 1, 134));
        assert_eq!(target.port, 2400);
        assert_eq!(target.to_string(), "192.168.1.134:2400");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let target: DisplayTarget = " 10.0.0.5:2400 ".parse().unwrap();
        assert_eq!(target.ip, Ipv4Addr::new(10, 0, 0, 5));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            "".parse::<DisplayTarget>(),
            Err(TargetError::Empty)
        ));
        assert!(matches!(
            "   ".parse::<DisplayTarget>(),
            Err(TargetError::Empty)
        ));
    }

    #[test]
    fn rejects_missing_port() {
        assert!(matches!(
            "192.168.1.134".parse::<DisplayTarget>(),
            Err(TargetError::MissingPort(_))
        ));
    }

    #[test]
    fn rejects_bad_address() {
        assert!(matches!(
            "localhost:2400".parse::<DisplayTarget>(),
            Err(TargetError::InvalidAddress(_))
        ));
        assert!(matches!(
            "256.0.0.1:2400".parse::<DisplayTarget>(),
            Err(TargetError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rejects_bad_port() {
        assert!(matches!(
            "10.0.0.5:notaport".parse::<DisplayTarget>(),
            Err(TargetError::InvalidPort(_))
        ));
        assert!(matches!(
            "10.0.0.5:0".parse::<DisplayTarget>(),
            Err(TargetError::InvalidPort(_))
        ));
        assert!(matches!(
            "10.0.0.5:99999".parse::<DisplayTarget>(),
            Err(TargetError::InvalidPort(_))
        ));
    }
}
