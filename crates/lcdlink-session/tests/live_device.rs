//! End-to-end exercise against a scripted device on a localhost TCP
//! socket: connect, replay, keypad traffic, forced reconnect, second
//! replay, shutdown.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use lcdlink_proto::{decode_frame, Command, Frame};
use lcdlink_session::{DisplaySession, SessionConfig};
use lcdlink_transport::{DisplayTarget, TcpDialer};

fn read_frames(stream: &mut TcpStream, buf: &mut BytesMut, count: usize) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut chunk = [0u8; 256];
    while frames.len() < count {
        while let Some(frame) = decode_frame(buf).expect("device received a malformed frame") {
            frames.push(frame);
            if frames.len() == count {
                return frames;
            }
        }
        let n = stream.read(&mut chunk).expect("device read failed");
        assert!(n > 0, "driver hung up before sending {count} frames");
        buf.extend_from_slice(&chunk[..n]);
    }
    frames
}

fn wait_for(what: &str, mut predicate: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !predicate() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn session_against_scripted_tcp_device() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (report_tx, report_rx) = mpsc::channel();

    let device = std::thread::spawn(move || {
        // First connection: replay, then keypad traffic, then one text
        // write from the driver, then the device drops the link.
        let (mut conn, _) = listener.accept().unwrap();
        conn.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        let mut buf = BytesMut::new();

        let replay = read_frames(&mut conn, &mut buf, 9);
        conn.write_all(&[0x11, 0x22, 0x33]).unwrap();
        let write = read_frames(&mut conn, &mut buf, 1);
        drop(conn);

        // Second connection: just the replay.
        let (mut conn, _) = listener.accept().unwrap();
        conn.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        let mut buf = BytesMut::new();
        let second_replay = read_frames(&mut conn, &mut buf, 9);

        report_tx.send((replay, write, second_replay)).unwrap();
        // Hold the connection open until the driver shuts down.
        let mut sink = [0u8; 64];
        while matches!(conn.read(&mut sink), Ok(n) if n > 0) {}
    });

    let target = DisplayTarget {
        ip: Ipv4Addr::LOCALHOST,
        port,
    };
    let config = SessionConfig {
        connect_timeout: Duration::from_secs(1),
        poll_interval: Duration::from_millis(10),
        retry_delay: Duration::from_millis(50),
        join_timeout: Duration::from_secs(3),
    };
    let dialer = TcpDialer {
        connect_timeout: config.connect_timeout,
    };
    let mut session = DisplaySession::open_with(target, 20, 4, config, dialer).unwrap();

    wait_for("first connect", || session.is_connected());

    let mut keys = Vec::new();
    wait_for("keypad bytes", || {
        while let Some(key) = session.poll_key() {
            keys.push(key);
        }
        keys.len() == 3
    });
    assert_eq!(keys, vec![0x11, 0x22, 0x33]);

    session.write_line("HELLO");

    let (replay, write, second_replay) = report_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("device script did not complete");

    assert_eq!(replay[0].command, Command::Init);
    assert_eq!(replay[0].payload.as_ref(), &[20, 4]);
    assert_eq!(replay.len(), 9);
    for (i, frame) in replay[1..].iter().enumerate() {
        assert_eq!(frame.command, Command::CustomChar);
        assert_eq!(frame.payload[0] as usize, i);
    }

    assert_eq!(write[0].command, Command::WriteData);
    assert_eq!(write[0].payload.as_ref(), b"\x14HELLO               ");

    assert_eq!(second_replay.len(), 9);
    assert_eq!(second_replay[0].command, Command::Init);

    wait_for("reconnect", || session.is_connected());
    session.shutdown();
    device.join().unwrap();
}
