use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lcdlink_session::DisplaySession;
use tracing::info;

use crate::cmd::WatchKeysArgs;
use crate::exit::{session_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: WatchKeysArgs) -> CliResult<i32> {
    let mut session = DisplaySession::open(&args.target, args.width, args.height)
        .map_err(|err| session_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .map_err(|err| CliError::new(INTERNAL, format!("failed to install ^C handler: {err}")))?;

    info!(display = %args.target, "watching for keypad input, ^C to stop");
    while running.load(Ordering::SeqCst) {
        match session.poll_key() {
            Some(key) => println!("key 0x{key:02X} ({key})"),
            None => std::thread::sleep(Duration::from_millis(20)),
        }
    }

    session.shutdown();
    Ok(SUCCESS)
}
