use std::time::{Duration, Instant};

use lcdlink_session::DisplaySession;

use crate::cmd::WriteArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS, TIMEOUT};

pub fn run(args: WriteArgs) -> CliResult<i32> {
    let session = DisplaySession::open(&args.target, args.width, args.height)
        .map_err(|err| session_error("open failed", err))?;

    wait_connected(&session, args.timeout)?;

    if let Some(on) = args.backlight {
        session.set_backlight(on);
    }
    if let Some(level) = args.contrast {
        session.set_contrast(level);
    }
    if let Some(level) = args.brightness {
        session.set_brightness(level);
    }
    session.set_cursor(1, args.line);
    session.write_line(&args.text);
    session.shutdown();

    Ok(SUCCESS)
}

fn wait_connected(session: &DisplaySession, timeout: Duration) -> CliResult<()> {
    let deadline = Instant::now() + timeout;
    while !session.is_connected() {
        if Instant::now() >= deadline {
            return Err(CliError::new(
                TIMEOUT,
                format!("display did not come up within {timeout:?}"),
            ));
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    Ok(())
}
