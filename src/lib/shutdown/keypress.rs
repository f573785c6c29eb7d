use std::{io::Read, thread, time::Duration};

use tracing::*;

use super::{Shutdown, Trigger};

pub const QUIT_KEY: u8 = b'q';

const READ_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// Watch `input` for the quit key on a dedicated thread.
///
/// A blocking read can't be interrupted, so the thread is meant to be left
/// detached: it only ends on the quit key, end of input, or on its first read
/// after the shutdown was fired by someone else.
pub fn spawn<R>(input: R, shutdown: Shutdown) -> std::io::Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("KeypressWatcher".into())
        .spawn(move || watch(input, &shutdown))
}

#[instrument(level = "debug", skip_all)]
pub fn watch<R: Read>(mut input: R, shutdown: &Shutdown) {
    debug!("Press '{}' to quit", QUIT_KEY as char);

    let mut byte = [0u8; 1];
    loop {
        if shutdown.is_fired() {
            break;
        }

        match input.read(&mut byte) {
            Ok(0) => {
                debug!("Input closed, keypress watcher stopped");
                break;
            }
            Ok(_) if byte[0] == QUIT_KEY => {
                shutdown.fire(Trigger::Keypress);
                break;
            }
            Ok(_) => continue,
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => {
                error!("Error reading input: {error}");
                thread::sleep(READ_ERROR_PAUSE);
            }
        }
    }
}
