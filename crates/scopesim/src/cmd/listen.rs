use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use scopesim_frame::{cobs, FrameReader};
use scopesim_proto::Response;

use crate::cmd::ListenArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let pipe =
        std::fs::File::open(&args.rsp_pipe).map_err(|err| io_error("response pipe open", err))?;
    let mut reader = FrameReader::new(pipe);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "skipped frame");
                continue;
            }
            Err(scopesim_frame::FrameError::ChannelClosed) => break,
            Err(err) => return Err(frame_error("frame read", err)),
        };

        let payload = match cobs::decode(&frame[..frame.len() - 1]) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "skipped frame: bad stuffing");
                continue;
            }
        };

        let response = match Response::decode(&payload) {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "skipped frame: undecodable response");
                continue;
            }
        };

        print_response(&response, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
