use std::thread;

use tracing::{error, info};

use scopesim_device::{run_dispatch_loop, run_status_emitter, Fifo, STATUS_PERIOD};
use scopesim_frame::{FrameError, SharedWriter};

use crate::cmd::RunArgs;
use crate::exit::{device_error, CliError, CliResult, FAILURE, INTERNAL, SUCCESS};

pub fn run(args: RunArgs) -> CliResult<i32> {
    // Both pipes must exist before either loop starts.
    let cmd_pipe =
        Fifo::create(&args.cmd_pipe).map_err(|err| device_error("command pipe", err))?;
    let rsp_pipe =
        Fifo::create(&args.rsp_pipe).map_err(|err| device_error("response pipe", err))?;

    info!(
        cmd_pipe = %cmd_pipe.path().display(),
        rsp_pipe = %rsp_pipe.path().display(),
        "pipes ready, waiting for host to attach"
    );

    let inbound = cmd_pipe
        .open_reader()
        .map_err(|err| device_error("command pipe open", err))?;
    let outbound = rsp_pipe
        .open_writer()
        .map_err(|err| device_error("response pipe open", err))?;

    info!("host attached, emulator running");

    let writer = SharedWriter::new(outbound);

    let dispatch_writer = writer.clone();
    let dispatch_loop = thread::Builder::new()
        .name("dispatch".to_string())
        .spawn(move || run_dispatch_loop(inbound, &dispatch_writer))
        .map_err(|err| CliError::new(INTERNAL, format!("spawn failed: {err}")))?;

    let emitter_loop = thread::Builder::new()
        .name("emitter".to_string())
        .spawn(move || run_status_emitter(&writer, STATUS_PERIOD))
        .map_err(|err| CliError::new(INTERNAL, format!("spawn failed: {err}")))?;

    // The loops fail independently; a disconnecting host ends the
    // dispatch loop first and the emitter once its next write breaks.
    let mut clean = true;
    for (name, handle) in [("dispatch", dispatch_loop), ("emitter", emitter_loop)] {
        let result = handle
            .join()
            .map_err(|_| CliError::new(INTERNAL, format!("{name} loop panicked")))?;
        if let Err(err) = result {
            if is_host_disconnect(&err) {
                info!(loop_name = name, "host disconnected");
            } else {
                error!(loop_name = name, error = %err, "loop terminated");
                clean = false;
            }
        }
    }

    Ok(if clean { SUCCESS } else { FAILURE })
}

fn is_host_disconnect(err: &scopesim_device::DeviceError) -> bool {
    match err {
        scopesim_device::DeviceError::Frame(FrameError::ChannelClosed) => true,
        scopesim_device::DeviceError::Frame(FrameError::Io(io)) => {
            io.kind() == std::io::ErrorKind::BrokenPipe
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_closed_counts_as_disconnect() {
        let err = scopesim_device::DeviceError::Frame(FrameError::ChannelClosed);
        assert!(is_host_disconnect(&err));
    }

    #[test]
    fn broken_pipe_counts_as_disconnect() {
        let err = scopesim_device::DeviceError::Frame(FrameError::Io(std::io::Error::from(
            std::io::ErrorKind::BrokenPipe,
        )));
        assert!(is_host_disconnect(&err));
    }

    #[test]
    fn other_io_failures_are_not_disconnects() {
        let err = scopesim_device::DeviceError::Frame(FrameError::Io(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        )));
        assert!(!is_host_disconnect(&err));
    }
}
