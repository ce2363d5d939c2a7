//! The inbound dispatch loop: frame in, command out, response frame back.

use std::io::{Read, Write};

use tracing::{debug, warn};

use scopesim_frame::{cobs, FrameReader, SharedWriter};
use scopesim_proto::{Command, Response};

use crate::dispatch::dispatch;
use crate::error::Result;
use crate::fixture::Fixtures;

/// Run the dispatch loop until the inbound channel fails.
///
/// Per-frame failures (overflow, corrupt stuffing, undecodable or
/// unencodable records) drop the frame and continue; no response is sent
/// for a frame that never became a command. Only channel-level I/O
/// failures return, and they return the error that ended the loop.
pub fn run_dispatch_loop<R: Read, W: Write>(inbound: R, outbound: &SharedWriter<W>) -> Result<()> {
    let mut reader = FrameReader::new(inbound);
    let mut fixtures = Fixtures::new();

    loop {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "dropped inbound frame");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        handle_frame(&frame, outbound, &mut fixtures)?;
    }
}

/// Decode, dispatch, and answer one delimiter-terminated frame.
///
/// Recoverable codec failures are logged and swallowed; a write failure
/// propagates.
pub fn handle_frame<W: Write, G: rand::Rng>(
    frame: &[u8],
    outbound: &SharedWriter<W>,
    fixtures: &mut Fixtures<G>,
) -> Result<()> {
    let stuffed = match frame {
        [stuffed @ .., 0x00] => stuffed,
        _ => frame, // callers always pass delimiter-terminated frames
    };

    let payload = match cobs::decode(stuffed) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, len = stuffed.len(), "dropped frame: bad stuffing");
            return Ok(());
        }
    };

    let command = match Command::decode(&payload) {
        Ok(command) => command,
        Err(err) => {
            warn!(error = %err, len = payload.len(), "dropped frame: undecodable command");
            return Ok(());
        }
    };

    let response = dispatch(&command, fixtures);
    debug!(
        command = command.name(),
        id = command.id(),
        response = response.name(),
        "dispatched command"
    );

    let encoded = match response.encode() {
        Ok(encoded) => encoded,
        Err(err) => {
            warn!(error = %err, response = response.name(), "send abandoned: unencodable response");
            return Ok(());
        }
    };

    outbound.send(&encoded)?;
    Ok(())
}

/// Build the wire bytes of one command frame (stuffed, delimiter
/// included). The host-side counterpart of the dispatch loop; the `send`
/// CLI subcommand and the tests both drive the emulator with it.
pub fn command_frame(command: &Command) -> Vec<u8> {
    let mut frame = cobs::encode(&command.encode());
    frame.push(0x00);
    frame
}
