//! Unsolicited periodic status frames.

use std::io::Write;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use scopesim_frame::SharedWriter;
use scopesim_proto::Response;

use crate::error::Result;
use crate::fixture::Fixtures;

/// Cadence of unsolicited status frames.
pub const STATUS_PERIOD: Duration = Duration::from_secs(1);

/// Emit status frames on a fixed cadence until the outbound channel fails.
///
/// Fire-and-forget: no acknowledgement is read. Runs independently of the
/// dispatch loop; the two share only the writer's critical section.
pub fn run_status_emitter<W: Write>(outbound: &SharedWriter<W>, period: Duration) -> Result<()> {
    let mut fixtures = Fixtures::new();
    loop {
        std::thread::sleep(period);
        emit_status(outbound, &mut fixtures)?;
    }
}

/// Build and send one unsolicited status frame.
pub fn emit_status<W: Write, R: Rng>(
    outbound: &SharedWriter<W>,
    fixtures: &mut Fixtures<R>,
) -> Result<()> {
    let status = fixtures.charge_status();
    debug!(charge = status.charge, "emitting periodic status frame");

    let encoded = match Response::DevStatus(status).encode() {
        Ok(encoded) => encoded,
        Err(err) => {
            // Unreachable for a fixed-shape snapshot, but an encode failure
            // abandons the send rather than killing the loop.
            tracing::warn!(error = %err, "send abandoned: unencodable status");
            return Ok(());
        }
    };

    outbound.send(&encoded)?;
    Ok(())
}
