use std::io::Write;

use tracing::info;

use scopesim_device::command_frame;
use scopesim_frame::{cobs, FrameReader};
use scopesim_proto::{Command, Response};

use crate::cmd::{CommandKind, SendArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let command = build_command(&args)?;
    let frame = command_frame(&command);

    let mut pipe = std::fs::OpenOptions::new()
        .write(true)
        .open(&args.cmd_pipe)
        .map_err(|err| io_error("command pipe open", err))?;
    pipe.write_all(&frame)
        .and_then(|()| pipe.flush())
        .map_err(|err| io_error("command write", err))?;

    info!(
        command = command.name(),
        id = command.id(),
        bytes = frame.len(),
        "command frame sent"
    );

    if args.wait {
        let rsp = std::fs::File::open(&args.rsp_pipe)
            .map_err(|err| io_error("response pipe open", err))?;
        let mut reader = FrameReader::new(rsp);
        let frame = reader
            .read_frame()
            .map_err(|err| frame_error("response read", err))?;
        let payload = cobs::decode(&frame[..frame.len() - 1])
            .map_err(|err| frame_error("response unstuff", err))?;
        let response = Response::decode(&payload)
            .map_err(|err| CliError::new(crate::exit::DATA_INVALID, err.to_string()))?;
        print_response(&response, format);
    }

    Ok(SUCCESS)
}

fn build_command(args: &SendArgs) -> CliResult<Command> {
    if let Some(id) = args.raw_id {
        return Ok(Command::Unknown { id });
    }

    let kind = args
        .kind
        .ok_or_else(|| CliError::new(USAGE, "a command or --raw-id is required"))?;

    let field = |index: usize| -> CliResult<i32> {
        args.values.get(index).copied().ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("{kind:?} requires {} value(s)", expected_values(kind)),
            )
        })
    };

    let command = match kind {
        CommandKind::SetZoomLevel => Command::SetZoomLevel { level: field(0)? },
        CommandKind::SetColorScheme => Command::SetColorScheme { scheme: field(0)? },
        CommandKind::SetAirTemp => Command::SetAirTemp {
            temperature: field(0)?,
        },
        CommandKind::SetDistance => Command::SetDistance {
            distance: field(0)?,
        },
        CommandKind::SetAgcMode => Command::SetAgcMode { mode: field(0)? },
        CommandKind::SetAirPressure => Command::SetAirPressure {
            pressure: field(0)?,
        },
        CommandKind::SetAirHumidity => Command::SetAirHumidity {
            humidity: field(0)?,
        },
        CommandKind::SetPowderTemp => Command::SetPowderTemp {
            temperature: field(0)?,
        },
        CommandKind::SetWind => Command::SetWind {
            direction: field(0)?,
            speed: field(1)?,
        },
        CommandKind::SetZeroing => Command::SetZeroing {
            x: field(0)?,
            y: field(1)?,
        },
        CommandKind::SetCompassOffset => Command::SetCompassOffset { offset: field(0)? },
        CommandKind::ButtonPress => Command::ButtonPress { button: field(0)? },
        CommandKind::TriggerCmd => Command::TriggerCmd { cmd: field(0)? },
        CommandKind::GetDevStatus => Command::GetDevStatus,
        CommandKind::GetProfile => Command::GetProfile,
    };

    if args.values.len() > expected_values(kind) {
        return Err(CliError::new(
            USAGE,
            format!("{kind:?} takes {} value(s)", expected_values(kind)),
        ));
    }

    Ok(command)
}

fn expected_values(kind: CommandKind) -> usize {
    match kind {
        CommandKind::GetDevStatus | CommandKind::GetProfile => 0,
        CommandKind::SetWind | CommandKind::SetZeroing => 2,
        _ => 1,
    }
}
