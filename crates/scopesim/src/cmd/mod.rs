use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod listen;
pub mod run;
pub mod send;
pub mod version;

/// Default path of the pipe the emulator reads commands from.
pub const DEFAULT_CMD_PIPE: &str = "/tmp/scopesim-cmd.pipe";
/// Default path of the pipe the emulator writes responses to.
pub const DEFAULT_RSP_PIPE: &str = "/tmp/scopesim-rsp.pipe";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the device emulator.
    Run(RunArgs),
    /// Encode one command and write it into the emulator's command pipe.
    Send(SendArgs),
    /// Decode and print frames from the emulator's response pipe.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path of the command pipe (created, read by the emulator).
    #[arg(long, default_value = DEFAULT_CMD_PIPE)]
    pub cmd_pipe: PathBuf,
    /// Path of the response pipe (created, written by the emulator).
    #[arg(long, default_value = DEFAULT_RSP_PIPE)]
    pub rsp_pipe: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CommandKind {
    SetZoomLevel,
    SetColorScheme,
    SetAirTemp,
    SetDistance,
    SetAgcMode,
    SetAirPressure,
    SetAirHumidity,
    SetPowderTemp,
    SetWind,
    SetZeroing,
    SetCompassOffset,
    ButtonPress,
    TriggerCmd,
    GetDevStatus,
    GetProfile,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Command to send.
    #[arg(value_enum, required_unless_present = "raw_id")]
    pub kind: Option<CommandKind>,
    /// Field values for the command (e.g. `set-wind 270 12`).
    #[arg(num_args = 0..=2, allow_negative_numbers = true)]
    pub values: Vec<i32>,
    /// Send a bare discriminant instead (exercise the unknown-command path).
    #[arg(long, conflicts_with_all = ["kind", "values"])]
    pub raw_id: Option<u32>,
    /// Path of the emulator's command pipe.
    #[arg(long, default_value = DEFAULT_CMD_PIPE)]
    pub cmd_pipe: PathBuf,
    /// Wait for one frame on the response pipe and print it.
    #[arg(long)]
    pub wait: bool,
    /// Path of the emulator's response pipe (with --wait).
    #[arg(long, default_value = DEFAULT_RSP_PIPE)]
    pub rsp_pipe: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Path of the emulator's response pipe.
    #[arg(long, default_value = DEFAULT_RSP_PIPE)]
    pub rsp_pipe: PathBuf,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
