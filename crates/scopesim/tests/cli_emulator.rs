#![cfg(unix)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use scopesim_device::command_frame;
use scopesim_frame::{cobs, FrameReader};
use scopesim_proto::{Command as DeviceCommand, Response, CODE_SUCCESS};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/scopesim-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_writer(path: &Path, timeout: Duration) -> io::Result<File> {
    let start = Instant::now();
    loop {
        match std::fs::OpenOptions::new().write(true).open(path) {
            Ok(file) => return Ok(file),
            Err(err) => {
                if start.elapsed() >= timeout {
                    return Err(io::Error::other(format!("pipe open timeout: {err}")));
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

fn read_response(reader: &mut FrameReader<File>) -> Response {
    let frame = reader.read_frame().expect("response frame should arrive");
    let payload =
        cobs::decode(&frame[..frame.len() - 1]).expect("response frame should unstuff");
    Response::decode(&payload).expect("response payload should decode")
}

#[test]
fn emulator_answers_commands_and_emits_status() {
    let dir = unique_temp_dir("run");
    let cmd_pipe = dir.join("cmd.pipe");
    let rsp_pipe = dir.join("rsp.pipe");

    let mut child = Command::new(env!("CARGO_BIN_EXE_scopesim"))
        .arg("--log-level")
        .arg("error")
        .arg("run")
        .arg("--cmd-pipe")
        .arg(&cmd_pipe)
        .arg("--rsp-pipe")
        .arg(&rsp_pipe)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run command should start");

    // Attaching opens the command pipe for writing first; the emulator
    // only opens the response pipe for writing after that succeeds.
    let mut host_tx = wait_for_writer(&cmd_pipe, Duration::from_secs(3))
        .expect("host should attach to the command pipe");
    let host_rx = File::open(&rsp_pipe).expect("host should attach to the response pipe");
    let mut reader = FrameReader::new(host_rx);

    host_tx
        .write_all(&command_frame(&DeviceCommand::SetZoomLevel { level: 4 }))
        .expect("command frame should send");

    // The unsolicited status ticker shares the response pipe, so the
    // acknowledgement may arrive interleaved with status frames.
    let mut saw_ack = false;
    let mut saw_status = false;
    for _ in 0..8 {
        match read_response(&mut reader) {
            Response::StatusOk { code } => {
                assert_eq!(code, CODE_SUCCESS);
                saw_ack = true;
            }
            Response::DevStatus(status) => {
                assert!(status.charge <= 100);
                saw_status = true;
            }
            other => panic!("unexpected response: {other:?}"),
        }
        if saw_ack && saw_status {
            break;
        }
    }
    assert!(saw_ack, "zoom command should be acknowledged");
    assert!(saw_status, "status ticker should emit within the read window");

    host_tx
        .write_all(&command_frame(&DeviceCommand::GetProfile))
        .expect("query frame should send");
    let profile = loop {
        match read_response(&mut reader) {
            Response::Profile(profile) => break profile,
            Response::DevStatus(_) => continue,
            other => panic!("unexpected response: {other:?}"),
        }
    };
    assert!(!profile.profile_name.is_empty());

    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn emulator_survives_garbage_on_the_command_pipe() {
    let dir = unique_temp_dir("garbage");
    let cmd_pipe = dir.join("cmd.pipe");
    let rsp_pipe = dir.join("rsp.pipe");

    let mut child = Command::new(env!("CARGO_BIN_EXE_scopesim"))
        .arg("--log-level")
        .arg("error")
        .arg("run")
        .arg("--cmd-pipe")
        .arg(&cmd_pipe)
        .arg("--rsp-pipe")
        .arg(&rsp_pipe)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run command should start");

    let mut host_tx = wait_for_writer(&cmd_pipe, Duration::from_secs(3))
        .expect("host should attach to the command pipe");
    let host_rx = File::open(&rsp_pipe).expect("host should attach to the response pipe");
    let mut reader = FrameReader::new(host_rx);

    // An undelimited junk burst followed by a valid frame; the reader
    // must resynchronize on the junk's trailing delimiter.
    let mut burst = vec![0xABu8; 300];
    burst.push(0x00);
    burst.extend_from_slice(&command_frame(&DeviceCommand::GetDevStatus));
    host_tx.write_all(&burst).expect("burst should send");

    let status = loop {
        match read_response(&mut reader) {
            Response::DevStatus(status) => break status,
            Response::StatusErr { .. } => continue,
            other => panic!("unexpected response: {other:?}"),
        }
    };
    assert!(status.charge <= 100);

    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&dir);
}
