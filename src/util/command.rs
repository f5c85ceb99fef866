use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::thread;

use tracing::debug;

use crate::error::CommandError;

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

pub fn describe_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs `cmd` to completion. Stderr is always captured for diagnostics;
/// stdout is captured only when `capture_output` is set and otherwise goes
/// to the terminal.
pub fn run_command(cmd: &mut Command, capture_output: bool) -> Result<CommandOutput, CommandError> {
    let command = describe_command(cmd);
    debug!(command = %command, "run");
    cmd.stdin(Stdio::null()).stderr(Stdio::piped());
    if capture_output {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }
    let child = cmd.spawn().map_err(|source| CommandError::Spawn {
        command: command.clone(),
        source,
    })?;
    let output = child.wait_with_output().map_err(|source| CommandError::Spawn {
        command: command.clone(),
        source,
    })?;
    check_output(command, output)
}

/// Describes a command by its program and flags only. Used for commands
/// whose operands may carry secrets.
pub fn describe_redacted(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    for arg in cmd.get_args() {
        let arg = arg.to_string_lossy();
        if arg.starts_with('-') {
            parts.push(arg.to_string());
        } else {
            parts.push("<redacted>".to_string());
        }
    }
    parts.join(" ")
}

/// Runs `producer | consumer` without a shell between them. The producer's
/// stdout is handed straight to the consumer's stdin, so whatever flows
/// through the pipe never shows up in an argument list. The producer keeps
/// the caller's stdin and is only ever described with its operands redacted.
pub fn run_pipeline(
    producer: &mut Command,
    consumer: &mut Command,
) -> Result<CommandOutput, CommandError> {
    let producer_desc = describe_redacted(producer);
    let consumer_desc = describe_command(consumer);
    debug!(producer = %producer_desc, consumer = %consumer_desc, "run pipeline");

    let mut upstream = producer
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CommandError::Spawn {
            command: producer_desc.clone(),
            source,
        })?;
    let Some(pipe) = upstream.stdout.take() else {
        let _ = upstream.kill();
        let _ = upstream.wait();
        return Err(CommandError::Spawn {
            command: producer_desc,
            source: std::io::Error::other("stdout was not captured"),
        });
    };

    let downstream = consumer
        .stdin(Stdio::from(pipe))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    // The consumer now owns the read end; the copy held by `consumer` must
    // go, or the producer never sees a closed pipe.
    consumer.stdin(Stdio::null());
    let downstream = match downstream {
        Ok(child) => child,
        Err(source) => {
            let _ = upstream.kill();
            let _ = upstream.wait();
            return Err(CommandError::Spawn {
                command: consumer_desc,
                source,
            });
        }
    };

    let producer_stderr = upstream.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        })
    });

    let consumer_output = downstream.wait_with_output();
    let producer_status = upstream.wait();
    let producer_stderr = producer_stderr
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();

    let producer_status = producer_status.map_err(|source| CommandError::Spawn {
        command: producer_desc.clone(),
        source,
    })?;
    let consumer_output = consumer_output.map_err(|source| CommandError::Spawn {
        command: consumer_desc.clone(),
        source,
    })?;
    // A producer cut off by a consumer that finished reading is not a failure.
    let cut_off = consumer_output.status.success() && ended_by_broken_pipe(producer_status);
    if !producer_status.success() && !cut_off {
        return Err(CommandError::Failed {
            command: producer_desc,
            code: producer_status.code().unwrap_or(1),
            stderr: producer_stderr,
        });
    }

    check_output(consumer_desc, consumer_output)
}

fn ended_by_broken_pipe(status: ExitStatus) -> bool {
    const SIGPIPE: i32 = 13;
    status.signal() == Some(SIGPIPE) || status.code() == Some(128 + SIGPIPE)
}

fn check_output(command: String, output: Output) -> Result<CommandOutput, CommandError> {
    let code = output.status.code().unwrap_or(1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !output.status.success() {
        return Err(CommandError::Failed {
            command,
            code,
            stderr,
        });
    }
    Ok(CommandOutput {
        stdout,
        stderr,
        code,
    })
}
