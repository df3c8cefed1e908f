//! Interactive line-oriented driver.
//!
//! [`InteractiveDriver`] wires the scheduler, registry, and recorder behind
//! a request/response command loop: one command per input line, one
//! response line per command. When a tee stream is configured, every
//! executed command and its response are echoed there as well, independent
//! of the primary trace — golden-transcript regression tests diff the tee
//! while waveform tests diff the VCD.
//!
//! # Usage
//!
//! ```ignore
//! let mut driver = InteractiveDriver::new(instance);
//! driver.attach_recorder(BufWriter::new(trace_file))?;
//! driver.run_repl(&mut stdin.lock(), &mut stdout.lock())?;
//! driver.finish()?;
//! ```

use std::io::{BufRead, Write};

use strobe_common::Bits;

use crate::circuit::CircuitInstance;
use crate::error::SimError;
use crate::registry::SignalRegistry;
use crate::scheduler::ClockScheduler;
use crate::waveform::VcdRecorder;

/// Waveform recording control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceControl {
    /// Resume frame recording.
    On,
    /// Suspend frame recording.
    Off,
    /// Flush the trace sink.
    Flush,
}

/// A driver command parsed from one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advance the clock by a number of global ticks.
    Step {
        /// Number of ticks to run; the last firing may overshoot.
        count: u64,
    },
    /// Advance the clock with the reset bit asserted.
    Reset {
        /// Number of ticks to run under reset.
        count: u64,
    },
    /// Read one or more named signals.
    Peek {
        /// Signal names to read.
        names: Vec<String>,
    },
    /// Write a named signal.
    Poke {
        /// Signal name to write.
        name: String,
        /// The value to store.
        value: u64,
    },
    /// Reseed the primary instance's fill generator.
    Seed {
        /// The new seed.
        value: u64,
    },
    /// Set the primary instance's clock divisor.
    Clocks {
        /// Global ticks per circuit evaluation.
        divisor: u64,
    },
    /// Checkpoint the primary instance.
    Snapshot,
    /// Roll the primary instance back to the checkpoint.
    Restore,
    /// Control waveform recording.
    Trace(TraceControl),
    /// Show the command summary.
    Help,
    /// Terminate the session.
    Quit,
}

/// Result of executing one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The command produced a response line.
    Response(String),
    /// The session should terminate.
    Quit,
}

/// Parses one command line.
///
/// Recoverable: a malformed line yields an error message for the response
/// channel and the session continues.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some((&cmd, args)) = parts.split_first() else {
        return Err("empty command".to_string());
    };

    match cmd {
        "step" => Ok(Command::Step {
            count: parse_count(args, "step")?,
        }),
        "reset" => Ok(Command::Reset {
            count: parse_count(args, "reset")?,
        }),
        "peek" => {
            if args.is_empty() {
                return Err("peek requires at least one signal name".to_string());
            }
            Ok(Command::Peek {
                names: args.iter().map(|s| s.to_string()).collect(),
            })
        }
        "poke" => {
            let [name, value] = args else {
                return Err("poke requires a signal name and a value".to_string());
            };
            Ok(Command::Poke {
                name: name.to_string(),
                value: parse_value(value)?,
            })
        }
        "seed" => {
            let [value] = args else {
                return Err("seed requires a value".to_string());
            };
            Ok(Command::Seed {
                value: parse_value(value)?,
            })
        }
        "clocks" => {
            let [divisor] = args else {
                return Err("clocks requires a divisor".to_string());
            };
            Ok(Command::Clocks {
                divisor: parse_value(divisor)?,
            })
        }
        "snapshot" => Ok(Command::Snapshot),
        "restore" => Ok(Command::Restore),
        "trace" => match args {
            ["on"] => Ok(Command::Trace(TraceControl::On)),
            ["off"] => Ok(Command::Trace(TraceControl::Off)),
            ["flush"] => Ok(Command::Trace(TraceControl::Flush)),
            _ => Err("trace requires one of: on, off, flush".to_string()),
        },
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        other => Err(format!("unknown command: '{other}'")),
    }
}

/// Parses a cycle count argument; defaults to 1 when omitted.
fn parse_count(args: &[&str], cmd: &str) -> Result<u64, String> {
    match args {
        [] => Ok(1),
        [count] => parse_value(count),
        _ => Err(format!("{cmd} takes at most one count")),
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal value.
fn parse_value(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid value: '{s}'"))
}

/// Formats a peeked value: decimal when it fits a `u64`, hex otherwise.
fn format_value(value: &Bits) -> String {
    match value.to_u64() {
        Some(v) => v.to_string(),
        None => format!("0x{value:x}"),
    }
}

/// The interactive session state.
///
/// `W` is the trace sink, `T` the optional tee transcript sink. The driver
/// holds exactly one primary circuit instance for the session; the caller
/// flushes and closes the sinks on exit via [`InteractiveDriver::finish`].
pub struct InteractiveDriver<W: Write, T: Write> {
    scheduler: ClockScheduler,
    registry: SignalRegistry,
    recorder: Option<VcdRecorder<W>>,
    recording: bool,
    tee: Option<T>,
    snapshot: Option<CircuitInstance>,
}

impl<W: Write, T: Write> InteractiveDriver<W, T> {
    /// Creates a driver around one circuit instance.
    pub fn new(instance: CircuitInstance) -> Self {
        let registry = SignalRegistry::build(&instance);
        let mut scheduler = ClockScheduler::new();
        scheduler.register(instance);
        Self {
            scheduler,
            registry,
            recorder: None,
            recording: false,
            tee: None,
            snapshot: None,
        }
    }

    /// Binds the trace sink, writing the VCD header and the full initial
    /// frame immediately.
    pub fn attach_recorder(&mut self, writer: W) -> Result<(), SimError> {
        let mut recorder = VcdRecorder::new(writer);
        let instance = self.scheduler.primary();
        recorder.write_header(instance.kind(), instance.signals())?;
        self.recorder = Some(recorder);
        self.recording = true;
        Ok(())
    }

    /// Binds the tee transcript sink.
    pub fn attach_tee(&mut self, tee: T) {
        self.tee = Some(tee);
    }

    /// The scheduler driving the session.
    pub fn scheduler(&self) -> &ClockScheduler {
        &self.scheduler
    }

    /// The attached recorder, if any.
    pub fn recorder(&self) -> Option<&VcdRecorder<W>> {
        self.recorder.as_ref()
    }

    /// The attached tee sink, if any.
    pub fn tee(&self) -> Option<&T> {
        self.tee.as_ref()
    }

    /// Advances at least `n_ticks` global ticks, letting the recorder
    /// observe the state after each clock firing. Returns the ticks
    /// consumed; firings are atomic, so the last one may overshoot the
    /// request to its boundary.
    fn run_ticks(&mut self, n_ticks: u64, reset: bool) -> Result<u64, SimError> {
        let mut total = 0;
        while total < n_ticks {
            let consumed = self.scheduler.advance_cycle(reset);
            if consumed == 0 {
                break;
            }
            total += consumed;
            if self.recording {
                if let Some(recorder) = &mut self.recorder {
                    recorder.write_frame(self.scheduler.now(), self.scheduler.primary().signals())?;
                }
            }
        }
        Ok(total)
    }

    /// Executes one command.
    ///
    /// Recoverable failures (unknown names, unfittable values, missing
    /// snapshot) become `error: ...` response lines; trace I/O failures
    /// propagate as `Err`.
    pub fn execute(&mut self, cmd: &Command) -> Result<Outcome, SimError> {
        let response = match cmd {
            Command::Step { count } => self.run_ticks(*count, false)?.to_string(),
            Command::Reset { count } => self.run_ticks(*count, true)?.to_string(),
            Command::Peek { names } => {
                let mut values = Vec::with_capacity(names.len());
                let instance = self.scheduler.primary();
                let mut failure = None;
                for name in names {
                    match self.registry.peek(instance, name) {
                        Ok(value) => values.push(format_value(&value)),
                        Err(err) => {
                            failure = Some(format!("error: {err}"));
                            break;
                        }
                    }
                }
                failure.unwrap_or_else(|| values.join(" "))
            }
            Command::Poke { name, value } => {
                let bits = Bits::from_u64(*value, 64)?;
                match self.registry.poke(self.scheduler.primary_mut(), name, &bits) {
                    Ok(()) => "ok".to_string(),
                    Err(err) => format!("error: {err}"),
                }
            }
            Command::Seed { value } => {
                self.scheduler.primary_mut().initialize(*value);
                "ok".to_string()
            }
            Command::Clocks { divisor } => match self.scheduler.primary_mut().set_divisor(*divisor)
            {
                Ok(()) => "ok".to_string(),
                Err(err) => format!("error: {err}"),
            },
            Command::Snapshot => {
                self.snapshot = Some(self.scheduler.primary().clone());
                "ok".to_string()
            }
            Command::Restore => match &self.snapshot {
                Some(snapshot) => {
                    self.scheduler.primary_mut().copy_signals_from(snapshot)?;
                    "ok".to_string()
                }
                None => format!("error: {}", SimError::NoSnapshot),
            },
            Command::Trace(control) => self.execute_trace(*control)?,
            Command::Help => help_text(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Response(response))
    }

    fn execute_trace(&mut self, control: TraceControl) -> Result<String, SimError> {
        if self.recorder.is_none() {
            return Ok(format!("error: {}", SimError::NoTraceSink));
        }
        match control {
            TraceControl::On => {
                self.recording = true;
                // Catch up on anything that changed while recording was off.
                if let Some(recorder) = &mut self.recorder {
                    recorder.write_frame(self.scheduler.now(), self.scheduler.primary().signals())?;
                }
            }
            TraceControl::Off => self.recording = false,
            TraceControl::Flush => {
                if let Some(recorder) = &mut self.recorder {
                    recorder.flush()?;
                }
            }
        }
        Ok("ok".to_string())
    }

    /// Runs the request/response loop until `quit` or end-of-input.
    ///
    /// Responses go to `output`; when a tee is attached, each executed
    /// command line and its response are echoed there too.
    pub fn run_repl<R: BufRead, O: Write>(
        &mut self,
        input: &mut R,
        output: &mut O,
    ) -> Result<(), SimError> {
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_command(trimmed) {
                Ok(cmd) => match self.execute(&cmd)? {
                    Outcome::Response(response) => self.echo(output, trimmed, &response)?,
                    Outcome::Quit => {
                        self.echo(output, trimmed, "ok")?;
                        break;
                    }
                },
                Err(err) => self.echo(output, trimmed, &format!("error: {err}"))?,
            }
        }
        Ok(())
    }

    /// Writes a response line, mirroring command and response to the tee.
    fn echo<O: Write>(
        &mut self,
        output: &mut O,
        command: &str,
        response: &str,
    ) -> Result<(), SimError> {
        writeln!(output, "{response}")?;
        if let Some(tee) = &mut self.tee {
            writeln!(tee, "{command}")?;
            writeln!(tee, "{response}")?;
        }
        Ok(())
    }

    /// Flushes the trace and tee sinks. Call on every exit path.
    pub fn finish(&mut self) -> Result<(), SimError> {
        if let Some(recorder) = &mut self.recorder {
            recorder.flush()?;
        }
        if let Some(tee) = &mut self.tee {
            tee.flush()?;
        }
        Ok(())
    }
}

/// Returns the command summary.
fn help_text() -> String {
    "\
Commands:
  step [ticks]         Advance the clock; responds with ticks consumed
  reset [ticks]        Advance with the reset bit asserted
  peek <name>...       Read signal values
  poke <name> <value>  Write a signal (decimal or 0x hex)
  seed <value>         Reseed the fill generator
  clocks <divisor>     Set the clock divisor
  snapshot             Checkpoint the circuit state
  restore              Roll back to the checkpoint
  trace on|off|flush   Control waveform recording
  help                 Show this help
  quit                 Exit"
        .to_string()
}
