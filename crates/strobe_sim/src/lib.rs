//! Cycle-accurate simulation runtime for generated circuit logic.
//!
//! This crate is the generic engine a compiled circuit plugs into: the
//! circuit contributes its combinational/sequential evaluation through the
//! [`CircuitBehavior`] capability trait, and the runtime supplies signal
//! storage, divisor-driven stepping, checkpointing, waveform capture, and
//! an interactive command loop.
//!
//! # Architecture
//!
//! A [`CircuitInstance`] owns one circuit's signals, clock-divisor state,
//! and fill generator. The [`ClockScheduler`] steps registered instances in
//! registration order, coalescing idle ticks through the divisor counters.
//! The [`VcdRecorder`] observes signal state after each cycle and emits a
//! delta-compressed VCD trace; the [`SignalRegistry`] resolves dotted
//! hierarchical names for peek/poke; the [`InteractiveDriver`] wires it all
//! to a line-oriented request/response loop with optional transcript echo.
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `signal` — Signal records and declarations
//! - `circuit` — The behavior trait and circuit instances
//! - `scheduler` — Divisor-driven stepping across instances
//! - `waveform` — Delta-compressed VCD recording
//! - `registry` — Dotted-name peek/poke access
//! - `interactive` — The command loop

#![warn(missing_docs)]

pub mod circuit;
pub mod error;
pub mod interactive;
pub mod registry;
pub mod scheduler;
pub mod signal;
pub mod waveform;

pub use circuit::{CircuitBehavior, CircuitInstance, EvalContext, FillRng};
pub use error::SimError;
pub use interactive::{parse_command, Command, InteractiveDriver, Outcome, TraceControl};
pub use registry::SignalRegistry;
pub use scheduler::ClockScheduler;
pub use signal::{Signal, SignalDecl, SignalRole};
pub use waveform::VcdRecorder;
