//! Signal records and their static declarations.
//!
//! A circuit behavior publishes an ordered list of [`SignalDecl`]s; the
//! instance materializes one [`Signal`] per declaration. Declaration order
//! is the canonical order used everywhere: instance storage, registry
//! slots, and waveform variable declarations all follow it.

use serde::{Deserialize, Serialize};
use strobe_common::Bits;

use crate::error::SimError;

/// The role a signal plays in its circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalRole {
    /// Driven from outside the circuit (poked by the harness).
    Input,
    /// Driven by combinational evaluation for external observation.
    Output,
    /// State committed by the sequential update.
    Register,
    /// Internal combinational value.
    Wire,
}

impl SignalRole {
    /// Short lowercase label for listings.
    pub fn label(self) -> &'static str {
        match self {
            SignalRole::Input => "input",
            SignalRole::Output => "output",
            SignalRole::Register => "register",
            SignalRole::Wire => "wire",
        }
    }
}

/// A static signal declaration emitted by a circuit behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalDecl {
    /// Local name within the circuit, e.g. `io_a_0`.
    pub name: &'static str,
    /// Width in bits (at least 1).
    pub width: u32,
    /// The signal's role.
    pub role: SignalRole,
}

impl SignalDecl {
    /// Convenience constructor.
    pub fn new(name: &'static str, width: u32, role: SignalRole) -> Self {
        Self { name, width, role }
    }
}

/// A live signal: declaration metadata plus the current value.
#[derive(Clone, Debug)]
pub struct Signal {
    /// Local name within the circuit.
    pub name: &'static str,
    /// Width in bits.
    pub width: u32,
    /// The signal's role.
    pub role: SignalRole,
    /// Current value, always truncated to `width`.
    pub value: Bits,
}

impl Signal {
    /// Materializes a declaration with an all-zero value.
    ///
    /// Fails when the declared width cannot represent a value.
    pub fn from_decl(decl: &SignalDecl) -> Result<Self, SimError> {
        Ok(Self {
            name: decl.name,
            width: decl.width,
            role: decl.role,
            value: Bits::new(decl.width)?,
        })
    }
}
