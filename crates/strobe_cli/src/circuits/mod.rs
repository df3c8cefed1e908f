//! Built-in demo circuits.
//!
//! Each module is a generated-artifact-style circuit: a static signal
//! table plus mechanical combinational/sequential hooks behind
//! [`CircuitBehavior`]. The runtime never depends on their internals.

use std::rc::Rc;

use strobe_sim::CircuitBehavior;

pub mod dot8;
pub mod pulse;

pub use dot8::Dot8;
pub use pulse::Pulse;

/// Looks up a circuit by its CLI name.
pub fn by_name(name: &str) -> Option<Rc<dyn CircuitBehavior>> {
    match name {
        "dot8" => Some(Rc::new(Dot8)),
        "pulse" => Some(Rc::new(Pulse)),
        _ => None,
    }
}

/// The available circuit names.
pub fn names() -> &'static [&'static str] {
    &["dot8", "pulse"]
}
