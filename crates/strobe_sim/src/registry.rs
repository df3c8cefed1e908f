//! Name-keyed signal access for peek and poke.
//!
//! [`SignalRegistry::build`] walks an instance's declared signals and
//! registers an O(1) slot per signal under its dotted hierarchical name
//! `<Kind>.<localName>` — the same names a waveform header implies through
//! its scope and variable declarations. Slots hold a declaration index and
//! width, independent of physical layout, so a registry built for one
//! instance works for any same-kind instance.

use std::collections::HashMap;

use strobe_common::Bits;

use crate::circuit::CircuitInstance;
use crate::error::SimError;

/// An O(1) accessor bound to one declared signal.
struct SignalSlot {
    index: usize,
    width: u32,
}

/// Dotted-name lookup table over a circuit kind's signals.
pub struct SignalRegistry {
    kind: &'static str,
    slots: HashMap<String, SignalSlot>,
}

impl SignalRegistry {
    /// Builds the mapping from an instance's declared signals.
    pub fn build(instance: &CircuitInstance) -> Self {
        let kind = instance.kind();
        let mut slots = HashMap::new();
        for (index, signal) in instance.signals().iter().enumerate() {
            slots.insert(
                format!("{kind}.{}", signal.name),
                SignalSlot {
                    index,
                    width: signal.width,
                },
            );
        }
        Self { kind, slots }
    }

    /// Resolves a dotted name, falling back to the kind-qualified form for
    /// bare local names.
    fn resolve(&self, name: &str) -> Option<&SignalSlot> {
        self.slots
            .get(name)
            .or_else(|| self.slots.get(&format!("{}.{name}", self.kind)))
    }

    /// Returns true if `name` resolves to a registered signal.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Reads the current value of a named signal.
    ///
    /// Fails with [`SimError::UnknownSignal`] for unregistered names.
    pub fn peek(&self, instance: &CircuitInstance, name: &str) -> Result<Bits, SimError> {
        debug_assert_eq!(instance.kind(), self.kind, "registry bound to one kind");
        let slot = self.resolve(name).ok_or_else(|| SimError::UnknownSignal {
            name: name.to_string(),
        })?;
        Ok(instance.signals()[slot.index].value.clone())
    }

    /// Writes a value to a named signal.
    ///
    /// Fails with [`SimError::UnknownSignal`] for unregistered names and
    /// with [`SimError::WidthMismatch`] when the value has significant bits
    /// beyond the signal's declared width. An accepted value is stored
    /// truncated to the declared width.
    pub fn poke(
        &self,
        instance: &mut CircuitInstance,
        name: &str,
        value: &Bits,
    ) -> Result<(), SimError> {
        debug_assert_eq!(instance.kind(), self.kind, "registry bound to one kind");
        let slot = self.resolve(name).ok_or_else(|| SimError::UnknownSignal {
            name: name.to_string(),
        })?;
        if !value.fits_width(slot.width) {
            return Err(SimError::WidthMismatch {
                name: name.to_string(),
                width: slot.width,
            });
        }
        instance.signals_mut()[slot.index].value = value.truncate(slot.width);
        Ok(())
    }
}
