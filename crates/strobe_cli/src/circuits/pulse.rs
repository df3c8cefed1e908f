//! `Pulse` — a gated 16-bit cycle counter.
//!
//! `count` increments on every clock firing while `io_enable` is high and
//! holds otherwise; `io_count` mirrors it. Reset clears the counter (this
//! circuit's contract). With a large clock divisor it makes coalesced
//! stepping visible: one firing per divisor's worth of global ticks.

use strobe_common::Bits;
use strobe_sim::{CircuitBehavior, EvalContext, SignalDecl, SignalRole};

const IO_ENABLE: usize = 0;
const COUNT: usize = 1;
const IO_COUNT: usize = 2;

fn zero(width: u32) -> Bits {
    Bits::new(width).expect("constant widths are nonzero")
}

/// The gated counter circuit.
pub struct Pulse;

impl CircuitBehavior for Pulse {
    fn kind(&self) -> &'static str {
        "Pulse"
    }

    fn declare_signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::new("io_enable", 1, SignalRole::Input),
            SignalDecl::new("count", 16, SignalRole::Register),
            SignalDecl::new("io_count", 16, SignalRole::Output),
        ]
    }

    fn evaluate_combinational(&self, cx: &mut EvalContext<'_>, _reset: bool) {
        cx.set(IO_COUNT, cx.value(COUNT).clone());
    }

    fn commit_sequential(&self, cx: &mut EvalContext<'_>, reset: bool) {
        if reset {
            cx.set(COUNT, zero(16));
        } else if !cx.value(IO_ENABLE).is_zero() {
            let one = Bits::from_u64(1, 16).expect("constant widths are nonzero");
            cx.set(COUNT, cx.value(COUNT).add(&one, 16));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use strobe_sim::{CircuitInstance, SignalRegistry};

    fn instance(divisor: u64) -> (CircuitInstance, SignalRegistry) {
        let instance = CircuitInstance::new(Rc::new(Pulse), divisor).unwrap();
        let registry = SignalRegistry::build(&instance);
        (instance, registry)
    }

    #[test]
    fn disabled_counter_holds() {
        let (mut inst, registry) = instance(1);
        inst.step(false);
        inst.step(false);
        assert_eq!(registry.peek(&inst, "io_count").unwrap().to_u64(), Some(0));
    }

    #[test]
    fn enabled_counter_counts_firings() {
        let (mut inst, registry) = instance(250);
        let on = Bits::from_u64(1, 1).unwrap();
        registry.poke(&mut inst, "io_enable", &on).unwrap();
        let mut ticks = 0;
        for _ in 0..4 {
            ticks += inst.step(false);
        }
        assert_eq!(ticks, 1000);
        assert_eq!(registry.peek(&inst, "io_count").unwrap().to_u64(), Some(4));
    }

    #[test]
    fn reset_clears_count() {
        let (mut inst, registry) = instance(1);
        let on = Bits::from_u64(1, 1).unwrap();
        registry.poke(&mut inst, "io_enable", &on).unwrap();
        inst.step(false);
        inst.step(false);
        assert_eq!(registry.peek(&inst, "io_count").unwrap().to_u64(), Some(2));
        inst.step(true);
        assert_eq!(registry.peek(&inst, "io_count").unwrap().to_u64(), Some(0));
    }

    #[test]
    fn counter_wraps_at_width() {
        let (mut inst, registry) = instance(1);
        let on = Bits::from_u64(1, 1).unwrap();
        registry.poke(&mut inst, "io_enable", &on).unwrap();
        let max = Bits::from_u64(0xffff, 16).unwrap();
        registry.poke(&mut inst, "count", &max).unwrap();
        inst.step(false);
        assert_eq!(registry.peek(&inst, "io_count").unwrap().to_u64(), Some(0));
    }
}
