//! Circuit instances and the generated-logic capability interface.
//!
//! Generated circuit logic plugs into the runtime through the
//! [`CircuitBehavior`] trait: one hook for combinational evaluation and one
//! for the sequential register commit. The runtime depends only on this
//! interface, never on a specific circuit's fields, so any circuit variant
//! can be driven polymorphically.
//!
//! A [`CircuitInstance`] owns the signal storage, the clock-divisor state,
//! and a per-instance fill generator. Stepping is coalesced: a single
//! [`CircuitInstance::step`] consumes every idle tick up to the next firing
//! in O(1), which is the performance-critical path for long runs with large
//! divisors.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strobe_common::Bits;

use crate::error::SimError;
use crate::signal::{Signal, SignalDecl};

/// A seeded generator for filling don't-care state.
///
/// Each instance owns its generator; nothing is shared globally or
/// implicitly. Cloning an instance duplicates the generator state, so a
/// checkpoint replays the same fill stream as its source.
#[derive(Clone, Debug)]
pub struct FillRng {
    rng: StdRng,
}

impl FillRng {
    /// Creates a generator from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a fresh value of the given width.
    pub fn next_bits(&mut self, width: u32) -> Bits {
        let words: Vec<u64> = (0..width.div_ceil(64)).map(|_| self.rng.gen()).collect();
        Bits::from_words(&words, width).expect("signal widths are validated at construction")
    }
}

/// Mutable view of an instance's signals handed to the evaluation hooks.
///
/// Generated code addresses signals by their declaration index.
pub struct EvalContext<'a> {
    signals: &'a mut [Signal],
    rng: &'a mut FillRng,
}

impl<'a> EvalContext<'a> {
    /// Returns the current value of signal `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a declared signal index.
    pub fn value(&self, index: usize) -> &Bits {
        &self.signals[index].value
    }

    /// Replaces the value of signal `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the value width does not match
    /// the declared width; generated code computes at declared widths.
    pub fn set(&mut self, index: usize, value: Bits) {
        let signal = &mut self.signals[index];
        assert_eq!(
            value.width(),
            signal.width,
            "value width mismatch on signal '{}'",
            signal.name
        );
        signal.value = value;
    }

    /// Returns the declared width of signal `index`.
    pub fn width(&self, index: usize) -> u32 {
        self.signals[index].width
    }

    /// Fills signal `index` from the instance's generator.
    pub fn fill_random(&mut self, index: usize) {
        let width = self.signals[index].width;
        self.signals[index].value = self.rng.next_bits(width);
    }
}

/// The capability interface a generated circuit exposes to the runtime.
pub trait CircuitBehavior {
    /// The concrete circuit kind, e.g. `"Dot8"`. Snapshot copies are only
    /// permitted between instances of the same kind.
    fn kind(&self) -> &'static str;

    /// The circuit's signals in canonical declaration order.
    fn declare_signals(&self) -> Vec<SignalDecl>;

    /// Recomputes non-register signals from current values.
    ///
    /// `reset` is an ordinary one-bit input; the runtime attaches no
    /// semantics to it.
    fn evaluate_combinational(&self, cx: &mut EvalContext<'_>, reset: bool);

    /// Commits register values. Runs only when the clock divider fires,
    /// before the combinational update of the same firing.
    fn commit_sequential(&self, cx: &mut EvalContext<'_>, reset: bool);
}

/// One simulated circuit: signal storage, divisor state, fill generator,
/// and the behavior that evaluates it.
#[derive(Clone)]
pub struct CircuitInstance {
    behavior: Rc<dyn CircuitBehavior>,
    kind: &'static str,
    signals: Vec<Signal>,
    divisor: u64,
    counter: u64,
    rng: FillRng,
}

impl std::fmt::Debug for CircuitInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitInstance")
            .field("kind", &self.kind)
            .field("signals", &self.signals)
            .field("divisor", &self.divisor)
            .field("counter", &self.counter)
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}

impl CircuitInstance {
    /// Builds an instance of `behavior` with the given clock divisor.
    ///
    /// The divisor is the number of global ticks per circuit evaluation;
    /// zero fails with [`SimError::ZeroDivisor`].
    pub fn new(behavior: Rc<dyn CircuitBehavior>, divisor: u64) -> Result<Self, SimError> {
        if divisor == 0 {
            return Err(SimError::ZeroDivisor);
        }
        let kind = behavior.kind();
        let signals = behavior
            .declare_signals()
            .iter()
            .map(Signal::from_decl)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            behavior,
            kind,
            signals,
            divisor,
            counter: divisor,
            rng: FillRng::from_seed(0),
        })
    }

    /// Reseeds the per-instance fill generator.
    pub fn initialize(&mut self, seed: u64) {
        self.rng = FillRng::from_seed(seed);
    }

    /// The concrete circuit kind.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The signals in declaration order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub(crate) fn signals_mut(&mut self) -> &mut [Signal] {
        &mut self.signals
    }

    /// The declared clock divisor.
    pub fn divisor(&self) -> u64 {
        self.divisor
    }

    /// Global ticks remaining until the next firing.
    pub fn ticks_until_fire(&self) -> u64 {
        self.counter
    }

    /// Sets a new clock divisor and reloads the live counter from it.
    pub fn set_divisor(&mut self, divisor: u64) -> Result<(), SimError> {
        if divisor == 0 {
            return Err(SimError::ZeroDivisor);
        }
        self.divisor = divisor;
        self.counter = divisor;
        Ok(())
    }

    /// Advances to the next clock firing and returns the global ticks
    /// consumed.
    ///
    /// The remaining divisor-counter ticks are consumed in one jump rather
    /// than iterated, then the sequential commit runs, then the
    /// combinational update, then the counter reloads from the divisor.
    pub fn step(&mut self, reset: bool) -> u64 {
        let consumed = self.counter;
        self.counter = 0;
        let mut cx = EvalContext {
            signals: &mut self.signals,
            rng: &mut self.rng,
        };
        self.behavior.commit_sequential(&mut cx, reset);
        self.behavior.evaluate_combinational(&mut cx, reset);
        self.counter = self.divisor;
        consumed
    }

    /// Copies every signal value plus the divisor state from `other`.
    ///
    /// `other` must be the identical circuit kind; on mismatch the copy
    /// fails with [`SimError::KindMismatch`] before any mutation. The copy
    /// is all-or-nothing — partial copies cannot occur. The fill generator
    /// is not transferred.
    pub fn copy_signals_from(&mut self, other: &CircuitInstance) -> Result<(), SimError> {
        if self.kind != other.kind {
            return Err(SimError::KindMismatch {
                expected: self.kind.to_string(),
                found: other.kind.to_string(),
            });
        }
        debug_assert_eq!(
            self.signals.len(),
            other.signals.len(),
            "same-kind instances share a signal layout"
        );
        for (dst, src) in self.signals.iter_mut().zip(&other.signals) {
            dst.value = src.value.clone();
        }
        self.divisor = other.divisor;
        self.counter = other.counter;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalRole;

    /// Increments `count` on every firing; `io_count` mirrors it.
    struct Counter;

    const CNT_IO_ENABLE: usize = 0;
    const CNT_COUNT: usize = 1;
    const CNT_IO_COUNT: usize = 2;

    impl CircuitBehavior for Counter {
        fn kind(&self) -> &'static str {
            "Counter"
        }

        fn declare_signals(&self) -> Vec<SignalDecl> {
            vec![
                SignalDecl::new("io_enable", 1, SignalRole::Input),
                SignalDecl::new("count", 8, SignalRole::Register),
                SignalDecl::new("io_count", 8, SignalRole::Output),
            ]
        }

        fn evaluate_combinational(&self, cx: &mut EvalContext<'_>, _reset: bool) {
            cx.set(CNT_IO_COUNT, cx.value(CNT_COUNT).clone());
        }

        fn commit_sequential(&self, cx: &mut EvalContext<'_>, reset: bool) {
            if reset {
                cx.set(CNT_COUNT, Bits::new(8).unwrap());
            } else if cx.value(CNT_IO_ENABLE).bit(0).unwrap() {
                let one = Bits::from_u64(1, 8).unwrap();
                cx.set(CNT_COUNT, cx.value(CNT_COUNT).add(&one, 8));
            }
        }
    }

    /// A different kind with the same layout, for mismatch tests.
    struct OtherKind;

    impl CircuitBehavior for OtherKind {
        fn kind(&self) -> &'static str {
            "OtherKind"
        }

        fn declare_signals(&self) -> Vec<SignalDecl> {
            Counter.declare_signals()
        }

        fn evaluate_combinational(&self, _cx: &mut EvalContext<'_>, _reset: bool) {}

        fn commit_sequential(&self, _cx: &mut EvalContext<'_>, _reset: bool) {}
    }

    fn counter_instance(divisor: u64) -> CircuitInstance {
        CircuitInstance::new(Rc::new(Counter), divisor).unwrap()
    }

    fn enable(instance: &mut CircuitInstance) {
        instance.signals_mut()[CNT_IO_ENABLE].value = Bits::from_u64(1, 1).unwrap();
    }

    #[test]
    fn zero_divisor_rejected() {
        assert!(matches!(
            CircuitInstance::new(Rc::new(Counter), 0),
            Err(SimError::ZeroDivisor)
        ));
    }

    #[test]
    fn signals_follow_declaration_order() {
        let inst = counter_instance(1);
        let names: Vec<_> = inst.signals().iter().map(|s| s.name).collect();
        assert_eq!(names, ["io_enable", "count", "io_count"]);
        assert_eq!(inst.kind(), "Counter");
    }

    #[test]
    fn step_runs_sequential_then_combinational() {
        let mut inst = counter_instance(1);
        enable(&mut inst);
        inst.step(false);
        // The commit incremented count; the same firing's combinational
        // update already mirrors it to the output.
        assert_eq!(inst.signals()[CNT_COUNT].value.to_u64(), Some(1));
        assert_eq!(inst.signals()[CNT_IO_COUNT].value.to_u64(), Some(1));
    }

    #[test]
    fn step_coalesces_divisor_ticks() {
        let mut inst = counter_instance(5_000_000);
        enable(&mut inst);
        assert_eq!(inst.ticks_until_fire(), 5_000_000);
        let consumed = inst.step(false);
        assert_eq!(consumed, 5_000_000);
        assert_eq!(inst.signals()[CNT_COUNT].value.to_u64(), Some(1));
        // The counter reloaded; the next firing is another full divisor away.
        assert_eq!(inst.ticks_until_fire(), 5_000_000);
    }

    #[test]
    fn set_divisor_reloads_counter() {
        let mut inst = counter_instance(4);
        inst.set_divisor(7).unwrap();
        assert_eq!(inst.divisor(), 7);
        assert_eq!(inst.ticks_until_fire(), 7);
        assert!(matches!(inst.set_divisor(0), Err(SimError::ZeroDivisor)));
    }

    #[test]
    fn reset_is_passed_through_to_behavior() {
        let mut inst = counter_instance(1);
        enable(&mut inst);
        inst.step(false);
        inst.step(false);
        assert_eq!(inst.signals()[CNT_COUNT].value.to_u64(), Some(2));
        inst.step(true);
        assert_eq!(inst.signals()[CNT_COUNT].value.to_u64(), Some(0));
    }

    #[test]
    fn clone_is_independent() {
        let mut inst = counter_instance(1);
        enable(&mut inst);
        inst.step(false);
        let mut copy = inst.clone();
        copy.step(false);
        copy.step(false);
        assert_eq!(inst.signals()[CNT_COUNT].value.to_u64(), Some(1));
        assert_eq!(copy.signals()[CNT_COUNT].value.to_u64(), Some(3));
    }

    #[test]
    fn copy_signals_from_same_kind() {
        let mut source = counter_instance(3);
        enable(&mut source);
        source.step(false);
        let mut dest = counter_instance(1);
        dest.copy_signals_from(&source).unwrap();
        for (a, b) in dest.signals().iter().zip(source.signals()) {
            assert_eq!(a.value, b.value, "signal '{}'", a.name);
        }
        // Divisor state travels with the values.
        assert_eq!(dest.divisor(), 3);
        assert_eq!(dest.ticks_until_fire(), source.ticks_until_fire());
    }

    #[test]
    fn copy_signals_from_rejects_other_kind() {
        let other = CircuitInstance::new(Rc::new(OtherKind), 1).unwrap();
        let mut dest = counter_instance(1);
        let before: Vec<_> = dest.signals().iter().map(|s| s.value.clone()).collect();
        let err = dest.copy_signals_from(&other).unwrap_err();
        assert!(matches!(err, SimError::KindMismatch { .. }));
        // Nothing was touched.
        for (sig, old) in dest.signals().iter().zip(before) {
            assert_eq!(sig.value, old);
        }
    }

    #[test]
    fn fill_rng_is_deterministic_per_seed() {
        let mut a = FillRng::from_seed(7);
        let mut b = FillRng::from_seed(7);
        let mut c = FillRng::from_seed(8);
        let from_a: Vec<_> = (0..4).map(|_| a.next_bits(33)).collect();
        let from_b: Vec<_> = (0..4).map(|_| b.next_bits(33)).collect();
        assert_eq!(from_a, from_b);
        let from_c: Vec<_> = (0..4).map(|_| c.next_bits(33)).collect();
        assert_ne!(from_a, from_c);
    }

    #[test]
    fn fill_rng_values_are_canonical() {
        let mut rng = FillRng::from_seed(1);
        for _ in 0..10 {
            let v = rng.next_bits(13);
            assert_eq!(v.width(), 13);
            assert!(v.fits_width(13));
        }
    }

    #[test]
    fn initialize_restarts_the_stream() {
        let mut inst = counter_instance(1);
        inst.initialize(42);
        let mut cx = EvalContext {
            signals: &mut inst.signals,
            rng: &mut inst.rng,
        };
        cx.fill_random(CNT_IO_COUNT);
        let first = cx.value(CNT_IO_COUNT).clone();
        inst.initialize(42);
        let mut cx = EvalContext {
            signals: &mut inst.signals,
            rng: &mut inst.rng,
        };
        cx.fill_random(CNT_IO_COUNT);
        assert_eq!(cx.value(CNT_IO_COUNT), &first);
    }
}
