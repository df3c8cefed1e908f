//! `Dot8` — an eight-lane signed fixed-point dot product.
//!
//! Each lane multiplies a Q8.8 coefficient `io_a_<i>` with a Q8.8 sample
//! `io_b_<i>`. Products are formed sign-magnitude at 32 bits, rescaled by
//! an arithmetic shift of 8, accumulated at 24 bits, and truncated to the
//! 16-bit `sum` wire. The `acc` register commits `sum` on each clock and
//! feeds the `io_out` output; `io_wa`/`io_wb` are don't-care outputs filled
//! from the instance generator. Reset clears `acc` — that choice is this
//! circuit's contract, not the runtime's.

use strobe_common::Bits;
use strobe_sim::{CircuitBehavior, EvalContext, SignalDecl, SignalRole};

/// Lane count.
const LANES: usize = 8;

/// Coefficient/sample input name pairs, one per lane.
const LANE_NAMES: [(&str, &str); LANES] = [
    ("io_a_0", "io_b_0"),
    ("io_a_1", "io_b_1"),
    ("io_a_2", "io_b_2"),
    ("io_a_3", "io_b_3"),
    ("io_a_4", "io_b_4"),
    ("io_a_5", "io_b_5"),
    ("io_a_6", "io_b_6"),
    ("io_a_7", "io_b_7"),
];

// Signal indices; inputs occupy 0..16 in lane order.
const SUM: usize = 16;
const ACC: usize = 17;
const IO_OUT: usize = 18;
const IO_WA: usize = 19;
const IO_WB: usize = 20;

fn lane_a(lane: usize) -> usize {
    lane * 2
}

fn lane_b(lane: usize) -> usize {
    lane * 2 + 1
}

fn zero(width: u32) -> Bits {
    Bits::new(width).expect("constant widths are nonzero")
}

/// The eight-lane dot product circuit.
pub struct Dot8;

impl CircuitBehavior for Dot8 {
    fn kind(&self) -> &'static str {
        "Dot8"
    }

    fn declare_signals(&self) -> Vec<SignalDecl> {
        let mut decls = Vec::with_capacity(21);
        for (a, b) in LANE_NAMES {
            decls.push(SignalDecl::new(a, 16, SignalRole::Input));
            decls.push(SignalDecl::new(b, 16, SignalRole::Input));
        }
        decls.push(SignalDecl::new("sum", 16, SignalRole::Wire));
        decls.push(SignalDecl::new("acc", 16, SignalRole::Register));
        decls.push(SignalDecl::new("io_out", 16, SignalRole::Output));
        decls.push(SignalDecl::new("io_wa", 16, SignalRole::Output));
        decls.push(SignalDecl::new("io_wb", 16, SignalRole::Output));
        decls
    }

    fn evaluate_combinational(&self, cx: &mut EvalContext<'_>, _reset: bool) {
        let mut total = zero(24);
        for lane in 0..LANES {
            let a = cx.value(lane_a(lane));
            let b = cx.value(lane_b(lane));
            let a_neg = a.sign_bit();
            let b_neg = b.sign_bit();
            let a_mag = if a_neg { a.neg(16) } else { a.clone() };
            let b_mag = if b_neg { b.neg(16) } else { b.clone() };
            let mut product = a_mag.mul(&b_mag, 32);
            if a_neg ^ b_neg {
                product = product.neg(32);
            }
            let term = product.asr(8).truncate(24);
            total = total.add(&term, 24);
        }
        cx.set(SUM, total.truncate(16));
        cx.set(IO_OUT, cx.value(ACC).clone());
        cx.fill_random(IO_WA);
        cx.fill_random(IO_WB);
    }

    fn commit_sequential(&self, cx: &mut EvalContext<'_>, reset: bool) {
        if reset {
            cx.set(ACC, zero(16));
        } else {
            cx.set(ACC, cx.value(SUM).clone());
        }
    }
}
