//! Delta-compressed VCD waveform recording.
//!
//! [`VcdRecorder`] emits IEEE 1364 Value Change Dump text: a self-describing
//! header naming every tracked signal, a full initial frame at time zero,
//! and afterwards only the signals whose values changed since they were
//! last emitted. The output opens unmodified in GTKWave, Surfer, and other
//! third-party viewers.

use std::io::Write;

use strobe_common::Bits;

use crate::error::SimError;
use crate::signal::Signal;

/// One tracked variable: its identifier code and declared width.
struct TrackedVar {
    code: String,
    width: u32,
}

/// VCD recorder with per-signal change suppression.
///
/// Variables are declared in signal declaration order and keep that order
/// in every frame. A signal's value is written at time `t` iff it differs
/// from the last value written for that signal; the initial frame at time
/// zero writes every signal unconditionally and seeds the shadow values.
pub struct VcdRecorder<W: Write> {
    writer: W,
    vars: Vec<TrackedVar>,
    last: Vec<Bits>,
    header_written: bool,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            vars: Vec::new(),
            last: Vec::new(),
            header_written: false,
        }
    }

    /// Generates a VCD identifier code from a sequential index.
    ///
    /// Uses printable ASCII starting from `!` (0x21); indices past 93
    /// produce multi-character codes.
    fn make_id_code(index: u32) -> String {
        let mut result = String::new();
        let mut idx = index;
        loop {
            let c = (b'!' + (idx % 94) as u8) as char;
            result.push(c);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        result
    }

    /// Formats one value change token.
    ///
    /// Single-bit signals use the scalar form `0!`; wider signals use the
    /// binary vector form `b1010 !`.
    fn write_token(writer: &mut W, value: &Bits, width: u32, code: &str) -> Result<(), SimError> {
        if width == 1 {
            writeln!(writer, "{value}{code}")?;
        } else {
            writeln!(writer, "b{value} {code}")?;
        }
        Ok(())
    }

    /// Writes the header: timescale, scope, one `$var` per signal, scope
    /// closure, definitions end, the `$dumpvars` block, and the full `#0`
    /// frame. Every emitted value becomes the signal's shadow.
    pub fn write_header(&mut self, module: &str, signals: &[Signal]) -> Result<(), SimError> {
        debug_assert!(!self.header_written, "header is written exactly once");
        writeln!(self.writer, "$timescale 1ps $end")?;
        writeln!(self.writer, "$scope module {module} $end")?;
        for (index, signal) in signals.iter().enumerate() {
            let code = Self::make_id_code(index as u32);
            writeln!(
                self.writer,
                "$var wire {} {} {} $end",
                signal.width, code, signal.name
            )?;
            self.vars.push(TrackedVar {
                code,
                width: signal.width,
            });
        }
        writeln!(self.writer, "$upscope $end")?;
        writeln!(self.writer, "$enddefinitions $end")?;

        writeln!(self.writer, "$dumpvars")?;
        for (signal, var) in signals.iter().zip(&self.vars) {
            Self::write_token(&mut self.writer, &signal.value, var.width, &var.code)?;
        }
        writeln!(self.writer, "$end")?;

        writeln!(self.writer, "#0")?;
        for (signal, var) in signals.iter().zip(&self.vars) {
            Self::write_token(&mut self.writer, &signal.value, var.width, &var.code)?;
        }

        self.last = signals.iter().map(|s| s.value.clone()).collect();
        self.header_written = true;
        Ok(())
    }

    /// Writes a frame at time `t` containing only changed signals.
    ///
    /// The `#<t>` marker itself is suppressed when nothing changed.
    pub fn write_frame(&mut self, t: u64, signals: &[Signal]) -> Result<(), SimError> {
        debug_assert!(self.header_written, "frames follow the header");
        debug_assert_eq!(signals.len(), self.last.len());
        let any_changed = signals
            .iter()
            .zip(&self.last)
            .any(|(signal, last)| signal.value != *last);
        if !any_changed {
            return Ok(());
        }
        writeln!(self.writer, "#{t}")?;
        for (index, (signal, var)) in signals.iter().zip(&self.vars).enumerate() {
            if signal.value != self.last[index] {
                Self::write_token(&mut self.writer, &signal.value, var.width, &var.code)?;
                self.last[index] = signal.value.clone();
            }
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Borrows the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}
