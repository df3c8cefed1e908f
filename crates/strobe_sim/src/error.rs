//! Simulation error types for the circuit runtime.
//!
//! All errors that can occur while constructing or driving a simulation are
//! represented as variants of [`SimError`].

use std::io;

use strobe_common::BitsError;

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A peek or poke referred to a name the registry does not know.
    #[error("unknown signal '{name}'")]
    UnknownSignal {
        /// The name that failed to resolve.
        name: String,
    },

    /// A poked value does not fit the target signal's declared width.
    #[error("value does not fit signal '{name}' of width {width}")]
    WidthMismatch {
        /// The target signal name.
        name: String,
        /// The signal's declared width.
        width: u32,
    },

    /// A snapshot copy was attempted between different circuit kinds.
    #[error("circuit kind mismatch: expected '{expected}', found '{found}'")]
    KindMismatch {
        /// The kind of the destination instance.
        expected: String,
        /// The kind of the source instance.
        found: String,
    },

    /// A clock divisor of zero was requested.
    #[error("clock divisor must be at least 1")]
    ZeroDivisor,

    /// A restore was requested before any snapshot was taken.
    #[error("no snapshot to restore")]
    NoSnapshot,

    /// Trace control was requested without a configured trace sink.
    #[error("no trace sink configured")]
    NoTraceSink,

    /// An I/O error on the trace, transcript, or command streams.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A bit vector operation failed.
    #[error("value error: {0}")]
    Value(#[from] BitsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_signal_display() {
        let e = SimError::UnknownSignal {
            name: "Top.io_x".into(),
        };
        assert_eq!(e.to_string(), "unknown signal 'Top.io_x'");
    }

    #[test]
    fn width_mismatch_display() {
        let e = SimError::WidthMismatch {
            name: "Top.io_x".into(),
            width: 16,
        };
        assert_eq!(
            e.to_string(),
            "value does not fit signal 'Top.io_x' of width 16"
        );
    }

    #[test]
    fn kind_mismatch_display() {
        let e = SimError::KindMismatch {
            expected: "Dot8".into(),
            found: "Pulse".into(),
        };
        assert_eq!(
            e.to_string(),
            "circuit kind mismatch: expected 'Dot8', found 'Pulse'"
        );
    }

    #[test]
    fn zero_divisor_display() {
        assert_eq!(
            SimError::ZeroDivisor.to_string(),
            "clock divisor must be at least 1"
        );
    }

    #[test]
    fn no_snapshot_display() {
        assert_eq!(SimError::NoSnapshot.to_string(), "no snapshot to restore");
    }

    #[test]
    fn no_trace_sink_display() {
        assert_eq!(
            SimError::NoTraceSink.to_string(),
            "no trace sink configured"
        );
    }

    #[test]
    fn io_display() {
        let e = SimError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(e.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn value_display() {
        let e = SimError::Value(BitsError::DivisionByZero);
        assert_eq!(e.to_string(), "value error: division by zero");
    }
}
