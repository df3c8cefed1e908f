//! Error types for fixed-width bit vector operations.

/// Errors produced by [`Bits`](crate::Bits) construction and bit access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitsError {
    /// The requested width cannot represent a value.
    #[error("invalid bit width {0}; width must be at least 1")]
    InvalidWidth(u32),

    /// A bit index referred past the end of the vector.
    #[error("bit index {index} out of range for width {width}")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// The width of the accessed vector.
        width: u32,
    },

    /// Division or remainder by a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_width_display() {
        let e = BitsError::InvalidWidth(0);
        assert_eq!(
            e.to_string(),
            "invalid bit width 0; width must be at least 1"
        );
    }

    #[test]
    fn index_out_of_range_display() {
        let e = BitsError::IndexOutOfRange {
            index: 16,
            width: 16,
        };
        assert_eq!(e.to_string(), "bit index 16 out of range for width 16");
    }

    #[test]
    fn division_by_zero_display() {
        let e = BitsError::DivisionByZero;
        assert_eq!(e.to_string(), "division by zero");
    }
}
