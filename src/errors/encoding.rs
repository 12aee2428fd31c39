//! Primitive-level byte encoding errors.

/// Errors raised while appending primitives to a byte encoder
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Value {value} does not fit in uint{width}")]
    Range { width: u16, value: String },

    /// Anything that is not exactly 20 bytes of address, including
    /// strings that are not hex at all.
    #[error("Invalid address '{input}': expected 20 bytes")]
    InvalidAddress { input: String },
}
