//! Primitive encoder/decoder contract
//!
//! A codec knows the physical encoding of one token, integer or double and
//! nothing about models. The orchestrator in [`persist`](super::persist) is
//! generic over these traits, so plain text, binary and test doubles are
//! interchangeable.

use crate::Result;

/// Write side of a model codec
pub trait ModelEncoder {
    fn write_token(&mut self, token: &str) -> Result<()>;

    fn write_int(&mut self, value: i64) -> Result<()>;

    fn write_double(&mut self, value: f64) -> Result<()>;

    /// Flush buffered output and release the transport
    fn close(self) -> Result<()>;
}

/// Read side of a model codec
///
/// Reads past the end of the stream fail with
/// [`MalformedError::UnexpectedEof`](crate::MalformedError::UnexpectedEof).
pub trait ModelDecoder {
    fn read_token(&mut self) -> Result<String>;

    fn read_int(&mut self) -> Result<i64>;

    fn read_double(&mut self) -> Result<f64>;

    /// Position of the most recently read token, for error reporting
    fn position(&self) -> usize;

    /// Release the transport
    fn close(self) -> Result<()>;
}
