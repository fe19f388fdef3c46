//! Plain-text codec: one token per line

use super::codec::{ModelDecoder, ModelEncoder};
use super::transport::Sink;
use crate::error::{Error, MalformedError, Result};
use std::io::{self, BufRead};

/// Writes each primitive as one `\n`-terminated line
///
/// Doubles use the shortest representation that parses back to the same
/// `f64`. Tokens containing a line terminator are rejected, since the format
/// has no escaping.
pub struct PlainTextModelWriter<W: Sink> {
    output: W,
}

impl<W: Sink> PlainTextModelWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Sink> ModelEncoder for PlainTextModelWriter<W> {
    fn write_token(&mut self, token: &str) -> Result<()> {
        if token.contains(['\n', '\r']) {
            return Err(Error::UnencodableToken(token.to_string()));
        }
        self.output.write_all(token.as_bytes())?;
        self.output.write_all(b"\n")?;
        Ok(())
    }

    fn write_int(&mut self, value: i64) -> Result<()> {
        writeln!(self.output, "{value}")?;
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        // Debug is the shortest round-trip form and keeps exponents compact
        writeln!(self.output, "{value:?}")?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.output.finish()?;
        Ok(())
    }
}

/// Reads one primitive per line, accepting `\n` and `\r\n` terminators
pub struct PlainTextModelReader<R: BufRead> {
    input: R,
    line: usize,
    raw: Vec<u8>,
    buf: String,
}

impl<R: BufRead> PlainTextModelReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            raw: Vec::new(),
            buf: String::new(),
        }
    }

    /// Load the next line into `buf`, without its terminator
    fn advance(&mut self) -> Result<()> {
        self.raw.clear();
        if self.input.read_until(b'\n', &mut self.raw)? == 0 {
            return Err(MalformedError::UnexpectedEof {
                line: self.line + 1,
            }
            .into());
        }
        self.line += 1;
        if self.raw.ends_with(b"\n") {
            self.raw.pop();
            if self.raw.ends_with(b"\r") {
                self.raw.pop();
            }
        }

        let text = std::str::from_utf8(&self.raw)
            .map_err(|_| MalformedError::InvalidUtf8 { line: self.line })?;
        self.buf.clear();
        self.buf.push_str(text);
        Ok(())
    }
}

impl<R: BufRead> ModelDecoder for PlainTextModelReader<R> {
    fn read_token(&mut self) -> Result<String> {
        self.advance()?;
        Ok(self.buf.clone())
    }

    fn read_int(&mut self) -> Result<i64> {
        self.advance()?;
        self.buf.parse().map_err(|_| {
            MalformedError::InvalidInt {
                line: self.line,
                token: self.buf.clone(),
            }
            .into()
        })
    }

    fn read_double(&mut self) -> Result<f64> {
        self.advance()?;
        self.buf.parse().map_err(|_| {
            MalformedError::InvalidDouble {
                line: self.line,
                token: self.buf.clone(),
            }
            .into()
        })
    }

    fn position(&self) -> usize {
        self.line
    }

    /// Drains the rest of the input so decompression errors in the trailer
    /// surface here rather than being dropped.
    fn close(mut self) -> Result<()> {
        io::copy(&mut self.input, &mut io::sink())?;
        Ok(())
    }
}
