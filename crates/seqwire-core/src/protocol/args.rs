//! Checked, typed access to OSC message arguments (panic-free).
//!
//! Parsing rules:
//! - Never index (`args[0]`) — always go through `get` and typed extraction.
//! - Missing args are `Truncated`, wrong-typed args are `TypeMismatch`.

use rosc::OscMessage;

use crate::error::{Result, SeqwireError};

/// Typed argument accessors for [`OscMessage`].
pub trait OscArgs {
    /// Fail unless the message has exactly this address.
    fn expect_addr(&self, addr: &str) -> Result<()>;
    /// String arg at `index`, named for error context.
    fn string_at(&self, index: usize, name: &str) -> Result<String>;
    /// Float arg at `index`.
    fn float_at(&self, index: usize, name: &str) -> Result<f32>;
    /// Int arg at `index`.
    fn int_at(&self, index: usize, name: &str) -> Result<i32>;
    /// Int arg at `index`, `None` if the message is shorter than that.
    fn maybe_int_at(&self, index: usize, name: &str) -> Result<Option<i32>>;
}

impl OscArgs for OscMessage {
    fn expect_addr(&self, addr: &str) -> Result<()> {
        if self.addr != addr {
            return Err(SeqwireError::BadTag(format!(
                "expected {addr}, got {}",
                self.addr
            )));
        }
        Ok(())
    }

    fn string_at(&self, index: usize, name: &str) -> Result<String> {
        let arg = self.args.get(index).ok_or_else(|| {
            SeqwireError::Truncated(format!("{name}: no arg at index {index}"))
        })?;
        arg.clone().string().ok_or_else(|| {
            SeqwireError::TypeMismatch(format!("{name}: arg {index} is not a string"))
        })
    }

    fn float_at(&self, index: usize, name: &str) -> Result<f32> {
        let arg = self.args.get(index).ok_or_else(|| {
            SeqwireError::Truncated(format!("{name}: no arg at index {index}"))
        })?;
        arg.clone().float().ok_or_else(|| {
            SeqwireError::TypeMismatch(format!("{name}: arg {index} is not a float"))
        })
    }

    fn int_at(&self, index: usize, name: &str) -> Result<i32> {
        let arg = self.args.get(index).ok_or_else(|| {
            SeqwireError::Truncated(format!("{name}: no arg at index {index}"))
        })?;
        arg.clone().int().ok_or_else(|| {
            SeqwireError::TypeMismatch(format!("{name}: arg {index} is not an int"))
        })
    }

    fn maybe_int_at(&self, index: usize, name: &str) -> Result<Option<i32>> {
        match self.args.get(index) {
            None => Ok(None),
            Some(arg) => arg
                .clone()
                .int()
                .map(Some)
                .ok_or_else(|| {
                    SeqwireError::TypeMismatch(format!("{name}: arg {index} is not an int"))
                }),
        }
    }
}
