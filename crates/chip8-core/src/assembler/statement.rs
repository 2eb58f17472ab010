//! One lexed source line.

use crate::error::{AssemblerError, CResult};
use crate::types::C8Addr;

/// Maximum operands a single statement may carry.
pub const MAX_ARGS: usize = 3;

/// A source line broken into its label, mnemonic and operands. A
/// comment-only or blank line yields a statement with neither.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    /// The label defined by this line, if any (`name:`).
    pub label: Option<String>,
    /// The mnemonic, uppercased-or-not as written in the source.
    pub mnemonic: Option<String>,
    /// Up to [`MAX_ARGS`] operands, in source order.
    pub args: Vec<String>,
}

impl Statement {
    pub(super) fn push_arg(&mut self, arg: String) -> CResult {
        if self.args.len() >= MAX_ARGS {
            return Err(Box::new(AssemblerError(format!(
                "too many arguments (max {})",
                MAX_ARGS
            ))));
        }
        self.args.push(arg);
        Ok(())
    }

    /// Bytes this statement contributes to the address counter: `0` for an
    /// empty line, `1` for `.SB`, `2` otherwise.
    pub fn byte_len(&self) -> C8Addr {
        match self.mnemonic.as_deref() {
            None => 0,
            Some(m) if m.eq_ignore_ascii_case(".SB") => 1,
            Some(_) => 2,
        }
    }
}
