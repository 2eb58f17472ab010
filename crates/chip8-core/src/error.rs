//! Error module.

use std::error::Error;
use std::fmt;

use crate::types::C8Addr;

/// Common result.
pub type CResult<T = ()> = Result<T, Box<dyn Error>>;

/// Bad or unrecognized instruction.
#[derive(Debug)]
pub struct BadInstruction(pub String);

impl Error for BadInstruction {}

impl fmt::Display for BadInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad instruction: {}", self.0)
    }
}

/// Memory access outside the addressable range, or outside the writable
/// region for a store.
#[derive(Debug)]
pub struct MemoryAccessError {
    /// Address that was rejected.
    pub addr: C8Addr,
    /// What was being attempted.
    pub reason: String,
}

impl Error for MemoryAccessError {}

impl fmt::Display for MemoryAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory access error at {:04X}: {}",
            self.addr, self.reason
        )
    }
}

/// Call stack underflow (RET with nothing to return to) or overflow (CALL
/// nested past the 16 available slots).
#[derive(Debug)]
pub struct StackError(pub String);

impl Error for StackError {}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack error: {}", self.0)
    }
}

/// A cartridge file could not be found or opened.
#[derive(Debug)]
pub struct MissingRomError(pub String);

impl Error for MissingRomError {}

impl fmt::Display for MissingRomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ROM not found: {}", self.0)
    }
}

/// An assembly source line could not be lexed (line too long, too many
/// arguments, unterminated token).
#[derive(Debug)]
pub struct AssemblerError(pub String);

impl Error for AssemblerError {}

impl fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assembler error: {}", self.0)
    }
}
