use std::io;
use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// everything that can go wrong loading, running or driving a computer
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown opcode {opcode} at address {address}")]
    UnknownOpcode { opcode: i64, address: usize },

    #[error("invalid parameter mode {mode} in word {word} at address {address}")]
    InvalidMode { mode: i64, word: i64, address: usize },

    #[error("write target in immediate mode in word {word} at address {address}")]
    ImmediateWrite { word: i64, address: usize },

    #[error("invalid memory address {address}")]
    InvalidAddress { address: i64 },

    #[error("arithmetic overflow at address {address}")]
    Overflow { address: usize },

    #[error("input instruction at address {address} found no input")]
    MissingInput { address: usize },

    #[error("computer faulted earlier and cannot be stepped")]
    Faulted,

    /// raised by driving loops, never by the interpreter itself
    #[error("did not converge within {limit} iterations")]
    Exhausted { limit: usize },

    #[error("pipeline finished without output from its final stage")]
    NoOutput,

    #[error("invalid program value {token:?} at index {index}")]
    Parse {
        index: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// fatal errors leave the computer in an undefined state; a missing input
    /// is the only one that can be retried
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::MissingInput { .. })
    }
}
