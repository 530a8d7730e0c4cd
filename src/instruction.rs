//! Instruction words and the opcode table.
//!
//! A word packs the opcode into its two low decimal digits; every digit above
//! that is the addressing mode of one parameter, least significant first:
//!
//! ```text
//!   1002  ->  opcode 02, modes [0, 1]      (p3 missing, so position)
//!  21101  ->  opcode 01, modes [1, 1, 2]
//! ```
use crate::error::{Error, Result};

/// how a parameter turns into a value or an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Position,
    Immediate,
    Relative,
}

impl Mode {
    fn from_digit(digit: i64) -> Option<Mode> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            2 => Some(Mode::Relative),
            _ => None,
        }
    }
}

/// the ten instructions the machine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustBase,
    Halt,
}

impl Opcode {
    pub fn from_code(code: i64) -> Option<Opcode> {
        match code {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Multiply),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::AdjustBase),
            99 => Some(Opcode::Halt),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Opcode::Add => 1,
            Opcode::Multiply => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustBase => 9,
            Opcode::Halt => 99,
        }
    }

    /// number of parameter words following the instruction word
    pub fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// zero-based index of the parameter that names a write target, if any
    pub fn write_param(self) -> Option<usize> {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => Some(2),
            Opcode::Input => Some(0),
            _ => None,
        }
    }
}

/// per-parameter modes; anything not spelled out in the word is position mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modes(Vec<Mode>);

impl Modes {
    pub fn get(&self, param: usize) -> Mode {
        self.0.get(param).copied().unwrap_or(Mode::Position)
    }

    pub fn as_slice(&self) -> &[Mode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// a decoded instruction word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub modes: Modes,
}

impl Instruction {
    /// decode the word found at `address`
    pub fn decode(word: i64, address: usize) -> Result<Instruction> {
        let (code, mut digits) = if word <= 99 {
            (word, 0)
        } else {
            (word % 100, word / 100)
        };
        let opcode = Opcode::from_code(code).ok_or(Error::UnknownOpcode {
            opcode: code,
            address,
        })?;

        let mut modes = Vec::new();
        while digits > 0 {
            let digit = digits % 10;
            let mode = Mode::from_digit(digit).ok_or(Error::InvalidMode {
                mode: digit,
                word,
                address,
            })?;
            modes.push(mode);
            digits /= 10;
        }
        let modes = Modes(modes);

        // handlers only ever see write targets they can resolve to an address
        if let Some(param) = opcode.write_param() {
            if modes.get(param) == Mode::Immediate {
                return Err(Error::ImmediateWrite { word, address });
            }
        }

        Ok(Instruction { opcode, modes })
    }

    /// words consumed by this instruction, including the instruction word
    pub fn width(&self) -> usize {
        1 + self.opcode.arity()
    }
}
