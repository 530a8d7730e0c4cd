/// # interpreter
///
/// The machine state is small:
///  - memory                 -- sparse, every untouched address reads 0
///  - instruction pointer    -- starts at 0, moved only by instruction handlers
///  - relative base          -- starts at 0, moved only by opcode 9
///  - input queue            -- FIFO, optionally backed by a default value
///  - output queue           -- FIFO
///  - state                  -- running -> halted (opcode 99) or faulted (any fatal error)
///
/// There are two ways to drive it. `run` executes until the program halts and
/// leaves every output in the queue. `run_until_output` executes until the
/// next output instruction and hands that value straight back, so a caller can
/// react and push more input before resuming. Resuming picks up at the
/// instruction after the output; nothing executes twice.
use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::Budget;
use crate::error::{Error, Result};
use crate::input::InputQueue;
use crate::instruction::{Instruction, Mode, Opcode};
use crate::memory::{self, MemoryMap, SparseMemory};

/// where a computer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
    Faulted,
}

/// result of one streaming step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// an output instruction ran and produced this value
    Produced(i64),
    /// the program halted without producing anything further
    Halted,
}

impl Status {
    pub fn value(self) -> Option<i64> {
        match self {
            Status::Produced(v) => Some(v),
            Status::Halted => None,
        }
    }
}

// what a single instruction did, as far as the run loops care
enum Event {
    Continue,
    Output(i64),
    Halt,
}

#[derive(Debug, Clone)]
pub struct Computer {
    memory: SparseMemory,
    input: InputQueue,
    outputs: Vec<i64>,
    pointer: usize,
    relative_base: i64,
    state: State,
}

impl Computer {
    pub fn new(program: &[i64], inputs: &[i64]) -> Computer {
        Computer {
            memory: SparseMemory::new(program),
            input: InputQueue::new(inputs),
            outputs: Vec::new(),
            pointer: 0,
            relative_base: 0,
            state: State::Running,
        }
    }

    /// reset everything and load a fresh copy of `program`
    pub fn load(&mut self, program: &[i64], inputs: &[i64]) {
        debug!(len = program.len(), inputs = inputs.len(), "loading program");
        self.memory.load(program);
        self.input = InputQueue::new(inputs);
        self.outputs.clear();
        self.pointer = 0;
        self.relative_base = 0;
        self.state = State::Running;
    }

    /// queue a value for the next input instruction
    pub fn add_input(&mut self, value: i64) {
        self.input.push(value);
    }

    /// value used by input instructions when nothing is queued
    pub fn set_default_input(&mut self, default: Option<i64>) {
        self.input.set_default(default);
    }

    pub fn input_mut(&mut self) -> &mut InputQueue {
        &mut self.input
    }

    /// execute until the program halts; outputs stay in the queue
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.state {
                State::Halted => return Ok(()),
                State::Faulted => return Err(Error::Faulted),
                State::Running => {}
            }
            self.execute()?;
        }
    }

    /// execute until the next output instruction and return its value, or
    /// report that the program halted first
    pub fn run_until_output(&mut self) -> Result<Status> {
        self.stream(None)
    }

    /// as `run_until_output`, but every executed instruction is charged to
    /// `budget`; once it is spent this returns `Error::Exhausted` and leaves
    /// the computer where it stopped, still running
    pub fn run_until_output_within(&mut self, budget: &mut Budget) -> Result<Status> {
        self.stream(Some(budget))
    }

    fn stream(&mut self, mut budget: Option<&mut Budget>) -> Result<Status> {
        loop {
            match self.state {
                State::Halted => return Ok(Status::Halted),
                State::Faulted => return Err(Error::Faulted),
                State::Running => {}
            }
            if let Some(budget) = budget.as_deref_mut() {
                budget.spend()?;
            }
            match self.execute()? {
                Event::Output(value) => {
                    // streamed values are handed over, not queued
                    self.outputs.pop();
                    return Ok(Status::Produced(value));
                }
                Event::Halt => return Ok(Status::Halted),
                Event::Continue => {}
            }
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    pub fn memory(&self) -> &SparseMemory {
        &self.memory
    }

    /// read a word of memory
    pub fn read(&self, addr: usize) -> i64 {
        self.memory.get(addr)
    }

    /// patch a word of memory, e.g. before running
    pub fn write(&mut self, addr: usize, value: i64) {
        self.memory.set(addr, value);
    }

    pub fn outputs(&self) -> &[i64] {
        &self.outputs
    }

    pub fn last_output(&self) -> Option<i64> {
        self.outputs.last().copied()
    }

    /// drain every queued output, oldest first
    pub fn take_outputs(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.outputs)
    }

    pub fn render_memory(&self) -> String {
        self.memory.render()
    }

    pub fn render_outputs(&self) -> String {
        memory::render(&self.outputs)
    }

    fn execute(&mut self) -> Result<Event> {
        match self.execute_instruction() {
            Err(e) if e.is_fatal() => {
                warn!(pointer = self.pointer, error = %e, "computer faulted");
                self.state = State::Faulted;
                Err(e)
            }
            other => other,
        }
    }

    fn execute_instruction(&mut self) -> Result<Event> {
        let address = self.pointer;
        let word = self.memory.get(address);
        let instruction = Instruction::decode(word, address)?;
        trace!(address, word, opcode = ?instruction.opcode, "execute");

        let event = match instruction.opcode {
            Opcode::Add => {
                let (a, b) = (self.value(&instruction, 0)?, self.value(&instruction, 1)?);
                let sum = a.checked_add(b).ok_or(Error::Overflow { address })?;
                self.store(&instruction, 2, sum)?;
                Event::Continue
            }
            Opcode::Multiply => {
                let (a, b) = (self.value(&instruction, 0)?, self.value(&instruction, 1)?);
                let product = a.checked_mul(b).ok_or(Error::Overflow { address })?;
                self.store(&instruction, 2, product)?;
                Event::Continue
            }
            Opcode::Input => {
                // nothing may change if there is no input to take
                let target = self.target(&instruction, 0)?;
                let value = self.input.pop().ok_or(Error::MissingInput { address })?;
                self.memory.set(target, value);
                Event::Continue
            }
            Opcode::Output => {
                let value = self.value(&instruction, 0)?;
                debug!(address, value, "output");
                self.outputs.push(value);
                Event::Output(value)
            }
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let condition = self.value(&instruction, 0)? != 0;
                if condition == (instruction.opcode == Opcode::JumpIfTrue) {
                    self.pointer = memory::address(self.value(&instruction, 1)?)?;
                    return Ok(Event::Continue);
                }
                Event::Continue
            }
            Opcode::LessThan => {
                let (a, b) = (self.value(&instruction, 0)?, self.value(&instruction, 1)?);
                self.store(&instruction, 2, (a < b) as i64)?;
                Event::Continue
            }
            Opcode::Equals => {
                let (a, b) = (self.value(&instruction, 0)?, self.value(&instruction, 1)?);
                self.store(&instruction, 2, (a == b) as i64)?;
                Event::Continue
            }
            Opcode::AdjustBase => {
                let offset = self.value(&instruction, 0)?;
                self.relative_base = self
                    .relative_base
                    .checked_add(offset)
                    .ok_or(Error::Overflow { address })?;
                Event::Continue
            }
            Opcode::Halt => {
                debug!(address, outputs = self.outputs.len(), "halted");
                self.state = State::Halted;
                Event::Halt
            }
        };

        self.pointer += instruction.width();
        Ok(event)
    }

    /// raw parameter word `param` of the current instruction
    fn param(&self, param: usize) -> i64 {
        self.memory.get(self.pointer + 1 + param)
    }

    fn relative(&self, raw: i64) -> Result<usize> {
        let addr = self
            .relative_base
            .checked_add(raw)
            .ok_or(Error::Overflow {
                address: self.pointer,
            })?;
        memory::address(addr)
    }

    /// resolve a parameter for reading
    fn value(&self, instruction: &Instruction, param: usize) -> Result<i64> {
        let raw = self.param(param);
        match instruction.modes.get(param) {
            Mode::Position => Ok(self.memory.get(memory::address(raw)?)),
            Mode::Immediate => Ok(raw),
            Mode::Relative => Ok(self.memory.get(self.relative(raw)?)),
        }
    }

    /// resolve a parameter for writing
    fn target(&self, instruction: &Instruction, param: usize) -> Result<usize> {
        let raw = self.param(param);
        match instruction.modes.get(param) {
            Mode::Position => memory::address(raw),
            Mode::Relative => self.relative(raw),
            // decode already refuses these
            Mode::Immediate => Err(Error::ImmediateWrite {
                word: self.memory.get(self.pointer),
                address: self.pointer,
            }),
        }
    }

    fn store(&mut self, instruction: &Instruction, param: usize, value: i64) -> Result<()> {
        let target = self.target(instruction, param)?;
        self.memory.set(target, value);
        Ok(())
    }
}

impl fmt::Display for Computer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_memory())
    }
}
