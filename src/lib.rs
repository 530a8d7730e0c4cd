///
/// ## Design
///
/// * a stack-less machine running programs that are flat lists of integers
/// * memory is sparse; any address not written reads as 0, however far out
/// * ten opcodes, three addressing modes (position, immediate, relative)
/// * anything that isn't one of those is fatal; no extension points
/// * execution can suspend after every output so callers can react and
///   push more input before resuming
///
/// Model
///
/// Caller
///  |-- program (parsed from text, or built by hand)
///  |-- computer(program, inputs)
///  |    |-- memory(program)
///  |    |-- input queue, with optional default value
///  |    `-- output queue
///  `-- one of
///       |-- run()                  -- batch; read outputs or memory afterwards
///       |-- run_until_output()     -- one value at a time, or Halted
///       |-- run_until_output_within(budget)  -- the same, bounded in instructions
///       |-- pipeline               -- ring of computers trading signals
///       `-- drive(controller)      -- controller reacts to every output
///
/// All driving happens on one thread; computers never share state, and the
/// only thing that passes between them is a single integer at a time.
pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod pipeline;
pub mod program;

pub use config::{Budget, Config};
pub use driver::{drive, Controller};
pub use error::{Error, Result};
pub use input::InputQueue;
pub use interpreter::{Computer, State, Status};
pub use memory::MemoryMap;
pub use pipeline::Pipeline;
pub use program::Program;
