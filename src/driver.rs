use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::Result;
use crate::input::InputQueue;
use crate::interpreter::{Computer, Status};

/// Controller is used by `drive` to react to a running program. It sees each
/// output as soon as it is produced and can queue input, or change the
/// default input, before the computer resumes.
pub trait Controller {
    /// handle one output; break to stop driving early
    fn receive(&mut self, value: i64, input: &mut InputQueue) -> ControlFlow<()>;
}

impl<F> Controller for F
where
    F: FnMut(i64, &mut InputQueue) -> ControlFlow<()>,
{
    fn receive(&mut self, value: i64, input: &mut InputQueue) -> ControlFlow<()> {
        self(value, input)
    }
}

/// Run `computer` one output at a time, handing each value to `controller`,
/// until the program halts or the controller breaks. Returns the number of
/// outputs handled. Every executed instruction counts against the configured
/// step limit, whether or not it produces output.
pub fn drive(
    computer: &mut Computer,
    controller: &mut impl Controller,
    config: &Config,
) -> Result<usize> {
    let mut budget = config.budget();
    let mut handled = 0;
    loop {
        match computer.run_until_output_within(&mut budget)? {
            Status::Produced(value) => {
                handled += 1;
                let input = computer.input_mut();
                let flow = controller.receive(value, input);
                trace!(value, pending = input.len(), "controller answered");
                if flow.is_break() {
                    debug!(handled, steps = budget.used(), "controller stopped driving");
                    return Ok(handled);
                }
            }
            Status::Halted => {
                debug!(handled, steps = budget.used(), "program halted");
                return Ok(handled);
            }
        }
    }
}
