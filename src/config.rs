use crate::error::{Error, Result};

/// how many instructions a driving loop may execute before giving up
const DEFAULT_STEP_LIMIT: usize = 500_000_000;

/// Settings for loops that drive computers. The interpreter itself never
/// gives up on a program; driving loops charge every executed instruction to
/// a `Budget` built from here, so a program that spins, with or without
/// output, is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub step_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Config {
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// a fresh budget for one driving loop
    pub fn budget(&self) -> Budget {
        Budget::new(self.step_limit)
    }
}

/// a count of instructions still allowed to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    pub fn new(limit: usize) -> Self {
        Budget { limit, used: 0 }
    }

    /// charge one instruction
    pub fn spend(&mut self) -> Result<()> {
        if self.used == self.limit {
            return Err(Error::Exhausted { limit: self.limit });
        }
        self.used += 1;
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used
    }
}
