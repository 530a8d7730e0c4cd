use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interpreter::{Computer, Status};

/// A ring of computers running the same program, each seeded with its own
/// phase setting. Every output is handed to the next stage as input and the
/// final stage feeds back into the first.
///
/// Serial chains need nothing special: the first stage halts as soon as the
/// final stage's signal comes back round, which ends the run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Computer>,
    config: Config,
}

impl Pipeline {
    pub fn new(program: &[i64], phases: &[i64]) -> Self {
        Pipeline {
            stages: phases
                .iter()
                .map(|phase| Computer::new(program, &[*phase]))
                .collect(),
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn stages(&self) -> &[Computer] {
        &self.stages
    }

    /// feed `seed` to the first stage and pass signals round until a stage
    /// halts; returns the last signal produced by the final stage
    pub fn run(&mut self, seed: i64) -> Result<i64> {
        let last_stage = match self.stages.len() {
            0 => return Err(Error::NoOutput),
            n => n - 1,
        };
        let mut budget = self.config.budget();
        let mut signal = seed;
        let mut result = None;
        let mut round = 0;

        'rounds: loop {
            for (index, stage) in self.stages.iter_mut().enumerate() {
                stage.add_input(signal);
                match stage.run_until_output_within(&mut budget)? {
                    Status::Produced(value) => {
                        trace!(round, stage = index, value, "signal");
                        signal = value;
                        if index == last_stage {
                            result = Some(value);
                        }
                    }
                    Status::Halted => {
                        debug!(round, stage = index, "stage halted, pipeline done");
                        break 'rounds;
                    }
                }
            }
            round += 1;
        }

        debug!(steps = budget.used(), "pipeline finished");
        result.ok_or(Error::NoOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEEDBACK_SAMPLE: [i64; 29] = [
        3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1, 28,
        1005, 28, 6, 99, 0, 0, 5,
    ];

    #[test]
    fn test_feedback_loop_sample() -> Result<()> {
        let mut p = Pipeline::new(&FEEDBACK_SAMPLE, &[9, 8, 7, 6, 5]);
        assert_eq!(p.stages().len(), 5);
        assert_eq!(p.run(0)?, 139629729);
        assert!(p.stages()[0].is_halted());
        Ok(())
    }

    #[test]
    fn test_feedback_loop_second_sample() -> Result<()> {
        let program = [
            3, 52, 1001, 52, -5, 52, 3, 53, 1, 52, 56, 54, 1007, 54, 5, 55, 1005, 55, 26, 1001,
            54, -5, 54, 1105, 1, 12, 1, 53, 54, 53, 1008, 54, 0, 55, 1001, 55, 1, 55, 2, 53, 55,
            53, 4, 53, 1001, 56, -1, 56, 1005, 56, 6, 99, 0, 0, 0, 0, 10,
        ];
        assert_eq!(Pipeline::new(&program, &[9, 7, 8, 5, 6]).run(0)?, 18216);
        Ok(())
    }

    #[test]
    fn test_serial_chains() -> Result<()> {
        let cases = vec![
            (
                vec![3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0],
                [4, 3, 2, 1, 0],
                43210,
            ),
            (
                vec![
                    3, 23, 3, 24, 1002, 24, 10, 24, 1002, 23, -1, 23, 101, 5, 23, 23, 1, 24, 23,
                    23, 4, 23, 99, 0, 0,
                ],
                [0, 1, 2, 3, 4],
                54321,
            ),
            (
                vec![
                    3, 31, 3, 32, 1002, 32, 10, 32, 1001, 31, -2, 31, 1007, 31, 0, 33, 1002, 33,
                    7, 33, 1, 33, 31, 31, 1, 32, 31, 31, 4, 31, 99, 0, 0, 0,
                ],
                [1, 0, 4, 3, 2],
                65210,
            ),
        ];
        for (program, phases, expected) in cases {
            assert_eq!(Pipeline::new(&program, &phases).run(0)?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_runaway_pipeline_exhausts() {
        // every stage outputs 1 forever
        let mut p = Pipeline::new(&[104, 1, 1105, 1, 0], &[0, 0])
            .with_config(Config::default().with_step_limit(100));
        assert!(matches!(p.run(0), Err(Error::Exhausted { limit: 100 })));
    }

    #[test]
    fn test_silent_stage_exhausts() {
        // phase 1 echoes the signal; phase 0 jumps to itself forever
        let program = [3, 20, 3, 21, 1006, 20, 11, 4, 21, 99, 0, 1105, 1, 11];
        let mut p = Pipeline::new(&program, &[1, 0])
            .with_config(Config::default().with_step_limit(1_000));
        assert!(matches!(p.run(5), Err(Error::Exhausted { limit: 1_000 })));
    }

    #[test]
    fn test_no_output_from_final_stage() {
        assert!(matches!(
            Pipeline::new(&[99], &[0, 1]).run(0),
            Err(Error::NoOutput)
        ));
        assert!(matches!(
            Pipeline::new(&[99], &[]).run(0),
            Err(Error::NoOutput)
        ));
    }

    #[test]
    fn test_single_stage_echo() -> Result<()> {
        // read phase, read signal, send the signal back out
        let mut p = Pipeline::new(&[3, 9, 3, 9, 4, 9, 99, 0, 0, 0], &[0]);
        assert_eq!(p.run(5)?, 5);
        Ok(())
    }

    #[test]
    fn test_stage_errors_propagate() {
        let mut p = Pipeline::new(&[42], &[0, 1]);
        assert!(matches!(
            p.run(0),
            Err(Error::UnknownOpcode { opcode: 42, .. })
        ));
    }
}
