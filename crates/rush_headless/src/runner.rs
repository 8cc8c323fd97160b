//! Headless runner implementation.
//!
//! The runner owns one [`Simulation`] and answers every protocol command
//! with exactly one response line. Input and output are generic so the same
//! loop drives stdin/stdout in the binary and in-memory buffers in tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rush_core::config::FactoryConfig;
use rush_core::movement::HeldDirections;
use rush_core::simulation::Simulation;

use crate::protocol::{Command, Response};

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Answer `tick` and `frame` with a full state instead of an ack.
    pub auto_state_output: bool,
    /// Layout file to load on startup (stock plant when `None`).
    pub layout_path: Option<PathBuf>,
}

/// Headless runner for scripted play.
#[derive(Debug)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    sim: Simulation,
}

impl HeadlessRunner {
    /// Create a runner over a validated factory with default settings.
    pub fn new(factory: FactoryConfig) -> Self {
        Self::with_config(factory, HeadlessConfig::default())
    }

    /// Create a runner with custom configuration.
    pub fn with_config(factory: FactoryConfig, config: HeadlessConfig) -> Self {
        Self {
            config,
            sim: Simulation::new(factory),
        }
    }

    /// The simulation being driven.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// Writes a `ready` line first and a `bye` line last. Malformed lines
    /// produce an `error` response and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        tracing::info!(layout = ?self.config.layout_path, "Headless session started");
        write_response(&mut output, &Response::ready(self.sim.state().tick))?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::from_json(line) {
                Ok(command) => command,
                Err(e) => {
                    tracing::debug!(%line, error = %e, "Rejected command line");
                    write_response(&mut output, &Response::error(format!("Parse error: {e}"), None))?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }
            let response = self.handle(command);
            write_response(&mut output, &response)?;
        }

        write_response(&mut output, &Response::Bye)
    }

    /// Apply one command and build its response.
    ///
    /// `quit` is handled by [`HeadlessRunner::run`]; here it is a plain ack.
    pub fn handle(&mut self, command: Command) -> Response {
        let name = command.name();
        match command {
            Command::Start { now_ms } => {
                self.sim.start(now_ms);
                Response::ack(name)
            }
            Command::Restart => {
                self.sim.restart();
                Response::ack(name)
            }
            Command::Hold { directions } => {
                self.sim
                    .set_held_directions(HeldDirections::from_directions(directions));
                Response::ack(name)
            }
            Command::Interact => Response::interaction(self.sim.interact()),
            Command::Tick { count } => {
                for _ in 0..count {
                    self.sim.tick();
                }
                self.after_time_step(name)
            }
            Command::Frame { now_ms } => {
                self.sim.frame(now_ms);
                self.after_time_step(name)
            }
            Command::Query => self.state(),
            Command::Hash => Response::StateHash {
                tick: self.sim.state().tick,
                hash: self.sim.state_hash(),
            },
            Command::Quit => Response::ack(name),
        }
    }

    fn after_time_step(&self, name: &str) -> Response {
        if self.config.auto_state_output {
            self.state()
        } else {
            Response::ack(name)
        }
    }

    fn state(&self) -> Response {
        Response::State {
            snapshot: self.sim.snapshot(),
            hash: self.sim.state_hash(),
        }
    }
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rush_core::data::FactoryLayout;
    use rush_core::simulation::GamePhase;

    fn runner() -> HeadlessRunner {
        HeadlessRunner::new(FactoryLayout::recycling_plant().validate().unwrap())
    }

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut runner = runner();
        runner.handle(Command::Tick { count: 10 });
        assert_eq!(runner.simulation().state().tick, 0);
        assert_eq!(runner.simulation().state().phase, GamePhase::Ready);
    }

    #[test]
    fn test_start_then_tick() {
        let mut runner = runner();
        assert_eq!(runner.handle(Command::Start { now_ms: 0 }), Response::ack("start"));
        assert_eq!(runner.handle(Command::Tick { count: 3 }), Response::ack("tick"));
        assert_eq!(runner.simulation().state().tick, 3);
    }

    #[test]
    fn test_auto_state_answers_ticks_with_state() {
        let factory = FactoryLayout::recycling_plant().validate().unwrap();
        let mut runner = HeadlessRunner::with_config(
            factory,
            HeadlessConfig {
                auto_state_output: true,
                layout_path: None,
            },
        );
        runner.handle(Command::Start { now_ms: 0 });
        match runner.handle(Command::Tick { count: 2 }) {
            Response::State { snapshot, .. } => assert_eq!(snapshot.tick, 2),
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_is_clock_gated() {
        let mut runner = runner();
        runner.handle(Command::Start { now_ms: 1000 });
        runner.handle(Command::Frame { now_ms: 1010 });
        assert_eq!(runner.simulation().state().tick, 0);
        runner.handle(Command::Frame { now_ms: 1016 });
        assert_eq!(runner.simulation().state().tick, 1);
    }
}
