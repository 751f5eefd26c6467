//! Interactive question loop on stdin/stdout.

use std::io::BufRead;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use trivia_core::model::{AdvanceMode, Side};

use services::{AdvanceTicket, ResultAggregator, RevealTimer, SessionEngine, SessionPhase};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Choose(Side),
    Continue,
    Restart,
    Quit,
    Yes,
    No,
    Unknown,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "1" => Input::Choose(Side::Left),
            "2" => Input::Choose(Side::Right),
            "" => Input::Continue,
            "r" | "restart" => Input::Restart,
            "q" | "quit" => Input::Quit,
            "y" | "yes" => Input::Yes,
            "n" | "no" => Input::No,
            _ => Input::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Lines from stdin, read on a plain thread so a pending read never holds up shutdown.
fn spawn_input_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(%err, "stopped reading input");
                    break;
                }
            }
        }
    });
    rx
}

struct Game {
    engine: SessionEngine,
    timer: RevealTimer,
    tickets: UnboundedSender<AdvanceTicket>,
}

impl Game {
    fn auto_advance(&self) -> bool {
        matches!(self.engine.settings().advance_mode(), AdvanceMode::Auto { .. })
    }

    fn show(&self) -> Result<()> {
        let view = self.engine.view()?;
        match view.phase {
            SessionPhase::AwaitingAnswer => println!("{}", render::question(&view)),
            SessionPhase::Revealing => {
                let summary = self.engine.answer_summary()?;
                println!("{}", render::reveal(&view, &summary, self.auto_advance()));
            }
            SessionPhase::Finished => {
                let results = ResultAggregator::from_engine(&self.engine)?;
                println!(
                    "{}",
                    render::results(results.score(), results.total(), &results.rows()?)
                );
                println!("Play again? [y/n]");
            }
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        self.timer.cancel();
        self.engine.restart();
        self.show()
    }

    fn handle(&mut self, line: &str) -> Result<Flow> {
        let input = Input::parse(line);
        debug!(?input, phase = %self.engine.phase(), "input");

        match (self.engine.phase(), input) {
            (_, Input::Quit) | (SessionPhase::Finished, Input::No) => return Ok(Flow::Quit),
            (_, Input::Restart) | (SessionPhase::Finished, Input::Yes | Input::Continue) => {
                self.restart()?;
            }
            (SessionPhase::AwaitingAnswer, Input::Choose(side)) => {
                let submission = self.engine.submit_side(side)?;
                if let (Some(ticket), AdvanceMode::Auto { delay }) =
                    (submission.ticket, self.engine.settings().advance_mode())
                {
                    self.timer.schedule(ticket, delay, self.tickets.clone());
                }
                self.show()?;
            }
            (SessionPhase::Revealing, Input::Continue) => {
                self.timer.cancel();
                self.engine.advance()?;
                self.show()?;
            }
            _ => println!("{}", render::hint(&self.engine.view()?)),
        }
        Ok(Flow::Continue)
    }

    fn on_ticket(&mut self, ticket: AdvanceTicket) -> Result<()> {
        if self.engine.advance_if_current(ticket)? {
            self.show()?;
        }
        Ok(())
    }
}

/// Run sessions until the player quits or input ends.
///
/// # Errors
///
/// Fails if the engine reports an error for a command the loop believed valid.
pub async fn run(engine: SessionEngine) -> Result<()> {
    let mut input = spawn_input_reader();
    let (tickets, mut due) = mpsc::unbounded_channel();
    let mut game = Game {
        engine,
        timer: RevealTimer::new(),
        tickets,
    };

    game.show().context("failed to render the first question")?;

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                if game.handle(&line)? == Flow::Quit {
                    break;
                }
            }
            Some(ticket) = due.recv() => game.on_ticket(ticket)?,
        }
    }

    game.timer.cancel();
    Ok(())
}
