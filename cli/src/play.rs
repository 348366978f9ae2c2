use anyhow::{Result, bail};
use gemswap_core::{Coord, Coord2, GameError, GameEvent, PlayEngine, SelectOutcome, SwapOutcome};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use crate::render;

/// Pause between replayed collapse steps.
const STEP_DELAY: Duration = Duration::from_millis(30);

const HELP: &str = "\
Commands:
  x y          click a cell (select, deselect, or swap with the selected neighbor)
  x1 y1 x2 y2  swap two neighboring cells
  help         show this text
  q, quit      leave the game
Row 0 is the bottom row.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Click(Coord2),
    Swap(Coord2, Coord2),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["q" | "quit"] => return Ok(Command::Quit),
        ["h" | "help" | "?"] => return Ok(Command::Help),
        _ => {}
    }

    let numbers = words
        .iter()
        .map(|word| word.parse::<Coord>())
        .collect::<Result<Vec<_>, _>>();
    match numbers.as_deref() {
        Ok(&[x, y]) => Ok(Command::Click((x, y))),
        Ok(&[x1, y1, x2, y2]) => Ok(Command::Swap((x1, y1), (x2, y2))),
        _ => bail!("Unrecognized command {:?}, type 'help' for the list", line.trim()),
    }
}

/// Collects event text while the engine handles one command.
#[derive(Default)]
struct StatusLines(Vec<String>);

impl gemswap_core::EventSink for StatusLines {
    fn emit(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.0.push(render::event(&event));
    }
}

fn replay(engine: &mut PlayEngine, outcome: &SwapOutcome, out: &mut impl Write) -> Result<()> {
    engine.begin_presentation();
    for report in &outcome.collapses {
        for step in render::collapse_steps(report) {
            writeln!(out, "  {step}")?;
            out.flush()?;
            thread::sleep(STEP_DELAY);
        }
    }
    engine.end_presentation();
    Ok(())
}

/// Reads commands from `input` until the moves run out, the player quits or
/// the input ends.
pub fn run(
    mut engine: PlayEngine,
    mut input: impl BufRead,
    mut out: impl Write,
    animate: bool,
) -> Result<()> {
    writeln!(out, "Type 'help' for the list of commands.")?;
    render::board(&mut out, &engine)?;

    let mut line = String::new();
    while !engine.is_finished() {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let mut status = StatusLines::default();
        let result = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Click(coords) => engine
                .select(coords, &mut status)
                .map(|outcome| match outcome {
                    SelectOutcome::Swapped(swap) => Some(swap),
                    _ => None,
                }),
            Command::Swap(a, b) => engine.swap(a, b, &mut status).map(Some),
        };

        match result {
            Ok(swap) => {
                for text in &status.0 {
                    writeln!(out, "{text}")?;
                }
                if let Some(swap) = swap {
                    if !swap.has_match() {
                        writeln!(out, "No match")?;
                    } else if animate {
                        replay(&mut engine, &swap, &mut out)?;
                    }
                }
                render::board(&mut out, &engine)?;
            }
            Err(GameError::AlreadyEnded) => break,
            Err(err @ (GameError::InvalidSwap(_) | GameError::OutOfBounds)) => {
                log::debug!("rejected: {}", err);
                writeln!(out, "{err}")?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    writeln!(out, "Final score: {}", engine.score())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemswap_core::{BoardConfig, Grid};

    const BOARD: &str = "DCDC
                         CDCD
                         CDAB
                         AABD";

    fn engine(moves: u32) -> PlayEngine {
        let grid: Grid = BOARD.parse().unwrap();
        PlayEngine::with_generator(BoardConfig::new((4, 4), 4).with_moves(moves), 3, grid).unwrap()
    }

    fn play(engine: PlayEngine, script: &str) -> String {
        let mut out = Vec::new();
        run(engine, script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("3 4\n").unwrap(), Command::Click((3, 4)));
        assert_eq!(
            parse_command(" 0 1  1 1").unwrap(),
            Command::Swap((0, 1), (1, 1))
        );
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert!(parse_command("1 2 3").is_err());
        assert!(parse_command("-1 2").is_err());
        assert!(parse_command("swap").is_err());
    }

    #[test]
    fn scripted_game_runs_out_of_moves() {
        let text = play(engine(1), "2 0\n2 1\n0 0\n");

        assert!(text.contains("*click*"));
        assert!(text.contains("+150 points (150)"));
        assert!(text.contains("Game over, final score 150"));
        assert!(text.trim_end().ends_with("Final score: 150"));
    }

    #[test]
    fn rejected_swaps_are_reported_and_play_goes_on() {
        let text = play(engine(5), "0 0 2 0\n9 9\nnonsense\n2 0 2 1\nq\n");

        assert!(text.contains("not adjacent"));
        assert!(text.contains("out of bounds"));
        assert!(text.contains("Unrecognized command"));
        assert!(text.contains("4 moves left"));
        assert!(text.trim_end().ends_with("Final score: 150"));
    }

    #[test]
    fn finished_session_only_prints_the_score() {
        let text = play(engine(0), "2 0 2 1\n");
        assert!(!text.contains("moves left"));
        assert!(text.trim_end().ends_with("Final score: 0"));
    }
}
