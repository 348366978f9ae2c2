use gemswap_core::{Cell, CollapseReport, GameEvent, PlayEngine, SoundCue};
use std::io::{self, Write};

/// Draws the board top row first, row numbers on the left and column numbers below.
pub fn board(out: &mut impl Write, engine: &PlayEngine) -> io::Result<()> {
    let grid = engine.grid();
    let (width, height) = grid.size();

    for y in (0..height).rev() {
        write!(out, "{y:>3} |")?;
        for x in 0..width {
            let glyph = match grid[(x, y)] {
                Cell::Empty => '.',
                Cell::Filled(symbol) => symbol.as_char(),
            };
            if engine.selected() == Some((x, y)) {
                write!(out, "[{glyph}]")?;
            } else {
                write!(out, " {glyph} ")?;
            }
        }
        writeln!(out)?;
    }

    write!(out, "    +")?;
    for _ in 0..width {
        write!(out, "---")?;
    }
    writeln!(out)?;
    write!(out, "     ")?;
    for x in 0..width {
        write!(out, "{x:^3}")?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Score: {}  Moves left: {}",
        engine.score(),
        engine.moves_left()
    )
}

pub fn event(event: &GameEvent) -> String {
    match event {
        GameEvent::Sound(cue) => match cue {
            SoundCue::Select => "*click*".to_string(),
            SoundCue::Deselect => "*unclick*".to_string(),
            SoundCue::Swap => "*swoosh*".to_string(),
            SoundCue::Clear => "*pop*".to_string(),
        },
        GameEvent::ScoreChanged { delta, total } => format!("+{delta} points ({total})"),
        GameEvent::MovesLeft(moves) => format!("{moves} moves left"),
        GameEvent::GameEnded { score } => format!("Game over, final score {score}"),
    }
}

/// Text form of the deltas of one collapse pass, in the order they happened.
pub fn collapse_steps(report: &CollapseReport) -> Vec<String> {
    let shifts = report.shifts.iter().map(|shift| {
        format!(
            "column {}: tile falls from row {} to row {}",
            shift.column, shift.from, shift.to
        )
    });
    let spawns = report.spawns.iter().map(|spawn| {
        format!(
            "column {}: new {} at row {}",
            spawn.coords.0, spawn.symbol, spawn.coords.1
        )
    });
    shifts.chain(spawns).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemswap_core::{BoardConfig, Grid, Symbol, TileShift, TileSpawn};

    #[test]
    fn board_marks_selection_and_labels_axes() {
        let grid: Grid = "ABC\nBCA\nCAB".parse().unwrap();
        let mut engine = PlayEngine::with_generator(BoardConfig::new((3, 3), 3), 0, grid).unwrap();
        engine.select((1, 0), &mut ()).unwrap();

        let mut out = Vec::new();
        board(&mut out, &engine).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "  2 | A  B  C ");
        assert_eq!(lines[2], "  0 | C [A] B ");
        assert_eq!(lines[4], "      0  1  2 ");
        assert_eq!(lines[5], "Score: 0  Moves left: 60");
    }

    #[test]
    fn collapse_steps_list_shifts_before_spawns() {
        let report = CollapseReport {
            shifts: vec![TileShift {
                column: 1,
                from: 3,
                to: 0,
            }],
            spawns: vec![TileSpawn {
                coords: (1, 3),
                symbol: Symbol(1),
            }],
            refilled_per_column: vec![0, 1],
        };

        assert_eq!(
            collapse_steps(&report),
            [
                "column 1: tile falls from row 3 to row 0",
                "column 1: new B at row 3"
            ]
        );
    }
}
