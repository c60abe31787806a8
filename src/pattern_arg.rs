//! Command-line step rows: `kick=x...x...x...x...`.
//!
//! `x`, `X`, `*` and `1` mark a hit; `.`, `-`, `_` and `0` a rest. Rows shorter
//! than 16 cells repeat to fill the bar, so `hatClosed=x.` is straight eighths.

use std::str::FromStr;

use bl_ir::{StepGrid, UnknownVoice, VoiceId, STEPS};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternArgError {
    #[error("expected VOICE=CELLS, got `{0}`")]
    MissingEquals(String),
    #[error(transparent)]
    Voice(#[from] UnknownVoice),
    #[error("row for {voice} has no cells")]
    Empty { voice: VoiceId },
    #[error("row for {voice} has {len} cells, at most 16 allowed")]
    TooLong { voice: VoiceId, len: usize },
    #[error("unexpected cell `{cell}` in row for {voice}")]
    BadCell { voice: VoiceId, cell: char },
}

/// One voice's row of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowArg {
    pub voice: VoiceId,
    pub cells: [bool; STEPS],
}

impl RowArg {
    pub fn apply(&self, grid: &mut StepGrid) {
        for (step, on) in self.cells.iter().enumerate() {
            grid.set(self.voice, step, *on);
        }
    }
}

impl FromStr for RowArg {
    type Err = PatternArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (voice, cells) = s
            .split_once('=')
            .ok_or_else(|| PatternArgError::MissingEquals(s.to_string()))?;
        let voice: VoiceId = voice.trim().parse()?;

        let parsed = cells
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .map(|cell| match cell {
                'x' | 'X' | '*' | '1' => Ok(true),
                '.' | '-' | '_' | '0' => Ok(false),
                cell => Err(PatternArgError::BadCell { voice, cell }),
            })
            .collect::<Result<Vec<bool>, _>>()?;
        if parsed.is_empty() {
            return Err(PatternArgError::Empty { voice });
        }
        if parsed.len() > STEPS {
            return Err(PatternArgError::TooLong { voice, len: parsed.len() });
        }

        let mut row = [false; STEPS];
        for (step, cell) in row.iter_mut().enumerate() {
            *cell = parsed[step % parsed.len()];
        }
        Ok(Self { voice, cells: row })
    }
}

/// A whole pattern: comma-separated rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternArg {
    pub rows: Vec<RowArg>,
}

impl PatternArg {
    pub fn grid(&self) -> StepGrid {
        let mut grid = StepGrid::silent();
        for row in &self.rows {
            row.apply(&mut grid);
        }
        grid
    }
}

impl FromStr for PatternArg {
    type Err = PatternArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<RowArg>, _>>()?;
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_row() {
        let row: RowArg = "kick=x...x...x...x...".parse().unwrap();
        assert_eq!(row.voice, VoiceId::Kick);
        let hits: Vec<usize> = (0..STEPS).filter(|&s| row.cells[s]).collect();
        assert_eq!(hits, vec![0, 4, 8, 12]);
    }

    #[test]
    fn short_rows_repeat() {
        let row: RowArg = "hatClosed=x.".parse().unwrap();
        assert_eq!(row.cells.iter().filter(|c| **c).count(), 8);
        assert!(row.cells[14] && !row.cells[15]);
    }

    #[test]
    fn bar_separators_and_aliases() {
        let row: RowArg = "oh = ..x. | ..x. | ..x. | ..x.".parse().unwrap();
        assert_eq!(row.voice, VoiceId::OpenHat);
        assert!(row.cells[2] && row.cells[14]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!("kick".parse::<RowArg>(), Err(PatternArgError::MissingEquals(_))));
        assert!(matches!("cowbell=x".parse::<RowArg>(), Err(PatternArgError::Voice(_))));
        assert!(matches!("kick=".parse::<RowArg>(), Err(PatternArgError::Empty { .. })));
        assert!(matches!(
            "kick=x...x...x...x...x".parse::<RowArg>(),
            Err(PatternArgError::TooLong { len: 17, .. })
        ));
        assert!(matches!(
            "kick=x?".parse::<RowArg>(),
            Err(PatternArgError::BadCell { cell: '?', .. })
        ));
    }

    #[test]
    fn pattern_combines_rows() {
        let pattern: PatternArg = "kick=x...,snare=....x...".parse().unwrap();
        let grid = pattern.grid();
        assert!(grid.get(VoiceId::Kick, 4));
        assert!(grid.get(VoiceId::Snare, 4));
        assert!(!grid.get(VoiceId::Snare, 0));
        assert_eq!(grid.active_count(), 6);
    }
}
