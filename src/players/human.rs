//! Interactive player reading decisions from a text stream

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::{
    Error, Result,
    dice::{ScoringOracle, StandardScoring},
    ports::Player,
    types::{Action, Decision},
};

/// Asks a person what to do after every scoring roll.
///
/// Accepts `s`/`stand`/`0` or `r`/`roll`/`1`. Rolling keeps every non-scoring die in
/// play.
pub struct HumanPlayer<R, W, S = StandardScoring> {
    name: String,
    input: R,
    output: W,
    oracle: S,
}

impl HumanPlayer<StdinLock<'static>, Stdout> {
    /// Player on the process's terminal.
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            oracle: StandardScoring,
        }
    }
}

impl<R: BufRead, W: Write, S: ScoringOracle> HumanPlayer<R, W, S> {
    pub fn with_oracle(name: impl Into<String>, input: R, output: W, oracle: S) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            oracle,
        }
    }

    fn prompt(&mut self, turn_score: u32, dice: &[u8], points: u32, leftover: &[u8]) -> Result<()> {
        writeln!(
            self.output,
            "Rolled {dice:?} for {points} points (turn so far: {turn_score}). Unused dice: {leftover:?}"
        )?;
        write!(self.output, "[s]tand or [r]oll? ")?;
        self.output.flush()?;
        Ok(())
    }

    fn read_action(&mut self) -> Result<Action> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|source| Error::Io {
            operation: "read decision".to_string(),
            source,
        })?;
        if read == 0 {
            return Err(Error::Io {
                operation: "read decision".to_string(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            });
        }
        line.parse()
    }
}

impl<R: BufRead, W: Write, S: ScoringOracle> Player for HumanPlayer<R, W, S> {
    fn decide(&mut self, turn_score: u32, dice: &[u8]) -> Result<Decision> {
        let scored = self.oracle.score(dice);
        self.prompt(turn_score, dice, scored.points, &scored.leftover)?;
        match self.read_action()? {
            Action::Stand => Ok(Decision::stand()),
            Action::Roll => Ok(Decision::roll(scored.leftover)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
