//! Confirmation gate for destructive commands
//!
//! Answers are case-insensitive: `y`/`yes` confirm, `n`/`no`/empty or end
//! of input decline, anything else re-prompts.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::Result as CliResult;

pub const INVALID_INPUT: &str = "invalid input (not y, n, yes, or no)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingInput,
    Confirmed,
    Declined,
    Invalid,
}

impl GateState {
    /// State reached after reading one line; `None` is end of input
    pub fn after(line: Option<&str>) -> Self {
        let Some(line) = line else {
            return GateState::Declined;
        };
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => GateState::Confirmed,
            "" | "n" | "no" => GateState::Declined,
            _ => GateState::Invalid,
        }
    }
}

/// Prompt on `output` until `input` yields a yes or a no
pub fn confirm_with<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let mut state = GateState::AwaitingInput;

    loop {
        match state {
            GateState::AwaitingInput => {
                write!(output, "{} [yN]: ", prompt)?;
                output.flush()?;

                let mut line = String::new();
                let read = input.read_line(&mut line)?;
                if read == 0 {
                    writeln!(output)?;
                    state = GateState::after(None);
                } else {
                    state = GateState::after(Some(&line));
                }
            }
            GateState::Invalid => {
                writeln!(output, "{}", INVALID_INPUT)?;
                state = GateState::AwaitingInput;
            }
            GateState::Confirmed => return Ok(true),
            GateState::Declined => return Ok(false),
        }
    }
}

/// Ask on the terminal; `force` skips the prompt
pub fn confirm_action(prompt: &str, force: bool) -> CliResult<bool> {
    if force {
        debug!("Confirmation skipped (--force)");
        return Ok(true);
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    let confirmed = confirm_with(prompt, &mut stdin.lock(), &mut stdout.lock())?;
    debug!("Confirmation answered: {}", confirmed);
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (bool, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = confirm_with("Really delete the space old?", &mut reader, &mut out).unwrap();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_yes_variants_confirm() {
        for answer in ["y\n", "yes\n", "Y\n", "YES\n", "  yEs  \n"] {
            assert!(run(answer).0, "{answer:?} should confirm");
        }
    }

    #[test]
    fn test_no_variants_decline() {
        for answer in ["n\n", "no\n", "N\n", "No\n", "\n"] {
            assert!(!run(answer).0, "{answer:?} should decline");
        }
    }

    #[test]
    fn test_end_of_input_declines() {
        let (answer, out) = run("");
        assert!(!answer);
        assert_eq!(out, "Really delete the space old? [yN]: \n");
    }

    #[test]
    fn test_each_invalid_answer_reprompts_once() {
        let (answer, out) = run("maybe\nyep\nyes\n");
        assert!(answer);
        assert_eq!(out.matches(INVALID_INPUT).count(), 2);
        assert_eq!(out.matches("[yN]: ").count(), 3);
    }

    #[test]
    fn test_invalid_then_decline() {
        let (answer, out) = run("sure\nn\n");
        assert!(!answer);
        assert_eq!(out.matches(INVALID_INPUT).count(), 1);
    }

    #[test]
    fn test_force_skips_prompt() {
        assert!(confirm_action("never shown", true).unwrap());
    }

    #[test]
    fn test_gate_transitions() {
        assert_eq!(GateState::after(Some("yes")), GateState::Confirmed);
        assert_eq!(GateState::after(Some("")), GateState::Declined);
        assert_eq!(GateState::after(Some("yess")), GateState::Invalid);
        assert_eq!(GateState::after(None), GateState::Declined);
    }
}
