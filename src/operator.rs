//! Operator interaction for manual selection and re-download confirmation.

use std::io::{self, BufRead, Write};

/// Someone who can answer questions during a run.
pub trait Operator {
    /// Pick one of `options` (shown 1-indexed, with "0" meaning skip).
    /// Returns the 0-based index of the chosen option, `None` on skip.
    fn choose(&self, heading: &str, options: &[String]) -> Option<usize>;

    /// Yes/no question, defaulting to no.
    fn confirm(&self, question: &str) -> bool;
}

/// Why an answer to [`Operator::choose`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber(String),
    OutOfRange { value: usize, max: usize },
}

/// Validate a typed choice against `[0, len]`.  `Ok(None)` is the skip
/// option, `Ok(Some(i))` the 0-based index of the chosen option.
pub fn parse_choice(input: &str, len: usize) -> Result<Option<usize>, ChoiceError> {
    let trimmed = input.trim();
    let value: usize = trimmed
        .parse()
        .map_err(|_| ChoiceError::NotANumber(trimmed.to_string()))?;
    if value > len {
        return Err(ChoiceError::OutOfRange { value, max: len });
    }
    Ok(value.checked_sub(1))
}

/// Interactive operator on stdin/stdout.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl ConsoleOperator {
    fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl Operator for ConsoleOperator {
    fn choose(&self, heading: &str, options: &[String]) -> Option<usize> {
        println!("{}", heading);
        println!("0. Skip");
        for (i, option) in options.iter().enumerate() {
            println!("{}. {}", i + 1, option);
        }

        loop {
            // EOF counts as skip
            let line = self.read_line("Choose your number: ")?;
            match parse_choice(&line, options.len()) {
                Ok(choice) => return choice,
                Err(ChoiceError::NotANumber(s)) => println!("\"{}\" is not a number", s),
                Err(ChoiceError::OutOfRange { max, .. }) => {
                    println!("Choose a valid number between 0 and {}", max)
                }
            }
        }
    }

    fn confirm(&self, question: &str) -> bool {
        self.read_line(&format!("{} (y/N): ", question))
            .map(|answer| answer.trim().eq_ignore_ascii_case("y"))
            .unwrap_or(false)
    }
}
