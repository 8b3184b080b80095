//! Interactive input for the authorization code.

use std::io::{self, BufRead, Write};

use agenda_core::AuthError;

/// Source of operator input during interactive authorization.
pub trait Prompt {
    /// Show `message` and block until one line of input is available.
    fn ask(&mut self, message: &str) -> Result<String, AuthError>;
}

/// Reads from standard input, writing the message to standard output.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> Result<String, AuthError> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", message).map_err(|e| AuthError::Prompt(e.to_string()))?;
        stdout.flush().map_err(|e| AuthError::Prompt(e.to_string()))?;
        drop(stdout);

        read_answer(io::stdin().lock())
    }
}

fn read_answer(mut input: impl BufRead) -> Result<String, AuthError> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| AuthError::Prompt(e.to_string()))?;

    if read == 0 {
        return Err(AuthError::Prompt("standard input closed".to_string()));
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_reads_single_line() {
        let answer = read_answer("4/0Abc\nleftover\n".as_bytes()).unwrap();
        assert_eq!(answer, "4/0Abc\n");
    }

    #[test]
    fn test_closed_input() {
        assert!(matches!(read_answer("".as_bytes()), Err(AuthError::Prompt(_))));
    }
}
