//! Interactive single-choice and free-text prompts.
//!
//! Resolvers and identity providers never talk to the terminal directly; they
//! receive a `&mut dyn Prompter`. The CLI passes a [`StdioPrompter`] bound to
//! stdin/stderr, tests pass a [`test_helpers::ScriptedPrompter`].

use std::io::{BufRead, Write};

#[cfg(unix)]
use nix::sys::termios;
use tracing::{debug, warn};

use crate::errors::KconnectError;

/// Number of invalid answers accepted before a prompt gives up.
const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input closed before '{message}' was answered")]
    Closed { message: String },

    #[error("No options available for '{message}'")]
    NoOptions { message: String },

    #[error("No valid answer for '{message}' after {attempts} attempts")]
    TooManyAttempts { message: String, attempts: usize },

    #[error("Prompt IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl KconnectError for PromptError {
    fn error_code(&self) -> &'static str {
        match self {
            PromptError::Closed { .. } => "PROMPT_CLOSED",
            PromptError::NoOptions { .. } => "PROMPT_NO_OPTIONS",
            PromptError::TooManyAttempts { .. } => "PROMPT_TOO_MANY_ATTEMPTS",
            PromptError::Io { .. } => "PROMPT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            PromptError::Closed { .. } | PromptError::TooManyAttempts { .. }
        )
    }
}

/// Source of interactive answers.
pub trait Prompter {
    /// Ask the user to pick exactly one of `options`. Returns the chosen option.
    fn select(&mut self, message: &str, options: &[String]) -> Result<String, PromptError>;

    /// Ask for a free-text value. Empty answers are rejected.
    fn input(&mut self, message: &str) -> Result<String, PromptError>;

    /// Ask for a secret value.
    fn password(&mut self, message: &str) -> Result<String, PromptError> {
        self.input(message)
    }
}

/// Line-based prompter over any reader/writer pair.
pub struct StdioPrompter<R, W> {
    reader: R,
    writer: W,
    /// Turn terminal echo off while reading passwords.
    hide_secrets: bool,
}

impl StdioPrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompter bound to the process stdin, writing questions to stderr so
    /// stdout stays pipeable. Passwords are read without echo when stdin is
    /// a terminal.
    pub fn stdio() -> Self {
        Self {
            hide_secrets: true,
            ..Self::new(std::io::stdin().lock(), std::io::stderr())
        }
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            hide_secrets: false,
        }
    }

    fn read_answer(&mut self, message: &str) -> Result<String, PromptError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(PromptError::Closed {
                message: message.to_string(),
            });
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn select(&mut self, message: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions {
                message: message.to_string(),
            });
        }

        writeln!(self.writer, "{}", message)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", i + 1, option)?;
        }

        for _ in 0..MAX_ATTEMPTS {
            write!(self.writer, "Select [1-{}]: ", options.len())?;
            self.writer.flush()?;

            let answer = self.read_answer(message)?;
            if let Some(choice) = match_choice(&answer, options) {
                debug!(event = "core.prompt.selected", message = message, choice = %choice);
                return Ok(choice);
            }
            writeln!(self.writer, "Invalid choice '{}'", answer)?;
        }

        Err(PromptError::TooManyAttempts {
            message: message.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    fn input(&mut self, message: &str) -> Result<String, PromptError> {
        for _ in 0..MAX_ATTEMPTS {
            write!(self.writer, "{}: ", message)?;
            self.writer.flush()?;

            let answer = self.read_answer(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }

        Err(PromptError::TooManyAttempts {
            message: message.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    fn password(&mut self, message: &str) -> Result<String, PromptError> {
        let _guard = if self.hide_secrets {
            EchoGuard::disable()
        } else {
            None
        };
        self.input(message)
    }
}

/// Stdin echo switched off until dropped. Newlines are still echoed.
#[cfg(unix)]
struct EchoGuard {
    original: termios::Termios,
}

#[cfg(unix)]
impl EchoGuard {
    /// `None` when stdin is not a terminal.
    fn disable() -> Option<Self> {
        let stdin = std::io::stdin();
        let original = termios::tcgetattr(&stdin).ok()?;

        let mut silent = original.clone();
        silent.local_flags.remove(termios::LocalFlags::ECHO);
        silent.local_flags.insert(termios::LocalFlags::ECHONL);
        if let Err(e) = termios::tcsetattr(&stdin, termios::SetArg::TCSANOW, &silent) {
            warn!(event = "core.prompt.echo_disable_failed", error = %e);
            return None;
        }

        Some(Self { original })
    }
}

#[cfg(unix)]
impl Drop for EchoGuard {
    fn drop(&mut self) {
        let stdin = std::io::stdin();
        if let Err(e) = termios::tcsetattr(&stdin, termios::SetArg::TCSANOW, &self.original) {
            warn!(event = "core.prompt.echo_restore_failed", error = %e);
        }
    }
}

#[cfg(not(unix))]
struct EchoGuard;

#[cfg(not(unix))]
impl EchoGuard {
    fn disable() -> Option<Self> {
        None
    }
}

/// Accepts either a 1-based index or the exact option text.
fn match_choice(answer: &str, options: &[String]) -> Option<String> {
    if let Ok(index) = answer.parse::<usize>()
        && (1..=options.len()).contains(&index)
    {
        return Some(options[index - 1].clone());
    }
    options.iter().find(|o| o.as_str() == answer).cloned()
}

/// Test utilities for code that prompts.
#[doc(hidden)]
pub mod test_helpers {
    use std::collections::VecDeque;

    use super::{PromptError, Prompter};

    /// Prompter that answers from a fixed script and records every question.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, message: &str) -> Result<String, PromptError> {
            self.asked.push(message.to_string());
            self.answers.pop_front().ok_or_else(|| PromptError::Closed {
                message: message.to_string(),
            })
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, message: &str, options: &[String]) -> Result<String, PromptError> {
            let answer = self.next(message)?;
            if options.contains(&answer) {
                Ok(answer)
            } else {
                Err(PromptError::TooManyAttempts {
                    message: message.to_string(),
                    attempts: 1,
                })
            }
        }

        fn input(&mut self, message: &str) -> Result<String, PromptError> {
            self.next(message)
        }
    }
}
