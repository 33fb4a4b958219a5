use std::collections::VecDeque;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use matchpoint_core::Interaction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a, T>
where
    T: FromStr,
    T::Err: Display,
{
    default: Option<T>,
    msg: &'a str,
}

impl<'a, T> Prompt<'a, T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { default: None, msg }
    }

    /// Sets the value returned for an empty input.
    #[inline]
    pub fn default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Reads a single line. Returns `Ok(None)` on end of input or if the input is invalid.
    pub fn read(self) -> io::Result<Option<T>> {
        let stdin = io::stdin();
        let stdout = io::stdout();

        self.read_from(&mut stdin.lock(), &mut stdout.lock())
    }

    pub fn read_from<R, W>(self, reader: &mut R, writer: &mut W) -> io::Result<Option<T>>
    where
        R: BufRead,
        W: Write,
    {
        writer.write_all(self.msg.as_bytes())?;
        if let Some(default) = &self.default {
            write!(writer, " [{}]", default)?;
        }
        writer.write_all(b" ")?;
        writer.flush()?;

        let mut string = String::new();
        if reader.read_line(&mut string)? == 0 {
            return Ok(None);
        }

        let input = string.trim();
        if input.is_empty() {
            if let Some(default) = self.default {
                return Ok(Some(default));
            }
        }

        match T::from_str(input) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                writeln!(writer, "Failed to parse input: {}", err)?;
                Ok(None)
            }
        }
    }
}

/// Asks the questions of a session on the terminal.
#[derive(Clone, Debug, Default)]
pub struct Terminal {
    /// Answer every confirmation with yes.
    pub assume_yes: bool,
    /// Answers to score questions, used before asking.
    pub scores: VecDeque<u32>,
}

impl Interaction for Terminal {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} yes", message);
            return true;
        }

        match Prompt::<String>::new(&format!("{} [y/N]", message)).read() {
            Ok(Some(answer)) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                log::warn!("Failed to read answer: {}", err);
                false
            }
        }
    }

    fn score(&mut self, message: &str, current: u32) -> Option<u32> {
        if let Some(score) = self.scores.pop_front() {
            println!("{} {}", message, score);
            return Some(score);
        }

        match Prompt::new(message).default(current).read() {
            Ok(score) => score,
            Err(err) => {
                log::warn!("Failed to read score: {}", err);
                None
            }
        }
    }
}
