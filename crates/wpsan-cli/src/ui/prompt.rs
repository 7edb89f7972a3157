//! Interactive confirmation prompts.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use wpsan_core::Prompter;

/// Asks yes/no questions over a line-oriented reader/writer pair.
///
/// Only `y` or `yes` (any case) confirm; anything else, including end of
/// input, declines.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the controlling terminal.
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Prompt over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Consume the prompt, returning the writer.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompt<R, W> {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{} {} ", question.bold(), "[y/n]".dark_grey())?;
            out.flush()?;
        }

        let mut answer = String::new();
        self.input.borrow_mut().read_line(&mut answer)?;
        let answer = answer.trim();

        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}
