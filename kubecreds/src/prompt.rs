use std::{collections::VecDeque, io};

/// Yes/no gate in front of every store write and every credential removal.
pub trait Prompter {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Gives the same answer to everything.
#[derive(Debug, Clone, Copy)]
pub struct Always(pub bool);

impl Prompter for Always {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Plays back a fixed list of answers and remembers what it was asked.
///
/// Running out of answers is an error, which the engines treat as "no".
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for Scripted {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("no answer for {prompt:?}"))
        })
    }
}
