use std::io;

use dialoguer::Confirm;
use kubecreds::prompt::Prompter;

/// Asks on the terminal, defaulting to no.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .wait_for_newline(true)
            .interact()
    }
}
