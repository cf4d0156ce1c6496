//! Interactive operator backed by dialoguer.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, MultiSelect};

use crate::core::reconcile::{Choice, Operator};
use crate::error::{Error, Result};

/// Answer taken when the operator just presses enter. Writing is opt-in.
const APPLY_BY_DEFAULT: bool = false;

/// Prompts on the terminal. Every change starts checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct Prompt;

fn ensure_terminal() -> Result<()> {
    if io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(Error::NonInteractive)
    }
}

impl Operator for Prompt {
    fn select(&self, choices: &[Choice]) -> Result<Vec<String>> {
        ensure_terminal()?;

        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        let defaults = vec![true; labels.len()];

        let picked = MultiSelect::new()
            .with_prompt("Select changes to apply (space toggles, enter confirms)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        Ok(picked
            .into_iter()
            .filter_map(|i| choices.get(i))
            .map(|c| c.key.clone())
            .collect())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        ensure_terminal()?;

        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(APPLY_BY_DEFAULT)
            .interact()?)
    }
}
