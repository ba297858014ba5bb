//! The `biotrivia check` command.

use anyhow::Result;

use biotrivia_core::matcher::{base_name, letter_deficit, MAX_DEFICIT};

pub fn execute(guess: String, target: String) -> Result<()> {
    match letter_deficit(&guess, &target) {
        None => println!("rejected: nothing to compare"),
        Some(0) => println!("accepted: '{guess}' names {}", base_name(&target)),
        Some(d) if d <= MAX_DEFICIT => println!(
            "accepted: '{guess}' names {} (missing {d} letter)",
            base_name(&target)
        ),
        Some(d) => println!("rejected: missing {d} letters of {}", base_name(&target)),
    }
    Ok(())
}
