//! The `biotrivia normalize` and `biotrivia sections` commands.

use std::path::PathBuf;

use anyhow::Result;

use biotrivia_core::model::RawMarkup;
use biotrivia_core::{normalize_markup, to_sections};

use super::read_input;

pub fn execute(file: Option<PathBuf>, legacy: bool) -> Result<()> {
    let input = read_input(file.as_deref())?;
    let raw = if legacy {
        RawMarkup::Legacy(input)
    } else {
        RawMarkup::Structural(input)
    };
    println!("{}", normalize_markup(&raw));
    Ok(())
}

pub fn execute_sections(file: Option<PathBuf>) -> Result<()> {
    let input = read_input(file.as_deref())?;
    let sections = to_sections(&input);
    if sections.is_empty() {
        eprintln!("No sections found.");
        return Ok(());
    }
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("## {}", section.heading);
        println!("{}", section.body);
    }
    Ok(())
}
