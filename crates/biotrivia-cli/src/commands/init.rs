//! The `biotrivia init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create biotrivia.toml
    if std::path::Path::new("biotrivia.toml").exists() {
        println!("biotrivia.toml already exists, skipping.");
    } else {
        std::fs::write("biotrivia.toml", SAMPLE_CONFIG)?;
        println!("Created biotrivia.toml");
    }

    // Create example pools
    let pools_path = std::path::Path::new("pools.toml");
    if pools_path.exists() {
        println!("pools.toml already exists, skipping.");
    } else {
        std::fs::write(pools_path, EXAMPLE_POOLS)?;
        println!("Created pools.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit pools.toml with the people you want to be quizzed on");
    println!("  2. Run: biotrivia validate --pools pools.toml");
    println!("  3. Run: biotrivia play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# biotrivia configuration

pools = "pools.toml"
max_retries = 3
retry_delay_ms = 500
output_dir = "./biotrivia-runs"

[source]
type = "wikipedia"
base_url = "https://en.wikipedia.org"
# Fetch lead-section wikitext instead of rendered HTML
legacy = false
timeout_secs = 15

# Offline play from local files named "<Person>.html" or "<Person>.wiki":
# [source]
# type = "mock"
# articles_dir = "./articles"
"#;

const EXAMPLE_POOLS: &str = r#"# Candidates by difficulty.
# Levels 1-5 draw from easy, 6-10 from medium, 11 and up from hard.

[pools]
easy = [
    "Albert Einstein",
    "Marie Curie",
    "Isaac Newton",
    "William Shakespeare",
    "Leonardo da Vinci",
]
medium = [
    "Ada Lovelace",
    "Nikola Tesla",
    "Frida Kahlo",
    "Alan Turing",
    "Florence Nightingale",
]
hard = [
    "Emmy Noether",
    "Srinivasa Ramanujan",
    "Hypatia",
    "Ibn Battuta",
    "Lise Meitner",
]
"#;
