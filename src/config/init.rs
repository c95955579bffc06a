use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::scoring::{Criterion, WeightConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(12));
    }
    println!();
}

/// Parse a whole-number percentage in 0..=100.
pub fn parse_percent(input: &str) -> Result<u32, String> {
    let value: u32 = input
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input))?;
    if value > 100 {
        return Err(format!("{} is more than 100", value));
    }
    Ok(value)
}

/// Percentages must add up to exactly 100.
pub fn check_percent_total(entries: &[(Criterion, u32)]) -> Result<(), String> {
    let total: u32 = entries.iter().map(|(_, p)| p).sum();
    if total == 100 {
        Ok(())
    } else {
        Err(format!("weights total {}%, they must total 100%", total))
    }
}

/// Current weights as whole percentages, for use as prompt defaults
fn default_percentages(weights: &WeightConfig) -> Vec<(Criterion, u32)> {
    Criterion::ALL
        .into_iter()
        .map(|c| {
            let percent = weights.weight(c).unwrap_or(0.0) * 100.0;
            (c, percent.round().clamp(0.0, 100.0) as u32)
        })
        .collect()
}

/// Ask for all seven weights until they total 100%.
fn prompt_weights(current: &WeightConfig) -> Result<WeightConfig> {
    let defaults = default_percentages(current);
    loop {
        let mut entries = Vec::with_capacity(defaults.len());
        for (criterion, default) in &defaults {
            let percent = loop {
                let input = prompt_with_default(
                    &format!("  {} weight (%)", criterion.label()),
                    &default.to_string(),
                )?;
                match parse_percent(&input) {
                    Ok(p) => break p,
                    Err(e) => println!("  Invalid: {}. Try again.", e),
                }
            };
            entries.push((*criterion, percent));
        }

        match check_percent_total(&entries) {
            Ok(()) => return Ok(WeightConfig::from_percentages(&entries)),
            Err(e) => {
                println!("  {}. Let's go again.", e);
                println!();
            }
        }
    }
}

/// Run the interactive init wizard to create or update the config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path. Fields of
/// `existing` that the wizard does not ask about are kept.
pub fn run_init_wizard(default_path: Option<PathBuf>, existing: Config) -> Result<()> {
    println!();
    typewriter("Laptop Rank Configuration Wizard");
    println!("================================");
    println!();

    // 1. Owner
    let default_owner = existing
        .owner
        .clone()
        .unwrap_or_else(super::default_owner);
    typewriter("Laptops are stored per owner, so several people can share one catalog.");
    let owner = loop {
        let input = prompt_with_default("Owner name", &default_owner)?;
        if !input.is_empty() {
            break input;
        }
        println!("  Owner is required.");
    };

    // 2. Weights
    println!();
    typewriter("Each criterion gets a weight in percent. The seven weights must total 100.");
    typewriter("Price is a cost criterion (cheaper is better); everything else is a benefit (more is better).");
    let current = existing.weights.clone().unwrap_or_default();
    let weights = if prompt_yes_no("Configure weights? (n keeps the current ones)", true)? {
        prompt_weights(&current)?
    } else {
        current
    };

    // 3. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        owner: Some(owner),
        catalog: existing.catalog,
        weights: Some(weights),
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Add laptops with `laptop-rank add`, then run `laptop-rank` to see the ranking.");

    Ok(())
}
