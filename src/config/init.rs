use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{ensure_config_dir, get_config_path, Config};
use crate::pricing::{validate_pricing, PricingConfig};

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

/// Parse a percentage into a fraction. Whole numbers and anything ending in
/// '%' are percents ("1" and "1%" are both 0.01); a decimal of at most 1
/// is already a fraction ("0.05"), a larger one is a percent ("12.5").
fn parse_percent(input: &str) -> Option<f64> {
    let input = input.trim();
    let number = input.trim_end_matches('%').trim();
    let value: f64 = number.parse().ok()?;
    let is_percent = input.ends_with('%') || !number.contains('.') || value > 1.0;
    let fraction = if is_percent { value / 100.0 } else { value };
    (0.0..=1.0).contains(&fraction).then_some(fraction)
}

fn prompt_percent(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(
            &format!("{} (percent, e.g. 5 or 2.5%)", message),
            &format!("{}%", default * 100.0),
        )?;
        match parse_percent(&input) {
            Some(v) => return Ok(v),
            None => println!("  Invalid: enter a percentage between 0 and 100. Try again."),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// Tier tables always start from the built-in defaults; edit the YAML to
/// change them. With `force`, an existing file is replaced without asking.
pub fn run_init_wizard(default_path: Option<PathBuf>, force: bool) -> Result<()> {
    println!();
    println!("Cost Segregation Quote Configuration");
    println!("====================================");
    println!();

    let defaults = PricingConfig::default();

    println!("Premium service adds a percentage on top of the quoted fee.");
    let premium_uplift_pct = prompt_percent("Premium uplift", defaults.premium_uplift_pct)?;

    println!();
    println!("Referred clients receive a percentage off the quoted fee.");
    let referral_pct = prompt_percent("Referral discount", defaults.referral_pct)?;

    println!();
    println!("Manual price overrides must name an approver from this list.");
    let approvers = prompt("Override approvers (comma-separated, blank for none): ")?;
    let override_approvers: Vec<String> = approvers
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let pricing = PricingConfig {
        premium_uplift_pct,
        referral_pct,
        override_approvers,
        ..defaults
    };

    let path = match default_path {
        Some(p) => p,
        None => PathBuf::from(prompt_with_default(
            "Config file path",
            &get_config_path().display().to_string(),
        )?),
    };

    if path.exists()
        && !force
        && !prompt_yes_no(&format!("{} exists. Overwrite?", path.display()), false)?
    {
        println!("Aborted; existing config left unchanged.");
        return Ok(());
    }

    write_config(&path, &Config { pricing: Some(pricing) })?;
    println!();
    println!("Config written to {}", path.display());
    Ok(())
}

/// Validate and write a config file atomically.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Err(errors) = validate_pricing(&config.effective_pricing()) {
        anyhow::bail!("Refusing to write invalid config:\n  - {}", errors.join("\n  - "));
    }

    if path.starts_with(crate::config::get_config_dir()) {
        ensure_config_dir()?;
    }

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
