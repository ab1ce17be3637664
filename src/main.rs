use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seg_quote::config::{get_config_path, load_config, run_init_wizard, write_config, Config};
use seg_quote::output;
use seg_quote::pricing::{compute_quote, validate_pricing, PricingConfig, Quote, RateCard};
use seg_quote::property::{load_request, PropertyInputs, QuoteRequest};
use seg_quote::QuoteError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_UNAUTHORIZED: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
}

/// Property attributes given directly on the command line
#[derive(Args, Debug, Default, Clone)]
#[group(id = "attributes", multiple = true)]
struct PropertyArgs {
    /// Purchase price in dollars
    #[arg(long)]
    purchase_price: Option<f64>,

    /// Land value: dollars with --known-land-value, otherwise a percentage of the price
    #[arg(long)]
    land_value: Option<f64>,

    /// Treat --land-value as a dollar amount
    #[arg(long)]
    known_land_value: bool,

    /// Capital expenditures added to the cost basis
    #[arg(long)]
    capex: Option<f64>,

    /// Building square footage
    #[arg(long)]
    sqft: Option<f64>,

    /// Land area in acres
    #[arg(long)]
    acres: Option<f64>,

    /// Property type, e.g. "Multi-Family", "Warehouse", "Short-Term Rental"
    #[arg(long)]
    property_type: Option<String>,

    #[arg(long)]
    floors: Option<i64>,

    /// Number of properties in the engagement
    #[arg(long)]
    num_properties: Option<i64>,

    /// 5-digit zip code (ZIP+4 accepted); optional
    #[arg(long)]
    zip: Option<String>,

    /// Rush delivery: "none", "4-week" or "2-week"
    #[arg(long)]
    rush: Option<String>,

    /// Apply the premium service uplift
    #[arg(long)]
    premium: bool,

    /// Apply the referral discount
    #[arg(long)]
    referral: bool,

    /// Replace the computed fee with this amount (requires --approver)
    #[arg(long)]
    price_override: Option<f64>,

    /// Name of the person authorizing --price-override
    #[arg(long)]
    approver: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
struct QuoteArgs {
    #[command(flatten)]
    property: PropertyArgs,

    /// Read the request from a file (JSON if it ends in .json, YAML otherwise)
    #[arg(long, conflicts_with = "attributes")]
    input: Option<PathBuf>,

    /// Quote date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the quote as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price one engagement (default if no subcommand)
    Quote(QuoteArgs),
    /// Create a config file
    Init {
        /// Overwrite an existing config file without asking
        #[arg(long)]
        force: bool,

        /// Write the built-in rate card without prompting
        #[arg(long)]
        defaults: bool,
    },
    /// Show the tier tables of the effective rate card
    Tiers,
}

#[derive(Parser, Debug)]
#[command(name = "seg-quote")]
#[command(about = "Cost segregation study fee quotes", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/seg-quote/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(flatten)]
    quote: QuoteArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let command = cli.command.unwrap_or(Commands::Quote(cli.quote));

    if let Commands::Init { force, defaults } = command {
        let result = if defaults {
            write_default_config(config_path, force)
        } else {
            run_init_wizard(config_path, force)
        };
        if let Err(e) = result {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate pricing config at startup
    let effective_pricing = config.effective_pricing();
    if let Err(errors) = validate_pricing(&effective_pricing) {
        eprintln!("Pricing config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let card = match RateCard::from_config(&effective_pricing) {
        Ok(card) => card,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    match command {
        Commands::Tiers => {
            println!(
                "{}",
                output::format_tiers(&card, output::should_use_colors())
            );
        }
        Commands::Quote(args) => run_quote(&args, &card),
        Commands::Init { .. } => unreachable!("init handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Logs go to stderr; stdout carries only the quote.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "seg_quote=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_quote(args: &QuoteArgs, card: &RateCard) {
    let request = match &args.input {
        Some(path) => load_request(path),
        None => request_from_flags(&args.property),
    };
    let request = match request {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid input: {:#}", e);
            std::process::exit(EXIT_INVALID_INPUT);
        }
    };

    let today = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let quote = match PropertyInputs::try_from(request)
        .and_then(|inputs| compute_quote(&inputs, card, today))
    {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(exit_code(&e));
        }
    };

    let rendered = match args.format {
        OutputFormat::Table => output::format_quote(&quote, output::should_use_colors()),
        OutputFormat::Tsv => output::format_tsv(&quote),
        OutputFormat::Json => match serde_json::to_string_pretty(&quote) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize quote: {}", e);
                std::process::exit(EXIT_INVALID_INPUT);
            }
        },
    };
    println!("{}", rendered);

    if let Some(path) = &args.output {
        if let Err(e) = save_quote(path, &quote) {
            eprintln!("Failed to write quote: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn exit_code(err: &QuoteError) -> i32 {
    match err {
        QuoteError::InvalidInput { .. } => EXIT_INVALID_INPUT,
        QuoteError::UnauthorizedOverride { .. } => EXIT_UNAUTHORIZED,
    }
}

fn request_from_flags(args: &PropertyArgs) -> Result<QuoteRequest> {
    let purchase_price = args
        .purchase_price
        .context("--purchase-price is required unless --input is given")?;
    let land_value = args
        .land_value
        .context("--land-value is required unless --input is given")?;
    let property_type = args
        .property_type
        .clone()
        .context("--property-type is required unless --input is given")?;

    Ok(QuoteRequest {
        purchase_price,
        land_value,
        known_land_value: args.known_land_value,
        capex: args.capex.unwrap_or(0.0),
        sqft_building: args.sqft.unwrap_or(0.0),
        acres_land: args.acres.unwrap_or(0.0),
        property_type,
        floors: args.floors.unwrap_or(1),
        num_properties: args.num_properties.unwrap_or(1),
        zip_code: args.zip.clone(),
        rush: args.rush.clone(),
        premium: args.premium,
        referral: args.referral,
        price_override: args.price_override,
        override_approver: args.approver.clone(),
    })
}

fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(get_config_path);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to replace it)", path.display());
    }
    write_config(
        &path,
        &Config {
            pricing: Some(PricingConfig::default()),
        },
    )?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn save_quote(path: &Path, quote: &Quote) -> Result<()> {
    let json = serde_json::to_string_pretty(quote).context("Failed to serialize quote")?;
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(json.as_bytes())
        .context("Failed to write quote")?;
    file.commit().context("Failed to save quote")?;
    Ok(())
}
