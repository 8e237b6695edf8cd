//! # calc_cli - Everyday Calculator CLI
//!
//! Command-line front end for `calc_core`: unit and currency conversion,
//! favorites, the keypad calculator, and the BMI / loan / percentage / tax
//! calculators. Every command prints a human-readable summary, or the
//! underlying result as JSON with `--json`.
//!
//! ```text
//! calc_cli convert weight 70 kg lb
//! calc_cli currency convert 100 usd thb
//! calc_cli calc "5++3="
//! calc_cli --json tax --income 460000
//! ```

mod interactive;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calc_core::calculations::{
    bmi, loan, percentage, tax, BmiInput, CalculationItem, LoanInput, PercentageInput, TaxInput,
    TermUnit,
};
use calc_core::conversion::{conversion_table, convert_form, UnitConversionInput};
use calc_core::currency::{CurrencyCode, CurrencySession, HttpRateProvider, SUPPORTED_CURRENCIES};
use calc_core::{AppConfig, CalcError, Calculator, UnitCategory};

use output::Output;

/// Unit, currency and everyday-finance calculator
#[derive(Parser, Debug)]
#[command(name = "calc_cli")]
#[command(version)]
#[command(about = "Unit converters, live currency rates and everyday calculators", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a value between units of one category
    Convert {
        /// weight, length, volume or area
        category: String,
        value: f64,
        from: String,
        to: String,
    },

    /// List the units of a category
    Units {
        category: String,
        /// Print the full conversion factor table
        #[arg(long)]
        table: bool,
    },

    /// Live currency conversion
    Currency {
        #[command(subcommand)]
        action: CurrencyCommands,
    },

    /// Manage favorite currency pairs
    Favorites {
        #[command(subcommand)]
        action: FavoriteCommands,
    },

    /// Keypad calculator; interactive when no keys are given
    Calc {
        /// Keys to press, e.g. "12*3=" (`<` is backspace, `c` clears)
        keys: Option<String>,
    },

    /// Body mass index
    Bmi {
        #[arg(long)]
        weight: Option<f64>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
    },

    /// Simple-interest loan repayments
    Loan {
        #[arg(long)]
        principal: Option<f64>,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        term: Option<f64>,
        /// months or years
        #[arg(long, default_value = "months")]
        unit: String,
    },

    /// Part as a percentage of a whole
    Percent {
        #[arg(long)]
        whole: Option<f64>,
        #[arg(long)]
        part: Option<f64>,
    },

    /// Personal income tax
    Tax {
        #[arg(long)]
        income: Option<f64>,
        #[arg(long)]
        deductions: Option<f64>,
        #[arg(long)]
        allowances: Option<f64>,
    },

    /// Evaluate a JSON file holding one calculation or a list of them
    Run { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum CurrencyCommands {
    /// Convert an amount; the pair defaults to the last one used
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },

    /// List supported currencies
    List,

    /// Interactive converter with debounced rate fetches
    Session,
}

#[derive(Subcommand, Debug)]
enum FavoriteCommands {
    /// Show favorite pairs
    List {
        /// Show every favorite instead of the display limit
        #[arg(long)]
        all: bool,
    },
    /// Add a pair
    Add { from: String, to: String },
    /// Toggle the pinned flag of a pair
    Pin { from: String, to: String },
    /// Remove every favorite
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = Output::new(cli.json);
    if let Err(e) = run(cli, &out).await {
        out.error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, out: &Output) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Convert {
            category,
            value,
            from,
            to,
        } => {
            let input = UnitConversionInput {
                category: UnitCategory::from_str_flexible(&category)?,
                value: Some(value),
                from,
                to,
            };
            out.conversion(&convert_form(&input)?, value, config.display.language)
        }
        Commands::Units { category, table } => {
            let category = UnitCategory::from_str_flexible(&category)?;
            if table {
                out.conversion_table(&conversion_table(category))
            } else {
                out.units(category, config.display.language)
            }
        }
        Commands::Currency { action } => run_currency(action, &config, out).await,
        Commands::Favorites { action } => run_favorites(action, &config, out),
        Commands::Calc { keys } => match keys {
            Some(keys) => {
                let mut calc = Calculator::new();
                let outcomes = calc.press_sequence(&keys)?;
                out.calculator(&calc, &outcomes)
            }
            None => interactive::calculator(out).await,
        },
        Commands::Bmi { weight, height } => {
            let input = BmiInput {
                weight_kg: weight,
                height_cm: height,
            };
            out.bmi(&bmi::calculate(&input))
        }
        Commands::Loan {
            principal,
            rate,
            term,
            unit,
        } => {
            let term_unit = TermUnit::from_str_flexible(&unit)
                .ok_or_else(|| CalcError::invalid_input("unit", unit.as_str(), "Expected months or years"))?;
            let input = LoanInput {
                principal,
                annual_rate_pct: rate,
                term,
                term_unit,
            };
            out.loan(&loan::calculate(&input))
        }
        Commands::Percent { whole, part } => {
            out.percentage(&percentage::calculate(&PercentageInput { whole, part }))
        }
        Commands::Tax {
            income,
            deductions,
            allowances,
        } => {
            let input = TaxInput {
                income,
                deductions,
                allowances,
            };
            out.tax(&tax::calculate(&input))
        }
        Commands::Run { file } => run_file(&file, out),
    }
}

async fn run_currency(action: CurrencyCommands, config: &AppConfig, out: &Output) -> Result<()> {
    match action {
        CurrencyCommands::List => out.currencies(SUPPORTED_CURRENCIES, config.display.language),
        CurrencyCommands::Convert { amount, from, to } => {
            let session = open_session(config)?;
            let current = session.state();
            let from = match from {
                Some(code) => CurrencyCode::parse(&code)?,
                None => current.from,
            };
            let to = match to {
                Some(code) => CurrencyCode::parse(&code)?,
                None => current.to,
            };
            // One-shot: fetch straight away rather than after the debounce window
            if session.select_pair(from, to).is_some() {
                session.cancel_pending();
            }
            session.set_amount(amount);
            session.refresh_now().await;

            let state = session.state();
            out.currency_state(&state, &session.drain_notices())?;
            // The state only carries a rate fetched or cached for this pair
            if state.rate.is_none() {
                anyhow::bail!("No exchange rate available for {} > {}", state.from, state.to);
            }
            Ok(())
        }
        CurrencyCommands::Session => {
            let session = open_session(config)?;
            session.refresh_now().await;
            interactive::currency(session, config.display.favorites_limit, out).await
        }
    }
}

fn run_favorites(action: FavoriteCommands, config: &AppConfig, out: &Output) -> Result<()> {
    let session = open_session(config)?;
    match action {
        FavoriteCommands::List { all } => {
            let favorites = session.favorites();
            let limit = if all {
                favorites.len()
            } else {
                config.display.favorites_limit
            };
            return out.favorites(&favorites, limit);
        }
        FavoriteCommands::Add { from, to } => {
            session.add_favorite(CurrencyCode::parse(&from)?, CurrencyCode::parse(&to)?);
        }
        FavoriteCommands::Pin { from, to } => {
            let (from, to) = (CurrencyCode::parse(&from)?, CurrencyCode::parse(&to)?);
            if !session.favorites().contains(from, to) {
                anyhow::bail!("{} > {} is not a favorite", from, to);
            }
            session.toggle_pin(from, to);
        }
        FavoriteCommands::Clear => session.clear_favorites(),
    }
    out.notices(&session.drain_notices())?;
    out.favorites(&session.favorites(), config.display.favorites_limit)
}

fn open_session(config: &AppConfig) -> Result<CurrencySession<HttpRateProvider>> {
    let store = config.open_store().context("Failed to open the settings store")?;
    debug!(path = %store.path().display(), "settings store opened");
    let provider = config.rate_provider()?;
    Ok(CurrencySession::new(provider, Some(store), config.session_config()))
}

fn run_file(path: &std::path::Path, out: &Output) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let items: Vec<CalculationItem> = match serde_json::from_str::<Vec<CalculationItem>>(&content) {
        Ok(items) => items,
        Err(_) => vec![serde_json::from_str(&content)
            .map_err(|e| CalcError::serialization(format!("Invalid calculation file: {}", e)))?],
    };

    let results = items
        .iter()
        .map(|item| item.evaluate().map(|output| (item.calc_type(), output)))
        .collect::<Result<Vec<_>, CalcError>>()?;

    out.calculation_outputs(&results)
}
