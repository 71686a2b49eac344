use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greenledger_finance::{
    budget_emissions, categorize_all, compute_emissions, summarize, write_transactions_csv,
    EmissionMode, RuleSet,
};
use greenledger_ingest::{extract_concurrent, Document, ParseStrategy, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "greenledger",
    version,
    about = "Bank statement ledger extraction, spend categories and emissions"
)]
struct Cli {
    /// Config file (default: ~/.greenledger/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the configured parse strategies (repeatable, tried in order)
    #[arg(long = "strategy", global = true)]
    strategies: Vec<ParseStrategy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spend summary by category for a statement
    Classify { file: PathBuf },

    /// Print the extracted ledger as JSON
    Transactions { file: PathBuf },

    /// Write the categorized ledger as CSV
    Export {
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Statement year; writes ISO dates
        #[arg(long)]
        year: Option<i32>,
    },

    /// Estimated kg CO2e of a statement's spend
    Emissions {
        file: PathBuf,

        /// min | mid | max (default: from config)
        #[arg(long)]
        mode: Option<EmissionMode>,
    },

    /// Monthly budget from config, in dollars and kg CO2e
    Budget {
        #[arg(long)]
        mode: Option<EmissionMode>,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file
    Init,
    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    statement_id: &'a str,
    summary: &'a BTreeMap<String, BTreeMap<String, Decimal>>,
    uncategorized: Decimal,
    transactions_count: usize,
}

#[derive(Serialize)]
struct BudgetOutput {
    mode: EmissionMode,
    monthly_income: u32,
    allocation: BTreeMap<String, Decimal>,
    emissions_kg: BTreeMap<String, Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let settings = || -> Result<Config> {
        let mut cfg = config::load_config(config_path)?;
        if !cli.strategies.is_empty() {
            cfg.parser.strategies = cli.strategies.clone();
        }
        Ok(cfg)
    };
    let rules = RuleSet::standard();

    match cli.command {
        Command::Classify { file } => {
            let (document, txns) = load_ledger(&settings()?, &file).await?;
            let summary = summarize(rules, &txns);
            print_json(&ClassifyOutput {
                statement_id: document.statement_id(),
                summary: &summary.summary,
                uncategorized: summary.uncategorized_total,
                transactions_count: txns.len(),
            })?;
        }

        Command::Transactions { file } => {
            let (_, txns) = load_ledger(&settings()?, &file).await?;
            print_json(&txns)?;
        }

        Command::Export { file, out, year } => {
            let (_, txns) = load_ledger(&settings()?, &file).await?;
            let rows = categorize_all(rules, txns);
            match out {
                Some(path) => {
                    let f = File::create(&path)
                        .with_context(|| format!("create {}", path.display()))?;
                    write_transactions_csv(f, &rows, year)?;
                    eprintln!("Wrote {} rows to {}", rows.len(), path.display());
                }
                None => write_transactions_csv(io::stdout().lock(), &rows, year)?,
            }
        }

        Command::Emissions { file, mode } => {
            let cfg = settings()?;
            let (document, txns) = load_ledger(&cfg, &file).await?;
            let mut report =
                compute_emissions(&summarize(rules, &txns), mode.unwrap_or(cfg.emissions.mode));
            report.statement_id = Some(document.statement_id().to_string());
            print_json(&report)?;
        }

        Command::Budget { mode } => {
            let cfg = settings()?;
            let mode = mode.unwrap_or(cfg.emissions.mode);
            let allocation = budget_allocation(&cfg);
            let emissions_kg = budget_emissions(&allocation, mode);
            print_json(&BudgetOutput {
                mode,
                monthly_income: cfg.budget.monthly_income,
                allocation,
                emissions_kg,
            })?;
        }

        Command::Config { command } => run_config(config_path, command)?,
    }

    Ok(())
}

fn run_config(path: Option<&Path>, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => config::init_config(path),
        ConfigCommand::Show => {
            let cfg = config::load_config(path)?;
            print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn load_ledger(cfg: &Config, file: &Path) -> Result<(Document, Vec<Transaction>)> {
    let document = Document::load(file).with_context(|| format!("reading {}", file.display()))?;
    let extractor = Arc::new(cfg.extractor()?);
    let txns = extract_concurrent(extractor, document.pages().to_vec())
        .await
        .with_context(|| format!("extracting {}", file.display()))?;

    info!(
        statement_id = document.statement_id(),
        pages = document.page_count(),
        transactions = txns.len(),
        "extracted ledger"
    );
    Ok((document, txns))
}

fn budget_allocation(cfg: &Config) -> BTreeMap<String, Decimal> {
    let income = Decimal::from(cfg.budget.monthly_income);
    cfg.budget
        .percentages
        .iter()
        .map(|(category, pct)| {
            let dollars = income * Decimal::from(*pct) / Decimal::ONE_HUNDRED;
            (category.clone(), dollars)
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write json")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_allocation_splits_income() {
        let alloc = budget_allocation(&Config::default());
        assert_eq!(alloc["Housing"], Decimal::from(1500));
        assert_eq!(alloc["Charity"], Decimal::from(150));
        assert_eq!(alloc.values().sum::<Decimal>(), Decimal::from(5000));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "greenledger",
            "emissions",
            "stmt.pdf",
            "--mode",
            "max",
            "--strategy",
            "legacy-whitespace-split",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.strategies, [ParseStrategy::LegacyWhitespaceSplit]);
        match cli.command {
            Command::Emissions { mode, .. } => assert_eq!(mode, Some(EmissionMode::Max)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_commands_use_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cli = Cli::try_parse_from([
            "greenledger",
            "config",
            "init",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();

        let Command::Config { command } = cli.command else {
            panic!("expected config command");
        };
        run_config(cli.config.as_deref(), command).unwrap();
        assert!(path.exists());
        run_config(Some(path.as_path()), ConfigCommand::Show).unwrap();
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["greenledger", "budget", "--mode", "huge"]).is_err());
    }

    #[tokio::test]
    async fn test_load_ledger_from_text_statement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.txt");
        std::fs::write(
            &path,
            "06/16 Uber Trip -11.94 988.06\nATM & Debit Card Withdrawals\n\x0c06/17 Whole Foods Market -45.00 943.06\n",
        )
        .unwrap();

        let (document, txns) = load_ledger(&Config::default(), &path).await.unwrap();
        assert_eq!(document.page_count(), 2);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].description, "Whole Foods Market");
    }
}
