#![deny(warnings)]

//! Headless ReCal front end: locker and cigar calculators plus the startup
//! collaborators (integrity check, update check, terms gate).

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use recal_engine::{
    CigarBatchResult, CigarBatchSize, CigarCalculationResult, CigarProductionCalculator,
    CraftingResult, LockerMaterialCalculator, ProfitCalculation,
};
use recal_host::present::{format_currency, format_hours, format_percent};
use recal_host::settings::DEFAULT_SETTINGS_FILE;
use recal_host::{input, HostSettings, TermsOutcome, TipRotator, TERMS_REQUIRED_MESSAGE};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use updater::{GitHubRelease, Updater};

#[derive(Parser, Debug)]
#[command(name = "recal", version, about = "Crafting cost and material calculator")]
struct Cli {
    /// Settings file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Do not check for updates on startup.
    #[arg(long, global = true)]
    skip_update: bool,
    /// Accept the terms of service without prompting.
    #[arg(long, global = true)]
    accept_terms: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Materials and costs for wall lockers (1-1000).
    Lockers {
        count: String,
        /// Market price per locker; adds the four pricing strategies.
        #[arg(long)]
        market_price: Option<Decimal>,
    },
    /// Revenue, production time and inputs for cigars (1-10000).
    Cigars { count: String },
    /// Cigar batch preset: ten, hundred or hourly.
    Batch { size: CigarBatchSize },
    /// Run the integrity check against a directory (default: app directory).
    Verify { dir: Option<PathBuf> },
    /// Check for a newer release now.
    CheckUpdate {
        /// Download and launch the installer when an update exists.
        #[arg(long)]
        install: bool,
    },
    /// Show a dashboard tip.
    Tip,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn prompt_terms() -> bool {
    print!("Do you accept the Terms of Service? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            warn!(error = %e, "could not read terms answer");
            false
        }
    }
}

fn update_notice(release: &GitHubRelease, repository: &str) -> String {
    format!(
        "A new version ({}) is available!\n\nSource: {}\nRelease Notes:\n{}\n",
        release.tag_name,
        repository,
        release.body.as_deref().unwrap_or("")
    )
}

fn startup_update_check(settings: &HostSettings) {
    let updater = match Updater::github(settings.update.clone()) {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "update check unavailable");
            return;
        }
    };
    if let Some(release) = updater.check_or_skip() {
        eprintln!(
            "{}Run `recal check-update --install` to install it.",
            update_notice(&release, &settings.update.repository)
        );
    }
}

fn check_update_now(settings: &HostSettings, install: bool) -> Result<()> {
    let updater = Updater::github(settings.update.clone())?;
    let Some(release) = updater.check()? else {
        println!("ReCal {} is up to date.", settings.update.current_version);
        return Ok(());
    };
    println!("{}", update_notice(&release, &settings.update.repository));
    if !install {
        return Ok(());
    }
    let dir = std::env::temp_dir();
    let path = updater.download_installer(&release, &dir, &mut |pct| {
        eprint!("\rDownloading update... {pct:>3}%");
    })?;
    eprintln!();
    updater::launch_installer(&path)?;
    println!("Installer started: {}", path.display());
    Ok(())
}

/// Settings from `path`, or defaults when the file cannot be used. Falling
/// back leaves the terms unaccepted so the gate asks again.
fn load_settings_or_default(path: &Path) -> HostSettings {
    HostSettings::load(path).unwrap_or_else(|e| {
        warn!(error = %e, "settings unusable, continuing with defaults");
        HostSettings::default()
    })
}

fn write_lockers(
    out: &mut String,
    count: u32,
    r: &CraftingResult,
    strategies: Option<&[ProfitCalculation]>,
) -> fmt::Result {
    writeln!(out, "Wall lockers: {count}")?;
    writeln!(out, "  Cans needed:         {}", r.cans_needed)?;
    writeln!(out, "  Cage lights needed:  {}", r.cage_lights_needed)?;
    writeln!(out, "  Total cost:          {}", format_currency(r.total_cost))?;
    writeln!(out, "  Cost per locker:     {}", format_currency(r.cost_per_locker))?;
    writeln!(out, "  Scrap leftover:      {}", r.scrap_leftover)?;
    writeln!(out, "  Wire leftover:       {}", r.wire_leftover)?;
    writeln!(out, "  Metal bars produced: {}", r.metal_bars_produced)?;
    if let Some(strategies) = strategies {
        writeln!(out, "Pricing strategies:")?;
        for s in strategies {
            writeln!(
                out,
                "  {} of market: sell {} | profit/locker {} | margin {} | revenue {} | profit {}",
                format_percent(s.price_factor * Decimal::ONE_HUNDRED),
                format_currency(s.selling_price),
                format_currency(s.profit_per_locker),
                format_percent(s.profit_margin),
                format_currency(s.total_revenue),
                format_currency(s.total_profit),
            )?;
        }
    }
    Ok(())
}

fn render_lockers(
    count: u32,
    r: &CraftingResult,
    strategies: Option<&[ProfitCalculation]>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_lockers(&mut out, count, r, strategies)?;
    Ok(out)
}

fn write_cigars(out: &mut String, r: &CigarCalculationResult) -> fmt::Result {
    writeln!(out, "Cigars: {}", r.cigar_count)?;
    writeln!(out, "  Revenue:         {}", format_currency(r.total_revenue))?;
    writeln!(out, "  Production time: {}", format_hours(r.production_hours))?;
    writeln!(
        out,
        "  Plants needed:   {} (tobacco leftover {})",
        r.plants_needed, r.tobacco_leftover
    )?;
    writeln!(
        out,
        "  Tape needed:     {} (cloth leftover {})",
        r.tape_needed, r.cloth_leftover
    )?;
    writeln!(
        out,
        "  Rate: {} cigars/h, {}/h",
        r.cigars_per_hour,
        format_currency(r.revenue_per_hour)
    )
}

fn render_cigars(r: &CigarCalculationResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_cigars(&mut out, r)?;
    Ok(out)
}

fn render_batch(r: &CigarBatchResult) -> String {
    format!(
        "Batch {} ({} cigars): revenue {} | plants {} | tape {}\n",
        r.batch_size,
        r.cigar_count,
        format_currency(r.revenue),
        r.plants_needed,
        r.tape_needed
    )
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> Result<String, fmt::Error>,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text()?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "starting CLI");

    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let mut settings = load_settings_or_default(&settings_path);

    // Advisory only; the verify command reports it itself.
    if !matches!(cli.command, Command::Verify { .. }) {
        if let Some(warning) = integrity::verify_or_warn(&app_dir(), &settings.integrity_manifest) {
            eprintln!("{warning}");
        }
    }

    if settings.check_for_updates
        && !cli.skip_update
        && !matches!(cli.command, Command::CheckUpdate { .. })
    {
        startup_update_check(&settings);
    }

    let accept_flag = cli.accept_terms;
    let outcome = recal_host::ensure_terms_accepted(&mut settings, Some(&settings_path), || {
        accept_flag || prompt_terms()
    });
    if outcome == TermsOutcome::Declined {
        bail!(TERMS_REQUIRED_MESSAGE);
    }

    match cli.command {
        Command::Lockers {
            count,
            market_price,
        } => {
            let count = input::parse_locker_count(&count)?;
            let calc = LockerMaterialCalculator::new();
            let result = calc.calculate_materials(count)?;
            let strategies = market_price
                .map(|p| calc.calculate_profit_strategies(count, result.cost_per_locker, p))
                .transpose()?;
            info!(count, "locker calculation");
            if cli.json {
                let value = serde_json::json!({ "materials": result, "strategies": strategies });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let strategies = strategies.as_ref().map(|s| s.as_slice());
                print!("{}", render_lockers(count, &result, strategies)?);
            }
        }
        Command::Cigars { count } => {
            let count = input::parse_cigar_count(&count)?;
            let result = CigarProductionCalculator::new().calculate_cigars(i64::from(count))?;
            emit(cli.json, &result, || render_cigars(&result))?;
        }
        Command::Batch { size } => {
            let result = CigarProductionCalculator::new().calculate_batch(size);
            emit(cli.json, &result, || Ok(render_batch(&result)))?;
        }
        Command::Verify { dir } => {
            let dir = dir.unwrap_or_else(app_dir);
            match integrity::load_manifest(&dir, &settings.integrity_manifest)? {
                None => println!("No integrity manifest in {}.", dir.display()),
                Some(manifest) => {
                    let report = integrity::verify(&dir, &manifest);
                    match report.warning_text() {
                        Some(text) => println!("{text}"),
                        None => println!("All {} files verified.", report.checked),
                    }
                }
            }
        }
        Command::CheckUpdate { install } => check_update_now(&settings, install)?,
        Command::Tip => {
            let mut rotator = TipRotator::new(settings.tip_seed);
            match rotator.next_tip() {
                Some(tip) => println!("{} (next tip in {}s)", tip.text, tip.next_in.as_secs()),
                None => println!("No tips available."),
            }
        }
    }
    Ok(())
}
