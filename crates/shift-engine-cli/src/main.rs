//! `shifts` CLI: check weekly shift schedules from the command line.
//!
//! Every command prints a JSON verdict on stdout and exits with:
//! `0` when the operation is accepted (`valid`, `noChanges`, `bookable`),
//! `1` when it is rejected, and `2` on usage or I/O errors.
//!
//! ## Usage
//!
//! ```sh
//! # Validate request shifts (stdin → stdout)
//! echo '[{"checkIn":"08:00","checkOut":"12:00","days":["monday"]}]' | shifts validate
//!
//! # Check adding shifts to an owner's stored set
//! shifts check -i new.json --existing stored.json
//!
//! # Same, with the assistant preset (15-minute grid, bulk clear allowed)
//! shifts --role assistant check -i new.json --existing stored.json
//!
//! # Check editing one stored shift (absent fields keep their stored values)
//! echo '{"checkOut":"13:00"}' | shifts update --id 3 --existing stored.json
//!
//! # Replace the whole schedule and print the add/remove delta
//! shifts replace -i desired.json --existing stored.json
//!
//! # List every conflict instead of stopping at the first
//! shifts conflicts -i new.json --existing stored.json
//!
//! # Compare two schedules ignoring order
//! shifts equal a.json b.json
//!
//! # Check an appointment against working hours and other bookings
//! shifts book -i appointment.json --existing stored.json --bookings bookings.json
//! ```
//!
//! Set `RUST_LOG=shift_engine_cli=debug` for diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shift_engine::{
    check_booking, find_conflicts, Appointment, Booking, ConfigOverrides, EngineConfig, OwnerRole,
    RawShift, Shift, ShiftEngine, ShiftPatch, StoredShift, Verdict,
};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stored ids are opaque: numbers and strings both work.
type Id = Value;

#[derive(Parser)]
#[command(
    name = "shifts",
    version,
    about = "Check weekly shift schedules for duplicates, overlaps and changes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Owner role preset (medic: 30-minute grid; assistant: 15-minute grid)
    #[arg(long, global = true, default_value = "medic")]
    role: OwnerRole,

    /// JSON engine configuration file; its fields override the --role preset
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate request shifts and print them normalized
    Validate {
        /// JSON array of shifts (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Check adding shifts to an owner's stored set
    Check {
        /// JSON array of shifts to add (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON array of stored shifts with ids
        #[arg(long)]
        existing: String,
    },
    /// Check editing one stored shift
    Update {
        /// Id of the stored shift being edited
        #[arg(long)]
        id: String,
        /// JSON object with the fields to change (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON array of stored shifts with ids
        #[arg(long)]
        existing: String,
    },
    /// Check replacing the whole stored set and print the delta
    Replace {
        /// JSON array with the desired shifts (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON array of stored shifts with ids
        #[arg(long)]
        existing: String,
    },
    /// Check removing one stored shift
    Remove {
        /// Id of the stored shift to remove
        #[arg(long)]
        id: String,
        /// JSON array of stored shifts with ids
        #[arg(long)]
        existing: String,
    },
    /// List every conflict between new shifts and the stored set
    Conflicts {
        /// JSON array of shifts to add (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON array of stored shifts with ids
        #[arg(long)]
        existing: String,
    },
    /// Compare two shift lists ignoring list and day order
    Equal {
        /// First JSON array of shifts
        left: String,
        /// Second JSON array of shifts
        right: String,
    },
    /// Check an appointment against working hours and other bookings
    Book {
        /// JSON object `{start, end}` (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON array of the owner's stored shifts
        #[arg(long)]
        existing: String,
        /// JSON array of booked appointments `{id, start, end}`
        #[arg(long)]
        bookings: Option<String>,
        /// Id of the booking being rescheduled
        #[arg(long)]
        exclude: Option<String>,
    },
}

/// Whether the printed verdict lets the caller go ahead.
enum Outcome {
    Accepted,
    Rejected,
}

impl From<bool> for Outcome {
    fn from(accepted: bool) -> Self {
        if accepted {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(Outcome::Accepted) => ExitCode::SUCCESS,
        Ok(Outcome::Rejected) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shift_engine_cli=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref(), cli.role)?;
    debug!(?config, "engine configuration");
    let engine = ShiftEngine::new(config).context("Invalid engine configuration")?;

    let outcome = match cli.command {
        Commands::Validate { input } => {
            let raws: Vec<RawShift> = read_json(input.as_deref())?;
            match engine.validate_batch(&raws) {
                Ok(shifts) => {
                    info!(count = shifts.len(), "all shifts valid");
                    print_json(&shifts)?;
                    Outcome::Accepted
                }
                Err((index, reason)) => {
                    print_json(&Verdict::<Id>::InvalidShift { index, reason })?;
                    Outcome::Rejected
                }
            }
        }
        Commands::Check { input, existing } => {
            let raws: Vec<RawShift> = read_json(input.as_deref())?;
            let existing = read_existing(&existing)?;
            let verdict = engine.check_create(&raws, &existing);
            report(&verdict)?
        }
        Commands::Update {
            id,
            input,
            existing,
        } => {
            let patch: ShiftPatch = read_json(input.as_deref())?;
            let existing = read_existing(&existing)?;
            let id = resolve_id(&id, existing.iter().map(|s| &s.id));
            let verdict = engine.check_patch(&id, &patch, &existing);
            report(&verdict)?
        }
        Commands::Replace { input, existing } => {
            let raws: Vec<RawShift> = read_json(input.as_deref())?;
            let existing = read_existing(&existing)?;
            let plan = engine.plan_replace(&raws, &existing);
            if let Some(changes) = &plan.changes {
                info!(
                    add = changes.to_add.len(),
                    remove = changes.to_remove.len(),
                    unchanged = changes.unchanged.len(),
                    "replacement planned"
                );
            }
            print_json(&plan)?;
            plan.verdict.is_accepted().into()
        }
        Commands::Remove { id, existing } => {
            let existing = read_existing(&existing)?;
            let id = resolve_id(&id, existing.iter().map(|s| &s.id));
            let verdict = engine.check_remove(&id, &existing);
            report(&verdict)?
        }
        Commands::Conflicts { input, existing } => {
            let raws: Vec<RawShift> = read_json(input.as_deref())?;
            let existing = read_existing(&existing)?;
            match engine.validate_batch(&raws) {
                Ok(shifts) => {
                    let conflicts = find_conflicts(&shifts, &existing);
                    info!(count = conflicts.len(), "conflicts found");
                    print_json(&conflicts)?;
                    conflicts.is_empty().into()
                }
                Err((index, reason)) => {
                    print_json(&Verdict::<Id>::InvalidShift { index, reason })?;
                    Outcome::Rejected
                }
            }
        }
        Commands::Equal { left, right } => {
            let left: Vec<Shift> = read_json(Some(&left))?;
            let right: Vec<Shift> = read_json(Some(&right))?;
            let equal = shift_engine::shift_sets_equal(&left, &right);
            print_json(&serde_json::json!({
                "equal": equal,
                "left": shift_engine::equality::canonical_signature(&left),
                "right": shift_engine::equality::canonical_signature(&right),
            }))?;
            equal.into()
        }
        Commands::Book {
            input,
            existing,
            bookings,
            exclude,
        } => {
            let appointment: Appointment = read_json(input.as_deref())?;
            let shifts: Vec<Shift> = read_existing(&existing)?
                .into_iter()
                .map(|s| s.shift)
                .collect();
            let bookings: Vec<Booking<Id>> = match bookings {
                Some(path) => read_json(Some(&path))?,
                None => Vec::new(),
            };
            let exclude = exclude
                .as_deref()
                .map(|raw| resolve_id(raw, bookings.iter().map(|b| &b.id)));
            let verdict = check_booking(&appointment, &shifts, &bookings, exclude.as_ref());
            print_json(&verdict)?;
            verdict.is_bookable().into()
        }
    };

    Ok(outcome)
}

/// Build the engine configuration: the `--role` preset with the fields of
/// the `--config` file, if any, applied on top.
fn load_config(path: Option<&str>, role: OwnerRole) -> Result<EngineConfig> {
    let preset = EngineConfig::for_role(role);
    let Some(path) = path else {
        return Ok(preset);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let overrides: ConfigOverrides =
        serde_json::from_str(&text).with_context(|| format!("Invalid config file: {}", path))?;
    Ok(overrides.apply(preset))
}

/// Match a command-line id against the ids actually stored.
///
/// `--id 1` finds both a stored `1` and a stored `"1"`. When nothing matches,
/// the id is taken as JSON if it parses as JSON, otherwise as a string.
fn resolve_id<'a>(raw: &str, stored: impl IntoIterator<Item = &'a Id>) -> Id {
    let stored: Vec<&Id> = stored.into_iter().collect();
    let is_stored = |wanted: &Id| stored.iter().any(|id| *id == wanted);

    let parsed: Option<Id> = serde_json::from_str(raw).ok();
    let literal = Value::String(raw.to_string());

    match parsed {
        Some(id) if is_stored(&id) => id,
        _ if is_stored(&literal) => literal,
        Some(id) => id,
        None => literal,
    }
}

fn report(verdict: &Verdict<Id>) -> Result<Outcome> {
    debug!(?verdict, "verdict");
    print_json(verdict)?;
    Ok(verdict.is_accepted().into())
}

fn read_existing(path: &str) -> Result<Vec<StoredShift<Id>>> {
    let existing: Vec<StoredShift<Id>> = read_json(Some(path))?;
    info!(count = existing.len(), path, "loaded stored shifts");
    Ok(existing)
}

fn read_json<T: DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let text = read_input(path)?;
    let source = path.unwrap_or("stdin");
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", source))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", pretty);
    Ok(())
}
