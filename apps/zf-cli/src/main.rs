use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use zf_app::{AppResult, EvaluateRequest, ReplayReport};
use zf_controls::{DamperActuator, HoldReason, HvacDirection, Outcome, SetDamperPosition};
use zf_controls::{DEFAULT_GAIN, DEFAULT_HORIZON_S};

#[derive(Parser)]
#[command(name = "zf-cli")]
#[command(about = "Zoneflow CLI - zone damper control for shared-thermostat HVAC", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate installation file syntax and structure
    Validate {
        /// Path to the installation YAML or JSON file
        installation_path: PathBuf,
    },
    /// List configured zones
    Zones {
        /// Path to the installation YAML or JSON file
        installation_path: PathBuf,
    },
    /// Evaluate the damper law once from plain numbers
    Evaluate {
        /// Thermostat direction
        #[arg(long, value_enum)]
        direction: DirectionArg,
        /// Target temperature
        #[arg(long)]
        target: f64,
        /// Previous temperature sample
        #[arg(long)]
        previous: f64,
        /// Current temperature sample
        #[arg(long)]
        current: f64,
        /// Seconds between the two samples
        #[arg(long)]
        interval: f64,
        /// Current damper position (0-100)
        #[arg(long, default_value_t = 100)]
        damper: u8,
        /// Look-ahead horizon in seconds
        #[arg(long, default_value_t = DEFAULT_HORIZON_S)]
        horizon: f64,
        /// Damper percent per degree of residual
        #[arg(long, default_value_t = DEFAULT_GAIN)]
        gain: f64,
    },
    /// Replay a recorded host event log through the zone controllers
    Replay {
        /// Path to the installation YAML or JSON file
        installation_path: PathBuf,
        /// Path to the replay log YAML file
        log_path: PathBuf,
        /// Restore zone mode/target from this snapshot before replaying
        #[arg(long)]
        restore: Option<PathBuf>,
        /// Write zone mode/target to this snapshot after replaying
        #[arg(long)]
        save_state: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Heat,
    Cool,
}

impl From<DirectionArg> for HvacDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Heat => HvacDirection::Heating,
            DirectionArg::Cool => HvacDirection::Cooling,
        }
    }
}

/// Prints each command as it is issued.
struct PrintActuator;

impl DamperActuator for PrintActuator {
    fn set_position(&mut self, command: SetDamperPosition) {
        tracing::info!(zone = %command.zone_id, position = command.position, "set damper position");
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { installation_path } => cmd_validate(&installation_path),
        Commands::Zones { installation_path } => cmd_zones(&installation_path),
        Commands::Evaluate {
            direction,
            target,
            previous,
            current,
            interval,
            damper,
            horizon,
            gain,
        } => cmd_evaluate(EvaluateRequest {
            direction: direction.into(),
            target,
            previous,
            current,
            interval_s: interval,
            damper,
            horizon_s: horizon,
            gain,
        }),
        Commands::Replay {
            installation_path,
            log_path,
            restore,
            save_state,
            json,
        } => cmd_replay(
            &installation_path,
            &log_path,
            restore.as_deref(),
            save_state.as_deref(),
            json,
        ),
    }
}

fn cmd_validate(installation_path: &Path) -> AppResult<()> {
    println!("Validating installation: {}", installation_path.display());
    let installation = zf_app::load_installation(installation_path)?;
    zf_app::validate_installation(&installation)?;
    println!("✓ Installation is valid ({} zones)", installation.zones.len());
    Ok(())
}

fn cmd_zones(installation_path: &Path) -> AppResult<()> {
    let installation = zf_app::load_installation(installation_path)?;
    let zones = zf_app::list_zones(&installation);

    println!(
        "Zones sharing thermostat {}:",
        installation.thermostat.entity_id
    );
    for zone in zones {
        println!(
            "  {} - {} (damper: {}, sensor: {})",
            zone.id, zone.name, zone.cover_entity_id, zone.sensor_entity_id
        );
    }
    Ok(())
}

fn cmd_evaluate(request: EvaluateRequest) -> AppResult<()> {
    match zf_app::evaluate_once(&request)? {
        Outcome::Command(cmd, eval) => {
            println!("rate of change:  {:.5} deg/s", eval.rate_of_change);
            println!("projected drift: {:.3} deg", eval.projected_drift);
            println!("required change: {:.3} deg", eval.required_change);
            println!("action:          {:.3}", eval.action);
            println!("✓ Move damper {} -> {}", request.damper, cmd.position);
        }
        Outcome::Hold(HoldReason::Unchanged(eval)) => {
            println!("action:          {:.3}", eval.action);
            println!("Damper stays at {}", eval.position);
        }
        Outcome::Hold(reason) => println!("No action: {:?}", reason),
    }
    Ok(())
}

fn cmd_replay(
    installation_path: &Path,
    log_path: &Path,
    restore: Option<&Path>,
    save_state: Option<&Path>,
    json: bool,
) -> AppResult<()> {
    let installation = zf_app::load_installation(installation_path)?;
    let mut runtime = zf_app::compile_installation(&installation)?;

    if let Some(path) = restore {
        let snapshot = zf_project::load_snapshot(path)?;
        let restored = zf_app::apply_snapshot(&mut runtime, &snapshot)?;
        println!("Restored {} zone(s) from {}", restored, path.display());
    }

    let log = zf_app::load_replay(log_path)?;
    let report = zf_app::run_replay(&mut runtime, &log, &mut PrintActuator)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| zf_app::AppError::Replay(e.to_string()))?;
        println!("{}", out);
    } else {
        print_report(&report);
    }

    if let Some(path) = save_state {
        let snapshot = zf_app::capture_snapshot(&runtime);
        zf_project::save_snapshot(path, &snapshot)?;
        println!("✓ Zone state saved to {}", path.display());
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("Replayed {} step(s)", report.steps);
    if report.commands.is_empty() {
        println!("No damper commands issued");
        return;
    }
    println!("Damper commands:");
    for cmd in &report.commands {
        println!("  step {:>4}  {:<16} -> {:>3}%", cmd.step, cmd.zone, cmd.position);
    }
}
