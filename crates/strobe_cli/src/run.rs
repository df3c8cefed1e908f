//! `strobe run` and `strobe signals` — wiring circuits to their sinks.
//!
//! Resolves the effective settings (flags over `strobe.toml` over
//! defaults), opens the trace file (fatal when it cannot be created) and
//! the optional tee, runs the interactive loop on stdin/stdout, and
//! flushes every sink on every exit path.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use strobe_config::RunConfig;
use strobe_sim::{CircuitInstance, InteractiveDriver};

use crate::circuits;
use crate::{GlobalArgs, RunArgs, SignalsArgs};

/// Circuit bound when neither flags nor configuration pick one.
const DEFAULT_CIRCUIT: &str = "dot8";

/// The implicit configuration file name in the working directory.
const CONFIG_FILE: &str = "strobe.toml";

/// Effective settings after merging flags, configuration, and defaults.
struct Settings {
    circuit: String,
    divisor: u64,
    seed: u64,
    trace: PathBuf,
    tee: Option<PathBuf>,
}

impl Settings {
    /// Flags win over configuration; defaults fill the rest. The default
    /// trace path is `<circuit>.vcd`.
    fn merge(args: &RunArgs, config: &RunConfig) -> Self {
        let circuit = args
            .circuit
            .clone()
            .or_else(|| config.project.circuit.clone())
            .unwrap_or_else(|| DEFAULT_CIRCUIT.to_string());
        let trace = args
            .trace
            .clone()
            .or_else(|| config.sim.trace.clone())
            .unwrap_or_else(|| PathBuf::from(format!("{circuit}.vcd")));
        Self {
            divisor: args.divisor.or(config.sim.divisor).unwrap_or(1),
            seed: args.seed.or(config.sim.seed).unwrap_or(0),
            tee: args.tee.clone().or_else(|| config.sim.tee.clone()),
            circuit,
            trace,
        }
    }
}

/// Loads the configuration: an explicit `--config` path must exist, the
/// implicit `strobe.toml` is optional.
fn load_effective_config(global: &GlobalArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => Ok(strobe_config::load_config(path)?),
        None => {
            let implicit = Path::new(CONFIG_FILE);
            if implicit.is_file() {
                Ok(strobe_config::load_config(implicit)?)
            } else {
                Ok(RunConfig::default())
            }
        }
    }
}

/// Builds a circuit instance from resolved settings.
fn build_instance(
    circuit: &str,
    divisor: u64,
    seed: u64,
) -> Result<CircuitInstance, Box<dyn std::error::Error>> {
    let behavior = circuits::by_name(circuit).ok_or_else(|| {
        format!(
            "unknown circuit '{circuit}' (available: {})",
            circuits::names().join(", ")
        )
    })?;
    let mut instance = CircuitInstance::new(behavior, divisor)?;
    instance.initialize(seed);
    Ok(instance)
}

/// Runs the `strobe run` command.
///
/// Returns exit code 0 on a clean session; trace open failures and loop
/// I/O failures are fatal.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_effective_config(global)?;
    let settings = Settings::merge(args, &config);
    let instance = build_instance(&settings.circuit, settings.divisor, settings.seed)?;

    if !global.quiet {
        eprintln!(
            "   Simulating {} (divisor {}, seed {})",
            instance.kind(),
            settings.divisor,
            settings.seed
        );
    }

    let trace_file = File::create(&settings.trace)
        .map_err(|e| format!("cannot open trace '{}': {e}", settings.trace.display()))?;

    let mut driver: InteractiveDriver<BufWriter<File>, BufWriter<File>> =
        InteractiveDriver::new(instance);
    driver.attach_recorder(BufWriter::new(trace_file))?;

    if let Some(tee_path) = &settings.tee {
        let tee_file = File::create(tee_path)
            .map_err(|e| format!("cannot open tee '{}': {e}", tee_path.display()))?;
        driver.attach_tee(BufWriter::new(tee_file));
    } else if global.verbose {
        eprintln!("   No tee configured; commands are not echoed");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let loop_result = driver.run_repl(&mut stdin.lock(), &mut stdout.lock());
    // Flush the sinks even when the loop failed partway.
    let flush_result = driver.finish();
    loop_result?;
    flush_result?;

    if !global.quiet {
        eprintln!("   Trace written to {}", settings.trace.display());
    }
    Ok(0)
}

/// Runs the `strobe signals` command: lists dotted names, widths, roles.
pub fn signals(args: &SignalsArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let circuit = args.circuit.as_deref().unwrap_or(DEFAULT_CIRCUIT);
    let instance = build_instance(circuit, 1, 0)?;
    for signal in instance.signals() {
        println!(
            "{}.{}  [{} bit] {}",
            instance.kind(),
            signal.name,
            signal.width,
            signal.role.label()
        );
    }
    Ok(0)
}
