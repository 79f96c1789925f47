use cachetur::{
    AbortReason, Format, MachineDefinition, MachineError, MachineLoader, Mode, ProgramCatalog,
    Simulation, Simulator, SimulatorConfig, TransitionTable, Verdict, DEFAULT_STEP_LIMIT,
};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Document read when no other source is given.
const DEFAULT_CONFIG: &str = "info.yaml";

/// `--config` value that reads the document from stdin.
const STDIN_PATH: &str = "-";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  cachetur-cli --config info.yaml
  cachetur-cli --machine first-equals-last -i abba -i ab
  cachetur-cli --config - < machine.yaml
  cat machine.yaml | cachetur-cli")]
struct Cli {
    /// The machine document to load (YAML, or JSON with a .json extension).
    /// Use - for stdin. Defaults to piped stdin when it has content, else info.yaml.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Run a built-in machine instead of a document
    #[clap(short, long, conflicts_with = "config")]
    machine: Option<String>,

    /// List the built-in machines and exit
    #[clap(long)]
    list: bool,

    /// Input strings to simulate, replacing the document's simulation_strings
    #[clap(short, long)]
    input: Vec<String>,

    /// Abort a simulation after this many transitions
    #[clap(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Accept unrecognized displacement codes; runs that reach them are aborted
    #[clap(long)]
    lenient: bool,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        for name in ProgramCatalog::names() {
            println!("{}", name);
        }
        return;
    }

    let mode = if cli.lenient {
        Mode::Lenient
    } else {
        Mode::Strict
    };

    let (definition, table) = match load_definition(&cli)
        .and_then(|definition| TransitionTable::build(&definition, mode).map(|t| (definition, t)))
    {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for lint in table.lints() {
        tracing::warn!("{}", lint);
    }

    let inputs = if cli.input.is_empty() {
        &definition.inputs
    } else {
        &cli.input
    };

    let simulator = Simulator::new(
        &table,
        SimulatorConfig {
            step_limit: cli.step_limit,
        },
    );
    let simulations = simulator.run_all(inputs);

    match cli.format {
        OutputFormat::Text => {
            print_summary(&definition, &table);
            for simulation in &simulations {
                print_simulation(simulation, &definition);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&simulations) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

/// Where a machine document comes from.
#[derive(Debug, PartialEq)]
enum Source {
    File(PathBuf),
    Stdin(String),
}

/// Loads the machine document based on CLI arguments.
///
/// A built-in machine wins, then an explicit path (`-` for stdin), then piped stdin with
/// content, and finally the default document in the working directory.
fn load_definition(cli: &Cli) -> Result<MachineDefinition, MachineError> {
    if let Some(name) = &cli.machine {
        return ProgramCatalog::get(name);
    }

    let wants_stdin = match &cli.config {
        Some(path) => path == Path::new(STDIN_PATH),
        None => atty::isnt(atty::Stream::Stdin),
    };
    let piped = if wants_stdin { Some(read_stdin()?) } else { None };

    match select_source(cli.config.as_deref(), piped) {
        Source::File(path) => MachineLoader::load(&path),
        Source::Stdin(content) => MachineLoader::load_from_str(&content, Format::Yaml),
    }
}

/// Picks the document source. Without `--config`, stdin that is empty or only whitespace
/// (e.g. `< /dev/null`) falls back to the default document.
fn select_source(config: Option<&Path>, piped: Option<String>) -> Source {
    match config {
        Some(path) if path == Path::new(STDIN_PATH) => Source::Stdin(piped.unwrap_or_default()),
        Some(path) => Source::File(path.to_path_buf()),
        None => match piped {
            Some(content) if !content.trim().is_empty() => Source::Stdin(content),
            _ => Source::File(PathBuf::from(DEFAULT_CONFIG)),
        },
    }
}

fn read_stdin() -> Result<String, MachineError> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| MachineError::FileError(format!("Failed to read from stdin: {}", e)))?;
    Ok(buffer)
}

fn print_summary(definition: &MachineDefinition, table: &TransitionTable) {
    println!("== Machine loaded ==");
    println!("States: {:?}", definition.q_states.states);
    println!("Initial state: {}", table.initial_state());
    println!("Final state: {}", table.final_state());
    println!("Alphabet: {:?}", definition.alphabet);
    println!("Tape alphabet: {:?}", definition.tape_alphabet);
    println!("Transitions: {}\n", table.len());
}

fn print_simulation(simulation: &Simulation, definition: &MachineDefinition) {
    println!("======================================");
    println!("Simulating input: \"{}\"", simulation.input);
    println!("Instantaneous descriptions (ID) per step:");
    for (i, id) in simulation.trace.iter().enumerate() {
        println!("{:3}: {}", i, id);
    }

    match &simulation.verdict {
        Verdict::Accepted => println!(
            ">> Result: ACCEPTED (reached final state {})",
            definition.q_states.final_state
        ),
        Verdict::Rejected => println!(">> Result: REJECTED (no applicable transition)"),
        Verdict::Aborted(AbortReason::StepLimitExceeded(limit)) => println!(
            ">> Result: ABORTED (more than {} steps, possible infinite loop)",
            limit
        ),
        Verdict::Aborted(AbortReason::InvalidMove(code)) => {
            println!(">> Result: ABORTED (invalid displacement '{}')", code)
        }
    }
    println!("======================================\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stdin_falls_back_to_default_config() {
        let default = Source::File(PathBuf::from(DEFAULT_CONFIG));

        assert_eq!(select_source(None, None), default);
        assert_eq!(select_source(None, Some(String::new())), default);
        assert_eq!(select_source(None, Some(" \n\t".to_string())), default);
    }

    #[test]
    fn test_piped_document_is_used() {
        let content = "q_states: { q_list: [q0], initial: q0, final: q0 }\n".to_string();
        assert_eq!(
            select_source(None, Some(content.clone())),
            Source::Stdin(content)
        );
    }

    #[test]
    fn test_explicit_path_wins_over_stdin() {
        let path = Path::new("machines/bit-flip.yaml");
        assert_eq!(
            select_source(Some(path), Some("alphabet: []".to_string())),
            Source::File(path.to_path_buf())
        );
    }

    #[test]
    fn test_dash_reads_stdin_even_when_empty() {
        let dash = Path::new(STDIN_PATH);

        assert_eq!(
            select_source(Some(dash), Some("alphabet: []".to_string())),
            Source::Stdin("alphabet: []".to_string())
        );
        assert_eq!(
            select_source(Some(dash), Some(String::new())),
            Source::Stdin(String::new())
        );
    }

    #[test]
    fn test_cli_accepts_dash_config() {
        let cli = Cli::try_parse_from(["cachetur-cli", "--config", "-"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new(STDIN_PATH)));
    }
}
