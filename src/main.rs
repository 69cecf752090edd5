/*!
 * memsim - Main Entry Point
 *
 * Runs a workload through one or all placement strategies, either from flags
 * or from the interactive menu, and prints the memory grid at every event.
 */

use clap::{ArgAction, Parser};
use memsim::core::MemsimError;
use memsim::process::load_workload;
use memsim::simulation::{render_failure, render_step, step_to_json, FINISHED_MESSAGE};
use memsim::{init_tracing, PlacementStrategy, Process, SimulationConfig, SimulationEngine};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Strategy selection on the command line
#[derive(Debug, Clone, Copy)]
enum Selection {
    One(PlacementStrategy),
    All,
}

fn parse_selection(s: &str) -> Result<Selection, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    s.parse().map(Selection::One)
}

/// Fixed-size memory allocation simulator
#[derive(Parser, Debug)]
#[command(name = "memsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Placement strategy: first-fit, next-fit, best-fit, worst-fit or all.
    /// Omit to use the interactive menu.
    #[arg(short, long, value_parser = parse_selection)]
    strategy: Option<Selection>,

    /// Workload file (text or .json)
    #[arg(short, long)]
    workload: Option<PathBuf>,

    /// JSON file with run options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print one JSON object per step instead of the text grid
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

fn try_main(cli: Cli) -> Result<(), MemsimError> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    }
    .with_env_overrides();
    if cli.verbose > 0 {
        config = config.with_verbose(true);
    }

    match cli.strategy {
        Some(selection) => {
            let processes = match cli.workload {
                Some(path) => load_workload(path)?,
                None => prompt_workload(&mut io::stdin().lock())?,
            };
            let strategies = match selection {
                Selection::One(strategy) => vec![strategy],
                Selection::All => PlacementStrategy::ALL.to_vec(),
            };
            for strategy in strategies {
                run_simulation(strategy, processes.clone(), &config, cli.json)?;
            }
            Ok(())
        }
        None => interactive(cli.workload.as_deref(), &config, cli.json),
    }
}

/// Menu loop: pick a strategy, pick a workload, run, repeat until 0
fn interactive(
    workload: Option<&Path>,
    config: &SimulationConfig,
    json: bool,
) -> Result<(), MemsimError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Which algorithm would you like to run?");
    while let Some(strategy) = menu(&mut input)? {
        let processes = match workload {
            Some(path) => load_workload(path)?,
            None => prompt_workload(&mut input)?,
        };
        run_simulation(strategy, processes, config, json)?;
    }
    Ok(())
}

/// Show the strategy menu until a valid choice is entered; `None` means exit
fn menu(input: &mut impl BufRead) -> Result<Option<PlacementStrategy>, MemsimError> {
    loop {
        println!();
        println!("Your options are: ");
        println!("-------------------");
        for (index, strategy) in PlacementStrategy::ALL.iter().enumerate() {
            println!("\t{}) Run {} Algorithm", index + 1, strategy.display_name());
        }
        println!("\t0) EXIT");
        println!("\n Please enter your option: ");
        io::stdout().flush()?;

        let choice = loop {
            let Some(line) = read_line(input)? else {
                // EOF behaves like choosing exit
                return Ok(None);
            };
            match line.trim().parse::<u32>() {
                Ok(choice) => break choice,
                Err(_) => println!("Not an integer try again: "),
            }
        };
        println!();

        if choice == 0 {
            return Ok(None);
        }
        if let Some(strategy) = PlacementStrategy::from_menu_choice(choice) {
            return Ok(Some(strategy));
        }
    }
}

/// Ask for a workload path until one loads
fn prompt_workload(input: &mut impl BufRead) -> Result<Vec<Process>, MemsimError> {
    println!("Please enter the path of a workload file:");
    loop {
        io::stdout().flush()?;
        let Some(line) = read_line(input)? else {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no workload given").into());
        };
        match load_workload(line.trim()) {
            Ok(processes) => return Ok(processes),
            Err(err) => {
                warn!(error = %err, "Rejected workload");
                println!("{}", err);
                println!("Please enter the path of a workload file:");
            }
        }
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

fn run_simulation(
    strategy: PlacementStrategy,
    processes: Vec<Process>,
    config: &SimulationConfig,
    json: bool,
) -> Result<(), MemsimError> {
    if !json {
        println!("Running {} Algorithm:", strategy.display_name());
    }
    let mut engine = SimulationEngine::with_config(strategy, processes, config.clone())?;

    let mut write_error: Option<io::Error> = None;
    let outcome = engine.run_with(|step| {
        let line = if json {
            step_to_json(step).unwrap_or_else(|err| {
                warn!(error = %err, "Failed to encode step");
                String::new()
            })
        } else {
            render_step(step)
        };
        if let Err(err) = writeln!(io::stdout(), "{}", line) {
            write_error.get_or_insert(err);
        }
    });

    match outcome {
        Ok(summary) => {
            if !json {
                println!("{}", FINISHED_MESSAGE);
            }
            info!(
                strategy = %summary.strategy,
                final_time = summary.final_time,
                compactions = summary.stats.compactions,
                peak_used = summary.stats.peak_used_units,
                "Simulation complete"
            );
            match write_error {
                Some(err) => Err(err.into()),
                None => Ok(()),
            }
        }
        Err(err) => {
            println!("{}", render_failure(&err));
            Err(err.into())
        }
    }
}
