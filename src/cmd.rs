//! Command line interface

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Args, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use kdam::tqdm;

use hazel::io::{read_netlist_file, read_vector_file, write_pattern_file};
use hazel::netlist::stats::stats;
use hazel::sim::generate_random_vectors;
use hazel::{Engine, Hazard, InputVector, LogicModel, Netlist, SimOptions, Value};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a logic network
    ///
    /// Will print statistics on the number of inputs, outputs and gates in
    /// the network, its depth and any combinational feedback.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a logic network
    ///
    /// Reads stimulus patterns with one bit per input:
    ///    1: 00011101
    ///    2: 01110000
    /// and reports final outputs, hazards and gate evaluation counts.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Run every engine on the same patterns and compare their outputs
    ///
    /// The command will fail if two engines disagree on the final output
    /// values of any pattern, and will report the offending pattern.
    #[clap(alias = "cmp")]
    Compare(CompareArgs),
}

/// Engine selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    TwoList,
    EventList,
    GateList,
    Levelized,
    Threaded,
}

impl From<EngineArg> for Engine {
    fn from(e: EngineArg) -> Engine {
        match e {
            EngineArg::TwoList => Engine::TwoList,
            EngineArg::EventList => Engine::EventList,
            EngineArg::GateList => Engine::GateList,
            EngineArg::Levelized => Engine::Levelized,
            EngineArg::Threaded => Engine::Threaded,
        }
    }
}

fn load_netlist(path: &Path) -> Netlist {
    read_netlist_file(path).unwrap_or_else(|e| {
        eprintln!("{}: {}", path.display(), e);
        exit(1);
    })
}

fn load_vectors(path: &Path, netlist: &Netlist) -> Vec<InputVector> {
    read_vector_file(path, netlist).unwrap_or_else(|e| {
        eprintln!("{}: {}", path.display(), e);
        exit(1);
    })
}

fn format_outputs(outputs: &[(String, Value)]) -> String {
    outputs
        .iter()
        .map(|(n, v)| format!("{}={}", n, v))
        .join(" ")
}

/// Command arguments for network informations
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) {
        let netlist = load_netlist(&self.file);
        println!("Network stats:\n{}", stats(&netlist));
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Network to simulate
    network: PathBuf,

    /// Input patterns file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output file for output patterns
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Simulation engine
    #[arg(long, value_enum, default_value = "two-list")]
    engine: EngineArg,

    /// Use the three-valued logic model
    #[arg(long)]
    three_valued: bool,

    /// Scheduler iteration cap per vector
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Refuse combinational feedback in the levelized engine
    #[arg(long)]
    strict: bool,

    /// Simulate each pattern as a transition from the previous one
    #[arg(short = 't', long)]
    transitions: bool,

    /// Print every committed transition
    #[arg(long)]
    trace: bool,
}

impl SimulateArgs {
    pub fn run(&self) {
        let netlist = load_netlist(&self.network);
        let vectors = load_vectors(&self.input, &netlist);
        let engine = Engine::from(self.engine);
        let mut options = SimOptions {
            model: if self.three_valued {
                LogicModel::Three
            } else {
                LogicModel::Two
            },
            max_steps: self.max_steps,
            strict_levelized: self.strict,
            ..SimOptions::default()
        };

        let mut responses: Vec<Vec<Value>> = Vec::new();
        let mut previous: Option<InputVector> = None;
        for (i, vector) in vectors.iter().enumerate() {
            if self.transitions {
                options.baseline = previous.take();
            }
            let res = engine
                .simulate_vector(&netlist, vector, &options)
                .unwrap_or_else(|e| {
                    eprintln!("pattern {}: {}", i + 1, e);
                    exit(1);
                });
            println!(
                "{}: {}  ({} evaluations)",
                i + 1,
                format_outputs(res.outputs()),
                res.total_evals()
            );
            for (net, hazard) in res.hazards() {
                if *hazard != Hazard::None {
                    println!("    hazard on {}: {}", net, hazard);
                }
            }
            if self.trace {
                for t in res.trace() {
                    println!(
                        "    t={} {}: {} -> {}",
                        t.time,
                        netlist.net(t.net).name,
                        t.from,
                        t.to
                    );
                }
            }
            responses.push(res.outputs().iter().map(|&(_, v)| v).collect());
            if self.transitions {
                previous = Some(vector.clone());
            }
        }

        if let Some(path) = &self.output {
            write_pattern_file(path, &responses).unwrap_or_else(|e| {
                eprintln!("{}: {}", path.display(), e);
                exit(1);
            });
        }
    }
}

/// Command arguments for cross-engine comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Network to compare engines on
    network: PathBuf,

    /// Input patterns file; random patterns are generated when absent
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Number of random patterns to generate
    #[arg(short = 'r', long, default_value_t = 64)]
    num_random: usize,

    /// Seed for random pattern generation
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Use the three-valued logic model
    #[arg(long)]
    three_valued: bool,
}

impl CompareArgs {
    pub fn run(&self) {
        let netlist = load_netlist(&self.network);
        let vectors = match &self.input {
            Some(path) => load_vectors(path, &netlist),
            None => generate_random_vectors(&netlist, self.num_random, self.seed),
        };
        let options = SimOptions {
            model: if self.three_valued {
                LogicModel::Three
            } else {
                LogicModel::Two
            },
            ..SimOptions::default()
        };

        let mut nb_mismatches = 0;
        for (i, vector) in tqdm!(vectors.iter().enumerate(), total = vectors.len()) {
            let reference = Engine::TwoList
                .simulate_vector(&netlist, vector, &options)
                .unwrap_or_else(|e| {
                    eprintln!("pattern {} on two-list: {}", i + 1, e);
                    exit(1);
                });
            for engine in &Engine::ALL[1..] {
                let res = engine
                    .simulate_vector(&netlist, vector, &options)
                    .unwrap_or_else(|e| {
                        eprintln!("pattern {} on {}: {}", i + 1, engine, e);
                        exit(1);
                    });
                if res.outputs() != reference.outputs() {
                    nb_mismatches += 1;
                    eprintln!(
                        "pattern {}: {} disagrees with two-list: {} vs {}",
                        i + 1,
                        engine,
                        format_outputs(res.outputs()),
                        format_outputs(reference.outputs())
                    );
                }
            }
        }
        if nb_mismatches == 0 {
            println!("All engines agree on {} patterns", vectors.len());
        } else {
            println!("{} mismatches found", nb_mismatches);
            exit(1);
        }
    }
}
