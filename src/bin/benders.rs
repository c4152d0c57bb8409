use std::process::ExitCode;

use benders::{
    BendersConfig, BendersDecomposition, CutStrategy, Error, Instance, IterationRecord,
    SolverSession,
};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "benders")]
#[command(about = "Benders decomposition on the fixed-charge example")]
#[command(version)]
struct Cli {
    /// Cut selection rule
    #[arg(short, long, value_enum, default_value = "pareto")]
    strategy: StrategyArg,

    /// Iteration safety limit
    #[arg(short = 'n', long, default_value = "100")]
    max_iterations: usize,

    /// Interior reference point for Pareto cuts (domain midpoint if omitted)
    #[arg(short, long)]
    reference_point: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Standard,
    Pareto,
}

impl From<StrategyArg> for CutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Standard => CutStrategy::Standard,
            StrategyArg::Pareto => CutStrategy::Pareto,
        }
    }
}

fn print_iteration(record: &IterationRecord) {
    println!("Iteration {}", record.iteration);
    match record.subproblem_objective {
        Some(objective) => {
            println!("  subproblem at Y = {}: objective = {}", record.y, objective);
            println!("  duals = {:?}", record.duals);
        }
        None => println!(
            "  subproblem at Y = {}: {:?}, no cut added",
            record.y, record.subproblem_status
        ),
    }
    if let Some(cut) = &record.cut {
        println!("  {:?} cut: {}", record.cut_source, cut);
    }
    // a master that is not optimal ends the run, so recorded ones always are
    println!(
        "  master: Optimal, Y = {}, theta = {}",
        record.master_y, record.theta
    );
    println!(
        "  UB = {}, LB = {}, gap = {}",
        record.upper_bound,
        record.lower_bound,
        record.gap()
    );
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let instance = Instance {
        reference_point: cli.reference_point,
        ..Instance::canonical()
    };
    let config = BendersConfig {
        strategy: cli.strategy.into(),
        max_iterations: cli.max_iterations,
    };
    let session = SolverSession::default();

    match BendersDecomposition::new(config).solve(&session, &instance) {
        Ok(outcome) => {
            for record in &outcome.history {
                print_iteration(record);
            }
            println!();
            println!("Converged after {} iterations", outcome.iterations);
            println!("Y* = {}", outcome.incumbent_y);
            println!("theta = {}", outcome.theta);
            println!("objective = {}", outcome.objective_value());
            ExitCode::SUCCESS
        }
        Err(err) if err.is_master_failure() => {
            eprintln!("master problem failed: {}", err);
            ExitCode::FAILURE
        }
        Err(err @ Error::Solver(_)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
