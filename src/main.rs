use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use montecarlo_pi::config::{DEFAULT_SAMPLES, DEFAULT_WORKERS};
use montecarlo_pi::{Estimate, Estimator, JoinMode, RunConfig, Strategy, TaskBackend};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Monte Carlo π estimator
///
/// Runs the same sampler single-threaded, as scheduled tasks, and on
/// dedicated threads, and reports each estimate with its timing.
#[derive(Parser, Debug)]
#[command(name = "montecarlo-pi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Total number of samples
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLES)]
    samples: u64,

    /// Number of workers for the concurrent strategies
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Base seed. Worker i uses seed + i; without it, worker i uses i.
    #[arg(long)]
    seed: Option<u64>,

    /// Strategy to run. Runs all three when omitted.
    #[arg(short = 's', long, value_enum)]
    strategy: Option<Strategy>,

    /// Back-end for the task-based strategy
    #[arg(long, value_enum, default_value_t = TaskBackend::Pool)]
    task_backend: TaskBackend,

    /// How the thread-based strategy waits for its workers
    #[arg(long, value_enum, default_value_t = JoinMode::Join)]
    join_mode: JoinMode,
}

fn print_report(strategy: Strategy, estimate: &Estimate, elapsed: Duration) {
    println!("Monte Carlo Pi Estimation ({})", strategy);
    println!("Total samples: {}", estimate.samples);
    println!("Points inside circle: {}", estimate.hits);
    println!("Pi estimate: {:.6}", estimate.value);
    println!("Error: {:.6}", estimate.error());
    println!("Time: {}ms", elapsed.as_millis());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,montecarlo_pi=info")),
        )
        .init();

    let args = Args::parse();

    let estimator = Estimator::new(RunConfig::new(args.samples, args.workers, args.seed))
        .with_task_backend(args.task_backend)
        .with_join_mode(args.join_mode);

    let strategies = match args.strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };

    for (index, strategy) in strategies.into_iter().enumerate() {
        if index > 0 {
            // keeps consecutive runs apart in trace timelines
            thread::sleep(Duration::from_millis(100));
            println!();
        }

        let start = Instant::now();
        match estimator.run(strategy) {
            Ok(estimate) => print_report(strategy, &estimate, start.elapsed()),
            Err(err) => {
                error!(%strategy, %err, "estimation failed");
                eprintln!("{} failed: {}", strategy, err);
                std::process::exit(1);
            }
        }
    }
}
