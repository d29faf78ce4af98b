use heatplate::args::*;
use heatplate::driver::*;
use heatplate::solver::*;

fn run(args: &Args) -> heatplate::Result<BatchSummary> {
    let mut solver: Box<dyn SolverInterface> = if args.serial {
        Box::new(SerialSolver)
    } else {
        Box::new(ParallelSolver::new(args.threads())?)
    };
    solver.print_report();
    run_batch(&args.batch_config(), solver.as_mut())
}

fn main() {
    let args = Args::cli_setup("heatplate");

    let start = std::time::Instant::now();
    let outcome = run(&args);
    args.finish();

    match outcome {
        Ok(summary) => {
            log::info!(
                "{} plates, {} iterations in {:?}",
                summary.plates,
                summary.iterations,
                start.elapsed()
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
