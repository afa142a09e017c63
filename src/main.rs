/*!
 * turnsched - Command-line driver
 *
 * Builds a scheduler from the environment and flags, turns `lane:item`
 * orders into tasks from the house menu, runs them, and prints the final
 * queues and counters.
 */

use clap::Parser;
use miette::IntoDiagnostic;
use serde::Serialize;
use tracing::{info, warn};

use turn_scheduler::{
    init_tracing, RunReport, Scheduler, SchedulerConfig, SchedulerSnapshot, SessionSpan,
    TaskFactory,
};

#[derive(Parser, Debug)]
#[command(name = "turnsched", version, about = "Turn-based multi-level task scheduler")]
struct Cli {
    /// Number of queue levels (1 = plain round robin)
    #[arg(long)]
    levels: Option<usize>,

    /// Work units applied per turn
    #[arg(short, long)]
    quantum: Option<u64>,

    /// Admission limit per queue
    #[arg(long)]
    capacity: Option<usize>,

    /// Stop after this many turns instead of draining every queue
    #[arg(long)]
    steps: Option<u64>,

    /// Skip this level once (repeatable)
    #[arg(long = "skip")]
    skips: Vec<usize>,

    /// Print the event journal
    #[arg(long)]
    events: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the menu and exit
    #[arg(long)]
    menu: bool,

    /// Orders as `lane:item` (or a bare item for the default lane)
    orders: Vec<String>,
}

#[derive(Serialize)]
struct Output<'a> {
    report: RunReport,
    snapshot: &'a SchedulerSnapshot,
    rejected: &'a [Rejection],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<turn_scheduler::SchedulerEvent>,
}

#[derive(Serialize)]
struct Rejection {
    order: String,
    error: turn_scheduler::SchedulerError,
}

fn main() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut factory = TaskFactory::default();
    if cli.menu {
        for (name, burst) in factory.menu().items() {
            println!("{:<16}{}", name, burst);
        }
        return Ok(());
    }

    let mut config = SchedulerConfig::from_env()?;
    if let Some(levels) = cli.levels {
        config.levels = levels;
    }
    if let Some(quantum) = cli.quantum {
        config.quantum = quantum;
    }
    if let Some(capacity) = cli.capacity {
        config.queue_capacity = Some(capacity);
    }
    config.record_events |= cli.events;

    let mut scheduler = Scheduler::new(config)?;
    let session = SessionSpan::new(scheduler.levels(), scheduler.quantum());
    let _entered = session.enter();

    let mut rejected = Vec::new();
    for order in &cli.orders {
        let admitted = factory
            .order_spec(order)
            .and_then(|task| scheduler.add_task(task));
        if let Err(error) = admitted {
            warn!(order = %order, error = %error, "Order rejected");
            rejected.push(Rejection {
                order: order.clone(),
                error,
            });
        }
    }

    for level in &cli.skips {
        scheduler.skip_level(*level)?;
    }

    let report = match cli.steps {
        Some(steps) => scheduler.run_turns(steps)?,
        None => scheduler.run()?,
    };
    session.record_report(&report);
    session.record_rejected(rejected.len());
    info!(
        turns = report.turns,
        minutes_worked = report.minutes_worked,
        completed = report.completed,
        "Scheduler finished"
    );

    let snapshot = scheduler.snapshot();
    let events = scheduler.drain_events();

    if cli.json {
        let output = Output {
            report,
            snapshot: &snapshot,
            rejected: &rejected,
            events,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
        return Ok(());
    }

    for rejection in &rejected {
        println!("rejected {}: {}", rejection.order, rejection.error);
    }
    for event in &events {
        println!("{}", event);
    }
    print!("{}", snapshot);
    println!("display {}", factory.menu());
    println!(
        "turns={} minutes_worked={} completed={}",
        report.turns, report.minutes_worked, report.completed
    );

    Ok(())
}
