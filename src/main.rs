//! Lifeplan CLI
//!
//! Command-line interface for running household cash-flow projections

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lifeplan_engine::{
    assumptions::load_assumptions,
    projection::export::write_records_csv,
    Assumptions, Clock, FixedClock, ScenarioComparison, ScenarioRunner, Snapshot, SnapshotStore,
    SystemClock, TimeHorizon,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HorizonArg {
    Short,
    Medium,
    Long,
}

impl From<HorizonArg> for TimeHorizon {
    fn from(arg: HorizonArg) -> Self {
        match arg {
            HorizonArg::Short => TimeHorizon::Short,
            HorizonArg::Medium => TimeHorizon::Medium,
            HorizonArg::Long => TimeHorizon::Long,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lifeplan", about = "Project household cash flow and assets year by year")]
struct Args {
    /// Assumptions JSON file; built-in defaults when omitted
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Display name of the primary scenario
    #[arg(long, default_value = "Base")]
    name: String,

    /// Also project the optimistic scenario (+1pt return, -0.5pt inflation) and print deltas
    #[arg(long)]
    compare: bool,

    /// Years shown in the table
    #[arg(long, value_enum, default_value_t = HorizonArg::Long)]
    horizon: HorizonArg,

    /// Treat years up to this one as real data (defaults to the current year)
    #[arg(long)]
    as_of_year: Option<i32>,

    /// Print final assets for investment return shifts of -2pt to +2pt
    #[arg(long)]
    sweep: bool,

    /// Write the shown years of the primary scenario to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let assumptions = match &args.assumptions {
        Some(path) => load_assumptions(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::default_plan(),
    };

    let clock: Arc<dyn Clock> = match args.as_of_year {
        Some(year) => Arc::new(
            FixedClock::at_year(year)
                .with_context(|| format!("as-of year {} is out of range", year))?,
        ),
        None => Arc::new(SystemClock),
    };
    let as_of_year = clock.current_year();
    let mut store = SnapshotStore::with_clock(clock);
    let _log = store.subscribe(|snapshot| {
        log::info!("Snapshot ready: {} ({})", snapshot.name, snapshot.assumptions_hash);
    });

    let primary = store
        .create_snapshot(assumptions.clone(), Some(args.name.as_str()))
        .context("projecting primary scenario")?;
    let horizon = TimeHorizon::from(args.horizon);

    print_table(&primary, horizon);
    print_summary(&primary);

    if args.compare {
        let comparison = store
            .create_snapshot(assumptions.optimistic(), Some("Optimistic"))
            .context("projecting comparison scenario")?;
        println!();
        print_summary(&comparison);
        let cmp = ScenarioComparison::between(&primary, &comparison)
            .context("comparing scenarios")?;
        print_comparison(&cmp);
    }

    if args.sweep {
        let runner = ScenarioRunner::new(assumptions, as_of_year);
        println!("\nReturn sensitivity:");
        for outcome in runner.run_scenarios(&ScenarioRunner::return_sweep(-2.0, 2.0, 0.5)) {
            let outcome = outcome.context("projecting sweep scenario")?;
            println!("  {:<16} Final Assets: ¥{:>14}", outcome.name, outcome.summary.final_assets);
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_records_csv(primary.series.within(horizon), BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nResults written to: {}", path.display());
    }

    Ok(())
}

fn print_table(snapshot: &Snapshot, horizon: TimeHorizon) {
    let records = snapshot.series.within(horizon);
    println!(
        "Projection '{}' ({} of {} years):",
        snapshot.name,
        records.len(),
        snapshot.series.len()
    );
    println!("{:>5} {:>4} {:>12} {:>12} {:>12} {:>12} {:>14} {:>5}",
        "Year", "Age", "Income", "Expense", "Events", "CashFlow", "Assets", "Real");
    println!("{}", "-".repeat(84));

    for r in records {
        println!("{:>5} {:>4} {:>12} {:>12} {:>12} {:>12} {:>14} {:>5}",
            r.year,
            r.primary_age,
            r.income,
            r.expense,
            r.event_cost,
            r.annual_cash_flow,
            r.cumulative_assets,
            if r.is_real_data { "yes" } else { "" },
        );
    }
}

fn print_summary(snapshot: &Snapshot) {
    println!("\nSummary ({}):", snapshot.name);
    println!("  Final Assets: ¥{}", snapshot.final_assets);
    println!("  Average Annual Cash Flow: ¥{}", snapshot.average_annual_cash_flow);
    match snapshot.years_until_negative {
        Some(years) => println!("  Assets exhausted after {} years", years),
        None => println!("  Assets never exhausted"),
    }
    println!("  Trend: {:?}", snapshot.trend());
}

fn print_comparison(cmp: &ScenarioComparison) {
    println!("\nComparison ({} vs {}):", cmp.primary_name, cmp.comparison_name);
    println!("  Final Assets Delta: ¥{}", cmp.final_assets_delta);
    println!("  Average Cash Flow Delta: ¥{}", cmp.average_cash_flow_delta);
}
