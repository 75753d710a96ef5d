use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use leave_engine::api::{AnniversaryQuery, AppState, create_router};
use leave_engine::config::ConfigLoader;
use leave_engine::models::EmployeeReport;
use leave_engine::reconcile::{AnniversaryReport, LeaveSummary};
use leave_engine::reconcile::{BatchRequest, Reconciler};
use leave_engine::store::{InMemoryStore, Stores};

#[derive(Parser)]
#[command(name = "leave-engine")]
#[command(about = "Leave entitlement and carry-forward reconciliation", long_about = None)]
struct Cli {
    /// Directory holding policy.yaml and reconciliation.yaml
    #[arg(long, global = true, default_value = "./config/default")]
    config: PathBuf,

    /// JSON dataset with employees, leave requests and balances
    #[arg(long, global = true, default_value = "./dataset.json")]
    dataset: PathBuf,

    /// Write reconciled balances back to the dataset file
    #[arg(long, global = true, default_value_t = false)]
    write_back: bool,

    /// Print machine-readable JSON instead of a summary
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every active employee with a hire date
    Batch {
        /// Maximum number of employees
        #[arg(long)]
        limit: Option<usize>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Reconcile one employee
    Employee {
        /// Employee id
        id: String,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Narrate every step and print the trace
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Print per-work-year carry forward for one employee
    Summary {
        /// Employee id
        id: String,
    },

    /// List an employee's work years
    WorkYears {
        /// Employee id
        id: String,

        /// View the work years as of this date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List anniversaries in a date window
    Anniversaries {
        /// First day of the window, defaults to today
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the window, defaults to 30 days after --from
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Summarize one work year of an employee
    LeaveSummary {
        /// Employee id
        id: String,

        /// Work year to summarize, defaults to the current one
        #[arg(long)]
        work_year: Option<u32>,

        /// View the summary as of this date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?
        .into_config();
    let store = Arc::new(
        InMemoryStore::load(&cli.dataset)
            .with_context(|| format!("loading dataset {}", cli.dataset.display()))?,
    );
    let reconciler = Reconciler::from_config(Stores::shared(store.clone()), config);
    info!(
        annual = %reconciler.policy().allocations.annual,
        max_carry_forward = %reconciler.policy().carry_forward.max_total,
        max_concurrency = reconciler.settings().max_concurrency,
        "Configuration loaded"
    );
    let today = Utc::now().date_naive();

    match cli.cmd {
        Commands::Batch { limit, date } => {
            let report = reconciler
                .run_batch(BatchRequest {
                    limit,
                    reference_date: date.unwrap_or(today),
                })
                .await?;
            if cli.json {
                print_json(&report)?;
            } else {
                print!("{}", report);
            }
        }
        Commands::Employee { id, date, verbose } => {
            let report = reconciler
                .run_single(&id, date.unwrap_or(today), verbose)
                .await?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_employee(&report);
            }
        }
        Commands::Summary { id } => {
            let summary = reconciler.carry_forward_summary(&id).await?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("Carry forward for {}", summary.employee_id);
                for wy in &summary.work_years {
                    println!(
                        "  WY{} ({}): carried {} remaining {} used {} advance {}",
                        wy.work_year,
                        wy.leave_year,
                        wy.carried_forward.annual,
                        wy.remaining.annual,
                        wy.used.annual,
                        wy.total_advance
                    );
                }
                println!("  Total carried: {}", summary.total_carried_forward.annual);
                println!("  Total advance: {}", summary.total_advance);
            }
        }
        Commands::WorkYears { id, date } => {
            let overview = reconciler.work_years(&id, date.unwrap_or(today)).await?;
            if cli.json {
                print_json(&overview)?;
            } else {
                println!(
                    "{} hired {}, currently in work year {}",
                    overview.employee_id, overview.hire_date, overview.current_work_year
                );
                for period in &overview.work_years {
                    println!(
                        "  WY{} {} .. {}{}",
                        period.work_year,
                        period.start_date,
                        period.end_date,
                        if period.is_current { "  (current)" } else { "" }
                    );
                }
            }
        }
        Commands::Anniversaries { from, to } => {
            let (from, to) = AnniversaryQuery { from, to }.window(today);
            let report = reconciler.anniversaries(from, to).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_anniversaries(&report);
            }
        }
        Commands::LeaveSummary {
            id,
            work_year,
            date,
        } => {
            let summary = reconciler
                .leave_summary(&id, work_year, date.unwrap_or(today))
                .await?;
            if cli.json {
                print_json(&summary)?;
            } else {
                print_leave_summary(&summary);
            }
        }
        Commands::Serve { addr } => {
            let app = create_router(AppState::new(reconciler));
            info!(%addr, "Serving leave reconciliation API");
            axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server crashed")?;
        }
    }

    if cli.write_back {
        write_back(&store, &cli.dataset).await?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

async fn write_back(store: &InMemoryStore, path: &Path) -> Result<()> {
    let dataset = store.snapshot().await;
    dataset
        .save(path)
        .with_context(|| format!("writing dataset {}", path.display()))?;
    info!(
        path = %path.display(),
        balances = dataset.leave_balances.len(),
        "Dataset written back"
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_employee(report: &EmployeeReport) {
    println!(
        "{} ({}): {}",
        report.display_name,
        report.employee_id,
        if report.success { "reconciled" } else { "FAILED" }
    );
    if let Some(current) = report.current_work_year {
        println!("  Current work year:     {}", current);
    }
    println!("  Work years processed:  {}", report.counts.work_years_processed);
    println!("  Balances created:      {}", report.counts.balances_created);
    println!("  Usage updates:         {}", report.counts.usage_updated);
    println!("  Carry forward fixes:   {}", report.counts.carry_forward_fixed);
    if let Some(error) = &report.error {
        println!("  Error ({}): {}", error.kind, error.message);
    }
    if let Some(trace) = &report.trace {
        println!("Trace:");
        for step in &trace.steps {
            println!("  {:>3}. [{}] {}", step.step_number, step.rule_id, step.reasoning);
        }
        for warning in &trace.warnings {
            println!("  ! {} {}", warning.code, warning.message);
        }
    }
}

fn print_anniversaries(report: &AnniversaryReport) {
    println!(
        "Anniversaries {} .. {}: {} ({} annual days)",
        report.from, report.to, report.total_anniversaries, report.total_annual_allocated
    );
    for entry in &report.entries {
        println!(
            "  {}  {} ({})  WY{} leave year {}, annual {}",
            entry.anniversary_date,
            entry.display_name,
            entry.employee_id,
            entry.work_year,
            entry.leave_year,
            entry.annual_allocation
        );
    }
}

fn print_leave_summary(summary: &LeaveSummary) {
    println!(
        "{} ({}) work year {} (leave year {})",
        summary.display_name, summary.employee_id, summary.work_year, summary.leave_year
    );
    if let Some(period) = &summary.period {
        println!(
            "  Period:     {} .. {}{}",
            period.start_date,
            period.end_date,
            if period.is_current { "  (current)" } else { "" }
        );
    }
    match &summary.balance {
        Some(balance) => {
            for (label, category) in [
                ("Annual", &balance.annual),
                ("Sick", &balance.sick),
                ("Casual", &balance.casual),
            ] {
                println!(
                    "  {:<10}  allocated {} carried {} used {} remaining {}",
                    label,
                    category.allocated,
                    category.carried_forward,
                    category.used,
                    category.remaining
                );
            }
        }
        None => println!("  No balance stored yet"),
    }
    let stats = &summary.statistics;
    println!(
        "  Requests:   {} total, {} approved ({} days), {} pending, {} rejected, {} cancelled",
        stats.total_requests,
        stats.approved,
        stats.total_days_approved,
        stats.pending,
        stats.rejected,
        stats.cancelled
    );
    if let Some(anniversary) = &summary.anniversary {
        println!(
            "  Next anniversary {} in {} days",
            anniversary.next_anniversary, anniversary.days_to_anniversary
        );
    }
}
