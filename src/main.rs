//! Planrun - run markdown plan documents with bounded concurrency
//!
//! Parses a plan document (phases, checkbox tasks, priority markers) and
//! either prints its summary or executes every selected task through the
//! bounded-concurrency runner via a shell command template.

use anyhow::Context;
use clap::Parser;
use planrun::config::AppConfig;
use planrun::plan::{PlanDocument, PlanTask};
use planrun::runner::{run_tasks, RunnerConfig, TaskError};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "planrun")]
#[command(version = "0.1.0")]
#[command(about = "Run markdown plan tasks with bounded concurrency", long_about = None)]
struct Args {
    /// Plan document to execute
    plan: PathBuf,

    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum concurrent tasks (clamped to 1-5)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Shell command run per task; {id} and {title} are substituted
    #[arg(long)]
    command: Option<String>,

    /// Run only the given phase ids (repeatable)
    #[arg(long = "phase")]
    phases: Vec<String>,

    /// Also run tasks already checked off
    #[arg(long)]
    include_completed: bool,

    /// Enable verbose progress output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Load configuration, then apply CLI overrides
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }
    if args.verbose {
        config.verbose = true;
    }
    if let Some(command) = args.command {
        config.command = Some(command);
    }
    config.validate()?;

    let contents = std::fs::read_to_string(&args.plan)
        .with_context(|| format!("failed to read plan {:?}", args.plan))?;
    let doc = PlanDocument::parse(&contents);
    let tasks = select_tasks(&doc, &args.phases, args.include_completed);

    let Some(template) = config.command.clone() else {
        print_summary(&doc, tasks.len());
        return Ok(());
    };

    if tasks.is_empty() {
        println!("No tasks to run.");
        return Ok(());
    }

    tracing::info!(
        tasks = tasks.len(),
        concurrency = config.max_concurrency,
        "executing plan"
    );

    let runner_config = RunnerConfig::default()
        .with_concurrency(config.max_concurrency)
        .with_verbose(config.verbose)
        .with_completion(|task: &PlanTask, outcome| {
            let icon = if outcome.is_error() { "❌" } else { "✅" };
            println!("{icon} {} - {}", task.id, task.title);
        });

    let total = tasks.len();
    let outcomes = run_tasks(
        tasks,
        move |task| run_command(template.clone(), task),
        runner_config,
    )
    .await;

    let errors = outcomes.iter().filter(|o| o.is_error()).count();
    println!("\nCompleted {}/{} task(s), {} error(s)", total, total, errors);

    for outcome in outcomes.iter().filter(|o| o.is_error()) {
        if let Some(error) = outcome.error() {
            println!("  {} failed: {}", outcome.task_id(), error);
        }
    }

    if errors > 0 {
        anyhow::bail!("{errors} task(s) failed");
    }
    Ok(())
}

/// Initialize logging
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "planrun=debug,info"
    } else {
        "planrun=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Pick the tasks to run: optional phase filter, pending-only by default.
fn select_tasks(doc: &PlanDocument, phases: &[String], include_completed: bool) -> Vec<PlanTask> {
    doc.phases
        .iter()
        .filter(|phase| phases.is_empty() || phases.contains(&phase.id))
        .flat_map(|phase| phase.tasks.iter())
        .filter(|task| include_completed || !task.complete)
        .cloned()
        .collect()
}

/// Render the command template and run it through `sh -c`.
async fn run_command(template: String, task: PlanTask) -> Result<String, TaskError> {
    let command = render_template(&template, &task);

    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&command)
        .output()
        .await
        .map_err(|e| TaskError::new("SPAWN_FAILED", e.to_string()))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(TaskError::new(
            "COMMAND_FAILED",
            format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        ))
    }
}

fn render_template(template: &str, task: &PlanTask) -> String {
    template
        .replace("{id}", &task.id)
        .replace("{title}", &task.title)
}

/// Print the parsed plan without executing anything.
fn print_summary(doc: &PlanDocument, selected: usize) {
    if let Some(title) = &doc.title {
        println!("📋 Plan: {title}\n");
    }

    for phase in &doc.phases {
        println!("Phase {}: {}", phase.id, phase.name);
        for task in &phase.tasks {
            let icon = if task.complete { "✅" } else { "⏳" };
            println!("  {icon} {} - {} ({})", task.id, task.title, task.priority);
        }
        println!();
    }

    println!(
        "{} of {} task(s) selected; pass --command to execute them.",
        selected,
        doc.task_count()
    );
}
