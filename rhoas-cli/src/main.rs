mod config;
mod display;
mod executor;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;

use rhoas_core::cancel::{self, Cancellation};
use rhoas_core::differ::create_plan;
use rhoas_core::plan::Plan;
use rhoas_core::resource::{Resource, ResourceId};
use rhoas_provider_kafka::KafkaProvider;
use rhoas_state::{LockInfo, StateBackend, StateFile, create_backend};

use crate::config::{ConfigFile, get_schemas, validate_resources};
use crate::display::print_plan;
use crate::executor::Outcome;

#[derive(Parser)]
#[command(name = "rhoas")]
#[command(about = "Provision managed Kafka instances and their ACLs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Show execution plan without applying changes
    Plan {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Apply changes to reach the desired state
    Apply {
        #[arg(default_value = "main.json")]
        file: PathBuf,

        /// Skip confirmation of replacements and deletions
        #[arg(long)]
        auto_approve: bool,
    },
    /// Re-read recorded resources and drop the ones that no longer exist
    Refresh {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Destroy all resources defined in the configuration file
    Destroy {
        #[arg(default_value = "main.json")]
        file: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Plan { file } => run_plan(&file).await,
        Commands::Apply { file, auto_approve } => run_apply(&file, auto_approve).await,
        Commands::Refresh { file } => run_refresh(&file).await,
        Commands::Destroy { file, auto_approve } => run_destroy(&file, auto_approve).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load the configuration and its validated resources
fn load(file: &Path) -> Result<(ConfigFile, Vec<Resource>), String> {
    let config = ConfigFile::load(file)?;
    let resources = config.resources()?;
    validate_resources(&resources, &get_schemas())?;
    Ok((config, resources))
}

/// Fire the returned cancellation on Ctrl-C
fn cancel_on_interrupt() -> Cancellation {
    let (handle, cancellation) = cancel::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "{}",
                "Interrupted, stopping after the current operation...".yellow()
            );
            handle.cancel();
        }
    });
    cancellation
}

fn build_provider(
    config: &ConfigFile,
    cancellation: &Cancellation,
) -> Result<KafkaProvider, String> {
    let provider = KafkaProvider::from_config(&config.provider_config())
        .map_err(|e| e.to_string())?
        .with_cancellation(cancellation.clone());
    Ok(provider)
}

async fn read_state(backend: &dyn StateBackend) -> Result<StateFile, String> {
    let state = backend
        .read_state()
        .await
        .map_err(|e| format!("Failed to read state: {}", e))?;
    Ok(state.unwrap_or_default())
}

async fn acquire_lock(backend: &dyn StateBackend, operation: &str) -> Result<LockInfo, String> {
    let lock = backend
        .acquire_lock(operation)
        .await
        .map_err(|e| e.to_string())?;
    debug!("acquired state lock {}", lock.id);
    Ok(lock)
}

async fn release_lock(backend: &dyn StateBackend, lock: &LockInfo) -> Result<(), String> {
    backend
        .release_lock(lock)
        .await
        .map_err(|e| format!("Failed to release state lock {}: {}", lock.id, e))
}

fn plan_for(resources: &[Resource], state: &StateFile) -> Plan {
    let tainted: HashSet<ResourceId> = state.tainted().collect();
    create_plan(
        resources,
        &state.current_states(),
        &get_schemas(),
        &tainted,
    )
}

/// Ask for "yes" on stdin
fn confirm(question: &str) -> Result<bool, String> {
    println!("{}", question.yellow().bold());
    println!(
        "  {}",
        "This action cannot be undone. Type 'yes' to confirm.".yellow()
    );
    print!("\n  Enter a value: ");
    std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;
    println!();
    Ok(input.trim() == "yes")
}

fn print_outcome(verb: &str, outcome: &Outcome) -> Result<(), String> {
    println!();
    if outcome.failed == 0 && !outcome.cancelled {
        println!(
            "{}",
            format!("{} complete! {} changes applied.", verb, outcome.succeeded)
                .green()
                .bold()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{} failed. {} succeeded, {} failed.",
            verb, outcome.succeeded, outcome.failed
        )
        .red()
        .bold()
    );
    if outcome.cancelled {
        Err(format!("{} interrupted", verb))
    } else {
        Err(format!("{} did not complete", verb))
    }
}

fn run_validate(file: &Path) -> Result<(), String> {
    let (_, resources) = load(file)?;
    println!(
        "{} {} is valid ({} resources)",
        "✓".green(),
        file.display(),
        resources.len()
    );
    Ok(())
}

async fn run_plan(file: &Path) -> Result<(), String> {
    let (config, resources) = load(file)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;
    let state = read_state(backend.as_ref()).await?;

    print_plan(&plan_for(&resources, &state));
    Ok(())
}

async fn run_apply(file: &Path, auto_approve: bool) -> Result<(), String> {
    let (config, resources) = load(file)?;
    let cancellation = cancel_on_interrupt();
    let provider = build_provider(&config, &cancellation)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let lock = acquire_lock(backend.as_ref(), "apply").await?;
    let result = apply_locked(
        &provider,
        backend.as_ref(),
        &resources,
        auto_approve,
        &cancellation,
    )
    .await;
    release_lock(backend.as_ref(), &lock).await?;
    result
}

async fn apply_locked(
    provider: &KafkaProvider,
    backend: &dyn StateBackend,
    resources: &[Resource],
    auto_approve: bool,
    cancellation: &Cancellation,
) -> Result<(), String> {
    let mut state = read_state(backend).await?;
    let plan = plan_for(resources, &state);

    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        return Ok(());
    }

    print_plan(&plan);
    println!();

    if plan.destructive_count() > 0
        && !auto_approve
        && !confirm("This plan replaces or deletes existing instances. Continue?")?
    {
        println!("{}", "Apply cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let outcome = executor::apply_plan(provider, backend, &mut state, &plan, cancellation).await?;
    print_outcome("Apply", &outcome)
}

async fn run_refresh(file: &Path) -> Result<(), String> {
    let (config, _) = load(file)?;
    let provider = build_provider(&config, &cancel_on_interrupt())?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let lock = acquire_lock(backend.as_ref(), "refresh").await?;
    let result = async {
        let Some(mut state) = backend
            .read_state()
            .await
            .map_err(|e| format!("Failed to read state: {}", e))?
        else {
            println!("{}", "No state recorded yet.".yellow());
            return Ok(());
        };

        println!("{}", "Refreshing state...".cyan().bold());
        let refreshed = executor::refresh(&provider, backend.as_ref(), &mut state).await?;
        println!();
        println!(
            "{}",
            format!(
                "Refresh complete! {} updated, {} removed.",
                refreshed.updated, refreshed.removed
            )
            .green()
            .bold()
        );
        Ok(())
    }
    .await;
    release_lock(backend.as_ref(), &lock).await?;
    result
}

async fn run_destroy(file: &Path, auto_approve: bool) -> Result<(), String> {
    let (config, resources) = load(file)?;
    let cancellation = cancel_on_interrupt();
    let provider = build_provider(&config, &cancellation)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let lock = acquire_lock(backend.as_ref(), "destroy").await?;
    let result = destroy_locked(
        &provider,
        backend.as_ref(),
        &resources,
        auto_approve,
        &cancellation,
    )
    .await;
    release_lock(backend.as_ref(), &lock).await?;
    result
}

async fn destroy_locked(
    provider: &KafkaProvider,
    backend: &dyn StateBackend,
    resources: &[Resource],
    auto_approve: bool,
    cancellation: &Cancellation,
) -> Result<(), String> {
    let mut state = read_state(backend).await?;

    let recorded: HashMap<ResourceId, Option<String>> = state
        .resources
        .iter()
        .map(|r| (r.id(), r.identifier.clone()))
        .collect();
    let ids: Vec<ResourceId> = resources
        .iter()
        .map(|r| r.id.clone())
        .filter(|id| recorded.contains_key(id))
        .collect();

    if ids.is_empty() {
        println!("{}", "No recorded resources to destroy.".yellow());
        return Ok(());
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    for id in ids.iter().rev() {
        let identifier = recorded
            .get(id)
            .cloned()
            .flatten()
            .unwrap_or_else(|| "no identifier".to_string());
        println!("  {} {} {}", "-".red().bold(), id, format!("({})", identifier).dimmed());
    }
    println!();
    println!("Plan: {} to destroy.", ids.len().to_string().red());
    println!();

    if !auto_approve && !confirm("Do you really want to destroy all resources?")? {
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let outcome = executor::destroy(provider, backend, &mut state, &ids, cancellation).await?;
    print_outcome("Destroy", &outcome)
}
