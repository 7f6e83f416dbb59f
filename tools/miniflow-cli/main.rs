use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use miniflow::config::Settings;
use miniflow::engine::Executor;
use miniflow::error::ExecuteError;
use miniflow::parse::{self, Workflow};
use miniflow::store::{JsonFileStore, WorkflowRepository};
use miniflow::{codegen, factory, validate};

/// miniflow - validate, generate and run visual workflows
#[derive(Parser, Debug)]
#[command(name = "miniflow")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a settings JSON file (default: built-in settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a workflow file and print every diagnostic
    Validate {
        /// Path to the workflow JSON file
        file: PathBuf,
    },

    /// Generate the engine source for a valid workflow
    Codegen {
        /// Path to the workflow JSON file
        file: PathBuf,

        /// Write the source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a workflow and send it to the execution engine
    Run {
        /// Path to the workflow JSON file
        file: PathBuf,
    },

    /// List stored workflows
    List,

    /// Store a workflow file, replacing any stored workflow with the same id
    Save {
        /// Path to the workflow JSON file
        file: PathBuf,
    },

    /// Create and store an empty workflow
    New {
        /// Workflow name
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;

    match cli.command {
        Commands::Validate { file } => validate_file(&file),
        Commands::Codegen { file, output } => codegen_file(&file, output.as_deref()),
        Commands::Run { file } => run_file(&file, &settings),
        Commands::List => list(&settings),
        Commands::Save { file } => save_file(&file, &settings),
        Commands::New { name } => new_workflow(name, &settings),
    }
}

fn read_workflow(path: &Path) -> Result<Workflow> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read workflow file: {}", path.display()))?;
    parse::parse(&json).with_context(|| format!("invalid workflow file: {}", path.display()))
}

fn store(settings: &Settings) -> JsonFileStore {
    JsonFileStore::new(settings.store_path())
}

fn validate_file(path: &Path) -> Result<ExitCode> {
    let workflow = read_workflow(path)?;
    let diagnostics = validate::validate_workflow(&workflow);

    if diagnostics.is_empty() {
        println!("{}: valid", workflow.name);
        return Ok(ExitCode::SUCCESS);
    }

    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }
    eprintln!("{} validation error(s)", diagnostics.len());
    Ok(ExitCode::FAILURE)
}

fn codegen_file(path: &Path, output: Option<&Path>) -> Result<ExitCode> {
    let workflow = read_workflow(path)?;
    let diagnostics = validate::validate_workflow(&workflow);
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            eprintln!("{}", diagnostic);
        }
        return Ok(ExitCode::FAILURE);
    }

    let source = codegen::generate(&workflow);
    match output {
        Some(out) => {
            fs::write(out, &source)
                .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => print!("{}", source),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_file(path: &Path, settings: &Settings) -> Result<ExitCode> {
    let workflow = read_workflow(path)?;
    let executor = Executor::new(&settings.engine);

    let result = match executor.execute(&workflow) {
        Ok(result) => result,
        Err(ExecuteError::Rejected(diagnostics)) => {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("execution failed"),
    };

    print!("{}", result.stdout);
    eprint!("{}", result.stderr);

    if result.ok {
        Ok(ExitCode::SUCCESS)
    } else {
        // Exit codes outside 1..=255 (including -1) collapse to 1.
        let code = u8::try_from(result.exit_code).ok().filter(|&c| c != 0).unwrap_or(1);
        Ok(ExitCode::from(code))
    }
}

fn list(settings: &Settings) -> Result<ExitCode> {
    let workflows = store(settings).load_all();
    if workflows.is_empty() {
        println!("no stored workflows");
    }
    for w in &workflows {
        println!(
            "{}  {}  ({} nodes, {} edges)",
            w.id,
            w.name,
            w.nodes.len(),
            w.edges.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn save_file(path: &Path, settings: &Settings) -> Result<ExitCode> {
    let workflow = read_workflow(path)?;
    if workflow.id.trim().is_empty() {
        bail!("workflow in {} has an empty id", path.display());
    }
    let store = store(settings);
    store
        .upsert(&workflow)
        .with_context(|| format!("failed to save to {}", store.path().display()))?;
    println!("saved {} ({})", workflow.name, workflow.id);
    Ok(ExitCode::SUCCESS)
}

fn new_workflow(name: Option<String>, settings: &Settings) -> Result<ExitCode> {
    let mut workflow = factory::empty_workflow();
    if let Some(name) = name {
        workflow.name = name;
    }
    let store = store(settings);
    store
        .upsert(&workflow)
        .with_context(|| format!("failed to save to {}", store.path().display()))?;
    println!("{}", workflow.id);
    Ok(ExitCode::SUCCESS)
}
