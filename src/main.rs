// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use fanout_engine::{
    config::OrchestratorConfig,
    engine::{
        DependencyOrchestrator, Flow, FnTask, OrchestrationHooks, OrchestratorBuilder, Runnable, SharedTask, TaskError,
    },
    utils::{format_duration, logging::{self, LoggingUtils}, pluralize},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Runs a main task, then fans out to dependent tasks under one timeout", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3)]
    dependents: usize,

    /// How long each dependent sleeps, in milliseconds
    #[arg(short, long, default_value_t = 500)]
    sleep_ms: u64,

    /// Timeout in seconds; overrides the config file
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Number of dependents that fail instead of finishing
    #[arg(long, default_value_t = 0)]
    fail: usize,

    #[arg(long)]
    skip_fan_out: bool,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    log_file: Option<PathBuf>,

    /// error, warn, info, debug, trace or off; overrides -v
    #[arg(long)]
    log_level: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct DemoHooks {
    progress: ProgressBar,
    skip_fan_out: bool,
}

impl OrchestrationHooks<String> for DemoHooks {
    fn before_main_task(&mut self, dependents: &[SharedTask]) -> Flow {
        println!("{} Running main task before {}", "[*]".blue(), pluralize(dependents.len(), "dependent", "dependents"));
        Flow::Continue
    }

    fn before_dependents(&mut self, main_result: Option<&String>, _dependents: &[SharedTask]) -> Flow {
        if let Some(result) = main_result {
            println!("{} Main task produced {}", "[+]".green(), result);
        }
        if self.skip_fan_out {
            self.progress.finish_and_clear();
            println!("{} Skipping dependent tasks", "[*]".blue());
            return Flow::Skip;
        }
        Flow::Continue
    }

    fn after_dependents(&mut self, _main_result: Option<&String>, _dependents: &[SharedTask]) {
        self.progress.finish_with_message("all dependents done");
    }

    fn on_execution_error(&mut self, _main_result: Option<&String>, _dependents: &[SharedTask], error: &TaskError) {
        self.progress.abandon_with_message(error.to_string());
    }
}

fn load_config(args: &Args) -> anyhow::Result<OrchestratorConfig> {
    let mut config = match args.config {
        Some(ref path) => OrchestratorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => OrchestratorConfig::default(),
    };

    if let Some(timeout) = args.timeout {
        config = config.with_timeout_seconds(timeout);
    }
    if args.verbose > 0 {
        config = config.with_verbose(true);
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(args: &Args, config: &OrchestratorConfig) -> anyhow::Result<()> {
    if args.verbose == 0
        && !config.verbose
        && args.log_level.is_none()
        && args.log_file.is_none()
        && std::env::var_os("RUST_LOG").is_some()
    {
        logging::init_from_env();
        return Ok(());
    }

    let verbosity = if config.verbose { args.verbose.max(2) } else { args.verbose };
    let level = match args.log_level {
        Some(ref name) => LoggingUtils::level_from_str(name),
        None => LoggingUtils::level_from_verbosity(verbosity),
    };

    match args.log_file {
        Some(ref path) => LoggingUtils::init_logger_with_file(level, path)
            .with_context(|| format!("failed to open log file {}", path.display()))?,
        None => LoggingUtils::init_logger(level),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&args, &config)?;

    if args.fail > args.dependents {
        bail!("--fail ({}) cannot exceed --dependents ({})", args.fail, args.dependents);
    }

    let progress = ProgressBar::new(args.dependents as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut builder = OrchestratorBuilder::from_config(&config);
    for index in 0..args.dependents {
        let bar = progress.clone();
        let sleep = Duration::from_millis(args.sleep_ms);
        let fails = index < args.fail;

        builder = builder.with_depending_task(FnTask::new(&format!("dependent-{}", index), move || {
            thread::sleep(sleep);
            bar.inc(1);
            if fails {
                return Err(TaskError::failed(format!("dependent-{} failed on purpose", index)));
            }
            Ok(index)
        }));
    }
    let spec = builder.build()?;

    println!(
        "{} Timeout {}, {}",
        "[*]".blue(),
        format_duration(spec.timeout()),
        pluralize(spec.dependent_count(), "dependent", "dependents")
    );

    let hooks = DemoHooks {
        progress: progress.clone(),
        skip_fan_out: args.skip_fan_out,
    };
    let main_task = FnTask::new("provision", || Ok(String::from("workspace ready")));
    let mut orchestrator = DependencyOrchestrator::with_hooks(main_task, hooks, spec);

    let start = Instant::now();
    let outcome = orchestrator.execute();
    let elapsed = format_duration(start.elapsed());

    match outcome {
        Ok(()) => {
            println!("{} Finished as {} in {}", "[+]".green(), orchestrator.state().to_string().green().bold(), elapsed);
            Ok(())
        }
        Err(err) => {
            for task in orchestrator.dependent_failures() {
                if let Some(task) = task.try_lock() {
                    eprintln!("{} Not done: {}", "[!]".red(), task.name());
                }
            }
            eprintln!("{} Finished as {} in {}", "[!]".red(), orchestrator.state().to_string().red().bold(), elapsed);
            Err(err.into())
        }
    }
}
