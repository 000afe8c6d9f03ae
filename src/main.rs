//! tasklane - lossless checklist task line codec
//!
//! Command-line front end: list, inspect, move and archive markdown
//! checklist tasks without disturbing the surrounding text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use tasklane::{
    classify, validate_markers, BoardConfig, LineClass, MarkerKind, Task, TaskContext,
    TaskDocument, TaskLaneError,
};

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(version = "0.1.0")]
#[command(about = "Parse, move and archive markdown checklist tasks losslessly", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory used to find .tasklane/settings.json
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Explicit settings file (overrides project and user settings)
    #[arg(long, global = true, value_name = "FILE", env = "TASKLANE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracked tasks in a markdown file
    List {
        /// Markdown file to scan
        file: PathBuf,

        /// Only show tasks in this column
        #[arg(long)]
        column: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single line and show how it decomposes
    Inspect {
        /// The raw line, e.g. "- [ ] Call the bank #today"
        #[arg(allow_hyphen_values = true)]
        line: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Archive the task on a line: mark it done and move it to #archived
    Archive {
        /// Markdown file containing the task
        file: PathBuf,

        /// 1-based line number of the task
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,

        /// Print the change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Move the task on a line to another column
    Move {
        /// Markdown file containing the task
        file: PathBuf,

        /// 1-based line number of the task
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,

        /// Target column display name
        #[arg(long)]
        column: String,

        /// Print the change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate status marker strings
    Markers {
        /// Done markers to check (defaults to the configured value)
        #[arg(long, allow_hyphen_values = true)]
        done: Option<String>,

        /// Ignored markers to check (defaults to the configured value)
        #[arg(long, allow_hyphen_values = true)]
        ignored: Option<String>,
    },

    /// Show or validate board configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Validate,

    /// Show configuration file paths
    Paths,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "tasklane=debug,info"
    } else {
        "tasklane=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            let code = e
                .downcast_ref::<TaskLaneError>()
                .map_or(1, TaskLaneError::exit_code);
            std::process::exit(code);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = BoardConfig::resolve(&cli.project, cli.config.as_deref())?;

    match cli.command {
        Commands::List { file, column, json } => {
            let context = Arc::new(config.context()?);
            let doc = read_document(&file)?;
            let tasks: Vec<Task> = doc
                .tasks(&context)
                .into_iter()
                .filter(|task| column.as_deref().is_none_or(|c| task.column() == Some(c)))
                .collect();

            if json {
                let snapshots: Vec<_> = tasks.iter().map(Task::snapshot).collect();
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else if tasks.is_empty() {
                println!("No tasks found in {}", file.display());
            } else {
                println!(
                    "\n{} {} ({} task(s))",
                    "Tasks:".cyan().bold(),
                    file.display(),
                    tasks.len()
                );
                println!("{}", "─".repeat(40));
                for task in &tasks {
                    print_task_row(task);
                }
            }
        }

        Commands::Inspect { line, json } => {
            let context = Arc::new(config.context()?);
            return Ok(inspect_line(&line, &context, json)?);
        }

        Commands::Archive {
            file,
            line,
            dry_run,
        } => {
            let context = Arc::new(config.context()?);
            update_task(&file, line, &context, dry_run, Task::archive)?;
        }

        Commands::Move {
            file,
            line,
            column,
            dry_run,
        } => {
            let context = Arc::new(config.context()?);
            if context.column_table().tag_for(&column).is_none() {
                eprintln!(
                    "{} '{}' is not a configured column; it will be written as #{}",
                    "Warning:".yellow().bold(),
                    column,
                    context.column_table().hashtag_for(&column)
                );
            }
            update_task(&file, line, &context, dry_run, |task| {
                task.set_column(column.clone());
            })?;
        }

        Commands::Markers { done, ignored } => {
            let done = done.unwrap_or(config.done_status_markers);
            let ignored = ignored.unwrap_or(config.ignored_status_markers);

            let mut valid = true;
            for (kind, markers) in [(MarkerKind::Done, &done), (MarkerKind::Ignored, &ignored)] {
                let violations = validate_markers(markers, kind);
                if violations.is_empty() {
                    println!("{} {} status markers {:?}", "OK".green(), kind, markers);
                } else {
                    valid = false;
                    println!(
                        "{} {} status markers {:?}",
                        "Invalid".red().bold(),
                        kind,
                        markers
                    );
                    for violation in violations {
                        println!("   \u{2717} {violation}");
                    }
                }
            }
            return Ok(if valid { 0 } else { 1 });
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("\n{} Board Configuration", "Config:".cyan().bold());
                    println!("{}", "─".repeat(40));
                    println!("   Columns: {}", config.columns.join(", "));
                    println!("   Done status markers: {}", config.done_status_markers);
                    println!(
                        "   Ignored status markers: {}",
                        if config.ignored_status_markers.is_empty() {
                            "(none)"
                        } else {
                            &config.ignored_status_markers
                        }
                    );
                    println!("   Consolidate tags: {}", config.consolidate_tags);
                    println!("   Scope: {}", config.scope);
                    println!("   Show filepath: {}", config.show_filepath);
                    println!("   Prevent uncategorized: {}", config.prevent_uncategorized);
                    if !config.collapsed_columns.is_empty() {
                        println!(
                            "   Collapsed columns: {}",
                            config.collapsed_columns.join(", ")
                        );
                    }
                }
            }

            ConfigAction::Validate => {
                let report = config.validate();
                for error in &report.errors {
                    println!("   {} {}", "\u{2717}".red(), error);
                }
                for warning in &report.warnings {
                    println!("   {} {}", "\u{26a0}".yellow(), warning);
                }
                if report.is_valid() {
                    println!("{} {}", "OK".green(), report.summary());
                } else {
                    println!("{} {}", "Error:".red().bold(), report.summary());
                }
                return Ok(report.exit_code());
            }

            ConfigAction::Paths => {
                if let Some(explicit) = &cli.config {
                    print_path("explicit", explicit);
                }
                let mut labels = ["project", "user"].into_iter();
                for path in BoardConfig::search_paths(&cli.project) {
                    print_path(labels.next().unwrap_or("other"), &path);
                }
            }
        },
    }

    Ok(0)
}

fn read_document(file: &Path) -> anyhow::Result<TaskDocument> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(TaskDocument::new(file, &text))
}

/// Apply `mutate` to the task on 1-based `line` and write the file back.
fn update_task(
    file: &Path,
    line: u64,
    context: &Arc<TaskContext>,
    dry_run: bool,
    mutate: impl FnOnce(&mut Task),
) -> anyhow::Result<()> {
    let mut doc = read_document(file)?;
    let row = usize::try_from(line - 1).context("line number out of range")?;

    let mut task = doc
        .task_at(row, context)
        .ok_or_else(|| TaskLaneError::NoTaskAtRow {
            row,
            path: file.to_path_buf(),
        })?;

    let before = task.serialise();
    mutate(&mut task);
    let after = task.serialise();

    println!("{} {}", "-".red(), before);
    println!("{} {}", "+".green(), after);

    if dry_run {
        println!("{}", "Dry run: file not written".dimmed());
        return Ok(());
    }

    if before == after {
        debug!("Line {} unchanged, skipping write", line);
        return Ok(());
    }

    doc.replace(&task)?;
    std::fs::write(file, doc.render())
        .with_context(|| format!("failed to write {}", file.display()))?;
    println!("{} {}:{}", "Updated".green(), file.display(), line);
    Ok(())
}

fn inspect_line(line: &str, context: &Arc<TaskContext>, json: bool) -> tasklane::Result<i32> {
    let class = classify(line, context.ignored_markers());

    let LineClass::Tracked(_) = class else {
        let reason = match class {
            LineClass::Ignored(c) => format!("status '{c}' is an ignored marker"),
            LineClass::Backlink => "wikilink, not a checkbox".to_string(),
            LineClass::Hyperlink => "markdown link, not a checkbox".to_string(),
            _ => "no checkbox".to_string(),
        };
        if json {
            println!("{}", serde_json::json!({ "tracked": false, "reason": reason }));
        } else {
            println!("{} {}", "Not tracked:".yellow().bold(), reason);
        }
        return Ok(1);
    };

    let task = Task::parse(line, "<inline>", 0, context)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task.snapshot())?);
    } else {
        println!("{}", "Tracked task".green().bold());
        println!("   Indentation: {:?}", task.indentation());
        println!("   Status: {:?} (done: {})", task.status(), task.done());
        println!("   Content: {}", task.content());
        println!("   Column: {}", task.column().unwrap_or("(uncategorised)"));
        let tags: Vec<&str> = task.tags().iter().map(String::as_str).collect();
        println!("   Tags: {}", tags.join(", "));
        println!("   Block link: {}", task.block_link().unwrap_or("(none)"));
        println!("   Serialised: {}", task.serialise());
    }
    Ok(0)
}

fn print_task_row(task: &Task) {
    let status = format!("[{}]", task.status());
    let status = if task.done() {
        status.as_str().green()
    } else {
        status.as_str().normal()
    };
    let column = task.column().unwrap_or("-");
    let mut line = format!(
        "{:>5}  {}  {:<12}  {}",
        task.row() + 1,
        status,
        column,
        task.content()
    );
    if let Some(link) = task.block_link() {
        line.push_str(&format!(" {}", format!("^{link}").as_str().dimmed()));
    }
    println!("{line}");
}

fn print_path(label: &str, path: &Path) {
    let marker = if path.exists() {
        "\u{2713}".green()
    } else {
        "\u{2717}".dimmed()
    };
    println!("   {} [{}] {}", marker, label, path.display());
}
