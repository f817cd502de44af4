use anyhow::Result;
use backup_now::config::{self, GroupIssue};
use backup_now::managers;
use backup_now::managers::backup::{BackupManager, GroupOutcome};
use backup_now::utils::RealExecutor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "backup-now")]
#[command(about = "Configuration-driven backups through an external archiver", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, default_value = "backup-config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up all groups or a specific group
    Run {
        /// Specific group to back up (defaults to all groups)
        #[arg(short, long)]
        group: Option<String>,

        /// Show what would be archived without running the archiver
        #[arg(long)]
        dry_run: bool,
    },

    /// List all configured groups
    List,

    /// Show the last successful backup of each group
    Status,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        group: None,
        dry_run: false,
    });

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            managers::logging::init_console_logging();
            managers::backup::report_config_error(&cli.config, &e);
            eprintln!("Configuration unusable: {}", e);
            // A run with nothing to process still ends normally
            if matches!(command, Commands::Run { .. }) {
                return Ok(());
            }
            std::process::exit(1);
        }
    };

    // Setup logging (must keep guard alive)
    let logging_config = managers::logging::LoggingConfig::from_config(
        config.global.log_directory.as_deref(),
        &config.global.log_level,
        config.global.log_max_files,
    );
    let _log_guard = managers::logging::init_logging(&logging_config)?;

    match command {
        Commands::Run { group, dry_run } => {
            let backup_manager =
                BackupManager::new(config, Box::new(RealExecutor::new())).with_dry_run(dry_run);
            let summary = backup_manager.run(group.as_deref())?;

            for (name, outcome) in &summary.outcomes {
                match outcome {
                    GroupOutcome::Archived(archive) => {
                        println!("✓ {}: {}", name, archive.display())
                    }
                    GroupOutcome::Unchanged => println!("- {}: no changes", name),
                    GroupOutcome::Invalid => println!("✗ {}: invalid configuration", name),
                    GroupOutcome::Failed(error) => println!("✗ {}: {}", name, error),
                    GroupOutcome::Planned { archive, files } => {
                        println!("~ {}: {} files -> {}", name, files, archive.display())
                    }
                }
            }
            println!(
                "{} archived, {} unchanged, {} invalid, {} failed",
                summary.archived(),
                summary.unchanged(),
                summary.invalid(),
                summary.failed()
            );
        }

        Commands::List => {
            let backup_manager = BackupManager::new(config, Box::new(RealExecutor::new()));
            println!("Configured groups:");
            for status in backup_manager.group_status() {
                println!("  {}", status.name);
                println!("    Mode: {}", status.mode);
                println!(
                    "    Sources: {}",
                    status
                        .sources
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("    Destination: {}", status.destination.display());
                println!();
            }
        }

        Commands::Status => {
            let backup_manager = BackupManager::new(config, Box::new(RealExecutor::new()));
            for status in backup_manager.group_status() {
                let last = match (status.valid, status.last_backup) {
                    (false, _) => "invalid configuration".to_string(),
                    (true, Some(time)) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
                    (true, None) => "never".to_string(),
                };
                println!("{:<24} {:<12} {}", status.name, status.mode.to_string(), last);
            }
        }

        Commands::Validate => {
            let issues = config::validate_groups(&config);
            let mut errors = 0;

            for issue in &issues {
                match issue {
                    GroupIssue::Invalid { .. } => {
                        errors += 1;
                        println!("✗ {}", issue);
                    }
                    GroupIssue::SharedDestination { .. } => println!("⚠ {}", issue),
                }
            }

            match which::which(&config.global.archiver_path) {
                Ok(path) => println!("Archiver: {}", path.display()),
                Err(_) => {
                    errors += 1;
                    println!(
                        "✗ Archiver not found: {}",
                        config.global.archiver_path.display()
                    );
                }
            }

            if config.backup_groups.is_empty() {
                println!("⚠ Configuration is missing backup groups.");
            }

            if errors > 0 {
                std::process::exit(1);
            }
            println!("Configuration is valid!");
            println!("Groups: {}", config.backup_groups.len());
        }
    }

    Ok(())
}
