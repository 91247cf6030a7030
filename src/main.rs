use anyhow::Result;
use clap::Parser;
use schema_breaking_changes::compat::{BreakingConfig, rule_registry};
use schema_breaking_changes::logging;
use schema_breaking_changes::snapshot::{Compatibility, Snapshot};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "diff-processor")]
#[command(about = "Detect breaking changes between two versions of a provider schema")]
#[command(version)]
struct Args {
    #[arg(long, global = true, help = "Default log level when RUST_LOG is unset")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    #[command(about = "Check for breaking changes between two schema files")]
    Breaking {
        #[arg(help = "Path to the old schema file (JSON or YAML)")]
        old_file: PathBuf,
        #[arg(help = "Path to the new schema file (JSON or YAML)")]
        new_file: PathBuf,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long, help = "YAML configuration file with a `breaking` section")]
        config: Option<PathBuf>,
        #[arg(long, help = "Rule identifiers to use (comma-separated)")]
        use_rules: Option<String>,
        #[arg(long, help = "Categories to use (comma-separated)")]
        use_categories: Option<String>,
        #[arg(long, help = "Rule identifiers to exclude (comma-separated)")]
        except_rules: Option<String>,
    },
    #[command(about = "Compare two schema files for compatibility")]
    Compare {
        #[arg(help = "Path to the old schema file")]
        old_file: PathBuf,
        #[arg(help = "Path to the new schema file")]
        new_file: PathBuf,
        #[arg(long, help = "List the breaking changes found")]
        detailed: bool,
    },
    #[command(about = "Print the schema diff between two schema files as JSON")]
    Diff {
        #[arg(help = "Path to the old schema file")]
        old_file: PathBuf,
        #[arg(help = "Path to the new schema file")]
        new_file: PathBuf,
    },
    #[command(about = "Generate the fingerprint of a schema file")]
    Fingerprint {
        #[arg(help = "Path to the schema file")]
        file: PathBuf,
    },
    #[command(about = "List the breaking change rules")]
    Rules {
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: RulesFormat,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum RulesFormat {
    Text,
    Markdown,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.log_level {
        Some(level) => logging::init_logging_with_level(level),
        None => logging::init_logging(),
    }

    match args.command {
        Commands::Breaking {
            old_file,
            new_file,
            format,
            config,
            use_rules,
            use_categories,
            except_rules,
        } => {
            let old_snapshot = Snapshot::try_from_file(&old_file)?;
            let new_snapshot = Snapshot::try_from_file(&new_file)?;

            let mut config = match config {
                Some(path) => BreakingConfig::from_yaml_file(path)?,
                None => BreakingConfig::default(),
            };
            if let Some(rules) = use_rules {
                config.use_rules = split_list(&rules);
            }
            if let Some(categories) = use_categories {
                config.use_categories = split_list(&categories);
            }
            if let Some(except) = except_rules {
                config.except_rules.extend(split_list(&except));
            }
            config.validate()?;

            let breaking_result =
                old_snapshot.check_breaking_changes_with_config(&new_snapshot, &config);

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&breaking_result)?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    if breaking_result.has_breaking_changes {
                        println!("Breaking changes detected:");
                        for change in &breaking_result.changes {
                            println!("  - {}", change.message);
                            println!("    Rule: {}", change.rule_name);
                            println!("    Docs: {}", change.documentation_reference);
                        }
                        println!();
                        println!("Summary:");
                        println!("  Total breaking changes: {}", breaking_result.changes.len());
                        for (resource, count) in &breaking_result.summary {
                            println!("  {}: {}", resource, count);
                        }
                        println!("  Rules executed: {}", breaking_result.executed_rules.len());
                    } else {
                        println!("No breaking changes detected.");
                        println!("Rules executed: {}", breaking_result.executed_rules.len());
                    }
                }
            }

            if breaking_result.has_breaking_changes {
                std::process::exit(1);
            }
        }
        Commands::Compare {
            old_file,
            new_file,
            detailed,
        } => {
            let old_snapshot = Snapshot::try_from_file(&old_file)?;
            let new_snapshot = Snapshot::try_from_file(&new_file)?;

            match old_snapshot.compare_with(&new_snapshot) {
                Compatibility::Green => {
                    println!("Green: Schemas are identical");
                }
                Compatibility::Yellow => {
                    println!("Yellow: New schema is backward-compatible with old schema");
                    if detailed {
                        let diff = old_snapshot.diff(&new_snapshot);
                        println!("Detailed analysis: {} resources changed", diff.len());
                    }
                }
                Compatibility::Red => {
                    println!("Red: Breaking change detected");
                    if detailed {
                        let breaking_result = old_snapshot.check_breaking_changes(&new_snapshot);
                        for change in &breaking_result.changes {
                            println!("  - {}", change.message);
                        }
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Diff { old_file, new_file } => {
            let old_snapshot = Snapshot::try_from_file(&old_file)?;
            let new_snapshot = Snapshot::try_from_file(&new_file)?;
            let diff = old_snapshot.diff(&new_snapshot);
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        Commands::Fingerprint { file } => {
            let snapshot = Snapshot::try_from_file(&file)?;
            println!("{}", snapshot.fingerprint);
        }
        Commands::Rules { format } => match format {
            RulesFormat::Markdown => print!("{}", rule_registry::render_markdown()),
            RulesFormat::Text => {
                for group in rule_registry::get_rules() {
                    println!("{} ({})", group.category.name(), group.category.id());
                    for rule in group.rules {
                        let note = if rule.undetectable() {
                            " [not detected]"
                        } else {
                            ""
                        };
                        println!("  {}: {}{}", rule.identifier(), rule.name(), note);
                    }
                }
            }
        },
    }

    Ok(())
}
