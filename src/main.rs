use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clusterforge::cli::{
    compile_file, format_compile_summary, format_validation, format_versions,
    resolve_output_dir, validate_file, versions_add, versions_remove, write_bundle, Cli,
    Commands, VersionsAction,
};
use clusterforge::toolconfig::{default_config_path, load_config_from};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // Load .env file if specified
    if let Some(ref env_file) = cli.env_file {
        if let Err(e) = dotenvy::from_path(env_file) {
            error!("Failed to load env file {}: {}", env_file.display(), e);
            process::exit(1);
        }
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but reported a failure
fn run(cli: Cli) -> Result<bool> {
    let config_path: PathBuf = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config_from(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    match cli.command {
        Commands::Compile(args) => {
            let compiled = compile_file(&args.file, &config)
                .with_context(|| format!("Failed to compile {}", args.file.display()))?;
            let output_dir = resolve_output_dir(args.output.as_deref(), &config);
            let receipt = write_bundle(&compiled, &output_dir)
                .with_context(|| format!("Failed to write bundle to {}", output_dir.display()))?;
            info!("Compiled cluster {}", compiled.settings.cluster_name);
            print!("{}", format_compile_summary(&compiled, Some(&receipt)));
            Ok(true)
        }
        Commands::Validate(args) => {
            let report = validate_file(&args.file, &config);
            print!("{}", format_validation(&report));
            Ok(report.valid)
        }
        Commands::Versions(args) => match args.action.unwrap_or(VersionsAction::List) {
            VersionsAction::List => {
                print!("{}", format_versions(&config.version_matrix()));
                Ok(true)
            }
            VersionsAction::Add {
                k8s_version,
                cri_version,
            } => {
                let previous = versions_add(&mut config, &config_path, &k8s_version, &cri_version)?;
                match previous {
                    Some(old) => println!(
                        "Updated {}: {} -> {} in {}",
                        k8s_version,
                        old,
                        cri_version,
                        config_path.display()
                    ),
                    None => println!(
                        "Added {} -> {} to {}",
                        k8s_version,
                        cri_version,
                        config_path.display()
                    ),
                }
                Ok(true)
            }
            VersionsAction::Remove { k8s_version } => {
                let removed = versions_remove(&mut config, &config_path, &k8s_version)?;
                println!(
                    "Removed {} -> {} from {}",
                    k8s_version,
                    removed,
                    config_path.display()
                );
                Ok(true)
            }
        },
    }
}
