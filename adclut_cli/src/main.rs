mod cli;
mod error_fmt;
mod generate;
mod logging;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE};
use eyre::WrapErr;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if !cli.json {
        let _ = color_eyre::install();
    }

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "adclut failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&e));
        } else {
            eprintln!("{}", error_fmt::humanize(&e));
        }
        std::process::exit(error_fmt::exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = match &cli.config {
        Some(path) => adclut_config::load_config_file(path)?,
        None => adclut_config::Config::default(),
    };
    cfg.validate().wrap_err("invalid configuration")?;
    logging::init(cli.log_level, cli.json, &cfg.logging)?;

    match cli.cmd {
        Commands::Generate {
            dataset,
            output,
            name,
            polynomial,
        } => {
            let calibration =
                generate::run_generate(&cfg, &dataset, &output, name.as_deref(), polynomial)?;
            generate::print_generate(&calibration, &output, cli.json);
        }
        Commands::Report {
            dataset,
            polynomial,
        } => {
            let (calibration, report) = generate::run_report(&cfg, &dataset, polynomial)?;
            generate::print_report(&calibration, &report, cli.json);
        }
        Commands::CheckConfig => {
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("Configuration OK.");
            }
        }
    }
    Ok(())
}
