use clap::Parser;
use mdscaffold::{Cli, OutputFormatter, OutputMode, ScaffoldError, Scaffolder, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let scaffolder = match Scaffolder::from_cli(&cli) {
        Ok(scaffolder) => scaffolder,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    let outcome = if cli.dry_run {
        scaffolder.plan()
    } else {
        scaffolder.run()
    };

    match outcome {
        Ok(Some(report)) => {
            scaffolder.output_formatter().print_report(&report);
            0
        }
        // Nothing extracted; the diagnostic has already been printed.
        Ok(None) => 0,
        Err(e) => {
            scaffolder.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "mdscaffold.toml".to_string());

    match Scaffolder::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  mdscaffold --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ScaffoldError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
