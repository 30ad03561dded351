mod cli;
mod error;
mod output;
mod prompt;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitebuild_core::Provisioner;

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};
use crate::output::Printer;
use crate::prompt::ConsoleOperator;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            exit_code::FAILURE
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(Command::Completions(args)) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "sitebuild", &mut std::io::stdout());
        return Ok(());
    }

    let global = cli.global;
    let config = sitebuild_config::load_config(global.config.as_deref(), global.timeout)?;
    let client = sitebuild_core::connect(&config)?;

    let printer = Printer::new(output::should_color(global.color), global.quiet);
    let mut operator = ConsoleOperator::new(global.site_name, printer);

    tracing::debug!(devices_file = %global.devices_file.display(), "starting site build");
    let outcome = Provisioner::new(&client, &config)
        .with_devices_file(global.devices_file)
        .run(&mut operator)
        .await?;

    printer.summary(&outcome);
    Ok(())
}
