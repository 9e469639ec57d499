mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use remlink_config::Config;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands need no config or credential.
        Command::Automation { entity_id, command } => {
            commands::automation::handle(&entity_id, &command)
        }

        Command::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "remlink", &mut std::io::stdout());
            Ok(())
        }

        // The store reader needs config but no credential.
        Command::Codes { hardware_id } => {
            let config = build_config(&cli.global)?;
            commands::codes::handle(&config, &hardware_id, &cli.global)
        }

        Command::Devices => {
            let (config, token) = build_config_with_token(&cli.global)?;
            commands::devices::handle(&config, &token, &cli.global).await
        }

        Command::Learn {
            entity_id,
            device,
            command,
        } => {
            let (config, token) = build_config_with_token(&cli.global)?;
            commands::learn::handle_learn(&config, &token, &cli.global, &entity_id, &device, &command)
                .await
        }

        Command::Forget {
            entity_id,
            device,
            command,
        } => {
            let (config, token) = build_config_with_token(&cli.global)?;
            commands::learn::handle_forget(
                &config,
                &token,
                &cli.global,
                &entity_id,
                &device,
                &command,
            )
            .await
        }
    }
}

/// Load the config file + environment, then apply CLI flag overrides.
fn build_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = Config::load()?;

    if let Some(url) = &global.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &global.storage_dir {
        config.storage_dir = dir.clone();
    }
    if let Some(secs) = global.timeout {
        config.timeout_secs = secs;
    }

    Ok(config)
}

/// Config plus the injected credential (flag > env, never a file).
fn build_config_with_token(global: &GlobalOpts) -> Result<(Config, SecretString), CliError> {
    let config = build_config(global)?;
    let token = match &global.token {
        Some(token) => SecretString::from(token.clone()),
        None => remlink_config::resolve_token()?,
    };
    Ok((config, token))
}
