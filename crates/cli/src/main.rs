use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use shelf_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "shelf", version, about = "Reading-list backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Report whether a password satisfies the strength policy
    CheckPassword {
        password: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let settings =
                Settings::load().with_context(|| "failed to load shelf settings")?;
            shelf_telemetry::init(&settings.telemetry)?;

            tokio::runtime::Runtime::new()
                .context("failed to start tokio runtime")?
                .block_on(shelf_app::run(settings))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckPassword { password } => {
            if shelf_auth::is_password_allowed(&password) {
                println!("password is allowed");
                Ok(ExitCode::SUCCESS)
            } else {
                println!(
                    "password is not strong enough: it needs {}+ characters with a lowercase letter, an uppercase letter, a digit and a symbol",
                    shelf_auth::password::MIN_PASSWORD_LENGTH
                );
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
