//! secure-auth-prompt - Ask for a passphrase and print it to stdout.
//!
//! Runs the authentication dialog on the controlling terminal. The accepted
//! secret is written to stdout without a trailing newline, the way askpass
//! helpers hand secrets to their caller. Prompts, errors and logs go to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! # Ask for the key of a file
//! secure-auth-prompt --context notes.txt > key
//!
//! # Echo the input while typing
//! secure-auth-prompt --show
//!
//! # Verbose logging
//! RUST_LOG=debug secure-auth-prompt
//! ```
//!
//! Exits with a non-zero status when the dialog is cancelled.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::{ExposeSecret, SecretSlice};
use secure_auth_core::{present_modal, AuthDialogController, Config, DialogHost, TerminalState};
use secure_auth_dialog::TerminalDialogHost;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Ask for an authentication passphrase.
#[derive(Parser)]
#[command(name = "secure-auth-prompt")]
#[command(about = "Ask for an authentication passphrase and print it to stdout")]
#[command(version)]
struct Cli {
    /// Context shown in the caption, e.g. the file being opened
    #[arg(long, short = 'c', value_name = "LABEL")]
    context: Option<String>,

    /// Configuration file (defaults to ~/.config/secure-auth/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show the passphrase while typing
    #[arg(long, short = 's')]
    show: bool,
}

fn setup_logging() {
    // Use RUST_LOG=debug for verbose output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Run the dialog on `host`, returning the secret if it was accepted.
fn prompt<H>(host: &mut H, context: Option<&str>, config: &Config) -> Option<SecretSlice<u8>>
where
    H: DialogHost + ?Sized,
{
    let mut dialog = AuthDialogController::with_config(context, &config.dialog);

    match present_modal(host, &mut dialog) {
        TerminalState::Accepted => dialog.take_secret(),
        TerminalState::Cancelled => None,
    }
}

fn write_secret(out: &mut impl Write, secret: &SecretSlice<u8>) -> Result<()> {
    out.write_all(secret.expose_secret())
        .context("Failed to write secret")?;
    out.flush().context("Failed to flush secret")?;
    Ok(())
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    debug!(
        max_input_len = config.dialog.max_input_len,
        "Configuration loaded"
    );

    let mut host = TerminalDialogHost::new();
    if cli.show {
        host = host.reveal();
    }

    match prompt(&mut host, cli.context.as_deref(), &config) {
        Some(secret) => {
            write_secret(&mut std::io::stdout().lock(), &secret)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            info!("Dialog cancelled");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "secure-auth-prompt failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use secure_auth_dialog::{MockDialogHost, UserAction};
    use tempfile::NamedTempFile;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "secure-auth-prompt",
            "--context",
            "notes.txt",
            "--config",
            "/tmp/auth.toml",
            "--show",
        ]);
        assert_eq!(cli.context.as_deref(), Some("notes.txt"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/auth.toml")));
        assert!(cli.show);

        let cli = Cli::parse_from(["secure-auth-prompt"]);
        assert!(cli.context.is_none());
        assert!(!cli.show);
    }

    #[test]
    fn prompt_returns_secret_on_accept() {
        let mut host = MockDialogHost::new().typing("key").confirming();
        let secret = prompt(&mut host, Some("notes.txt"), &Config::default()).unwrap();

        assert_eq!(secret.expose_secret(), b"key");
        assert_eq!(host.caption(), "authentication (notes.txt)");
    }

    #[test]
    fn prompt_returns_none_on_cancel() {
        let mut host =
            MockDialogHost::with_actions([UserAction::Type("key".into()), UserAction::Close]);
        assert!(prompt(&mut host, None, &Config::default()).is_none());
    }

    #[test]
    fn prompt_uses_configured_caption_and_limit() {
        let config =
            Config::parse("[dialog]\ncaption_label = \"unlock\"\nmax_input_len = 2\n").unwrap();
        let mut host = MockDialogHost::new().typing("abc").confirming();
        let secret = prompt(&mut host, None, &config).unwrap();

        assert_eq!(host.caption(), "unlock");
        assert_eq!(secret.expose_secret(), b"ab");
    }

    #[test]
    fn write_secret_has_no_trailing_newline() {
        let secret = SecretSlice::from(b"hmac-key".to_vec());
        let mut out = Vec::new();
        write_secret(&mut out, &secret).unwrap();
        assert_eq!(out, b"hmac-key");
    }

    #[test]
    fn load_config_reports_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dialog]\nmax_input_len = 0").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load config from"));
    }

    #[test]
    fn load_config_missing_explicit_file_fails() {
        let path = Path::new("/nonexistent/secure-auth/config.toml");
        assert!(load_config(Some(path)).is_err());
    }
}
