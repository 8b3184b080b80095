mod cli;

use agenda_auth::{load_application_credential, Authorizer, StdinPrompt};
use agenda_calendar::{display_events, fetch_upcoming};
use agenda_core::AppError;
use clap::Parser;

use crate::cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    agenda_core::init(args.verbose);

    // Failures are reported here and the process still exits normally
    if let Err(e) = run(&args).await {
        tracing::error!("{}", e);
        eprint!("{}", report(&e));
    }
}

/// Console report for a failed run.
fn report(err: &AppError) -> String {
    format!("❌ Error: {}\n   {}\n", err.user_message(), err)
}

async fn run(args: &Args) -> Result<(), AppError> {
    let config = args.load_config()?;

    println!("🔐 Authorizing with Google Calendar API...");
    let credential = load_application_credential(&config.paths.credentials)?;
    let mut authorizer = Authorizer::from_config(&config);
    let client = authorizer.authorize(&credential, &mut StdinPrompt).await?;

    println!("📅 Fetching calendar events...");
    let events = fetch_upcoming(&client, &config.calendar, chrono::Utc::now()).await?;

    println!("\n🎉 Success! Here are your upcoming events:\n");
    display_events(&events, config.calendar.window_days);

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use agenda_core::{AuthError, ConfigError};

    fn args_in(dir: &std::path::Path, extra: &[&str]) -> Args {
        let credentials = dir.join("credentials.json");
        let token = dir.join("token.json");
        let mut argv = vec![
            "agenda".to_string(),
            "--credentials".to_string(),
            credentials.display().to_string(),
            "--token".to_string(),
            token.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credentials_is_returned_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args_in(dir.path(), &[])).await.unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::CredentialFile { .. })));
        let text = report(&err);
        assert!(text.starts_with("❌ Error: Could not load credentials.json"));
        assert!(text.contains("credentials.json"));
    }

    #[tokio::test]
    async fn test_oversized_window_is_returned_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args_in(dir.path(), &["--days", "200000000"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert!(report(&err).contains("calendar.window_days"));
    }

    #[test]
    fn test_report_has_summary_and_detail() {
        let err = AppError::Config(ConfigError::Invalid("calendar.max_results: zero".into()));
        assert_eq!(
            report(&err),
            "❌ Error: Invalid configuration. Check your settings.\n   Configuration error: Invalid configuration: calendar.max_results: zero\n"
        );
    }
}
