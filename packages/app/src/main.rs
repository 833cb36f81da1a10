//! `entagen` - interactive demo client for the EntaGen authentication flow.
//!
//! Drives the flow controller from a terminal: each loop iteration renders
//! the current step with a prompt, runs the matching step driver, and feeds
//! the resulting event back through the controller.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use app_core::{AppShell, Config, DemoAuthApi, DocumentRecord, FileStorage, DEMO_PASSCODE};
use auth_flow::{
    AuthEvent, EmailStep, FlowStep, KvSessionStore, PasswordLoginStep, RegisterStep,
    RequestOtpStep, VerifyOtpStep,
};

#[derive(Parser)]
#[command(name = "entagen", about = "EntaGen document-analysis demo client")]
struct Args {
    /// Session file path (overrides ENTAGEN_SESSION_FILE).
    #[arg(long)]
    session_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,auth_flow=info,app_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(path) = args.session_file {
        config.session_file = path;
    }

    let storage = FileStorage::open(&config.session_file)
        .with_context(|| format!("opening session file {}", config.session_file.display()))?;
    let mut shell = AppShell::new(KvSessionStore::new(storage));
    let api = DemoAuthApi::new();
    let theme = ColorfulTheme::default();

    println!(
        "{}",
        style("EntaGen demo (passcode is always 123456)").dim()
    );

    loop {
        if let Some(message) = shell.controller().error() {
            println!("{}", style(message).red());
        }

        match shell.controller().current_step() {
            FlowStep::EmailInput => {
                let input: String = Input::with_theme(&theme)
                    .with_prompt("Email")
                    .interact_text()?;
                match EmailStep::submit(&input) {
                    Ok(event) => shell.controller().handle(event),
                    Err(message) => println!("{}", style(message).red()),
                }
            }

            FlowStep::ChooseMethod => {
                let choice = Select::with_theme(&theme)
                    .with_prompt("How would you like to continue?")
                    .items(&[
                        "Sign in with password",
                        "Create an account",
                        "Email me a passcode",
                        "Back",
                    ])
                    .default(0)
                    .interact()?;
                let event = match choice {
                    0 => AuthEvent::ChoosePassword,
                    1 => AuthEvent::ChooseRegister,
                    2 => AuthEvent::ChooseOtp,
                    _ => AuthEvent::Back,
                };
                shell.controller().handle(event);
            }

            FlowStep::LoginWithPassword => {
                let email = expect_email(&mut shell);
                let step = PasswordLoginStep::new(email);
                let password = Password::with_theme(&theme)
                    .with_prompt(format!("Password for {} (empty to go back)", step.email()))
                    .allow_empty_password(true)
                    .interact()?;
                if password.is_empty() {
                    shell.controller().handle(AuthEvent::Back);
                    continue;
                }
                let attempt = shell.controller().attempt();
                if let Some(event) = step.submit(&api, &password).await {
                    shell.controller().resolve(attempt, event);
                }
            }

            FlowStep::RegisterWithPassword => {
                let email = expect_email(&mut shell);
                let step = RegisterStep::new(email);
                let confirmed = Confirm::with_theme(&theme)
                    .with_prompt(format!("Create an account for {}?", step.email()))
                    .interact()?;
                if !confirmed {
                    shell.controller().handle(AuthEvent::Back);
                    continue;
                }
                let attempt = shell.controller().attempt();
                if let Some(event) = step.submit(&api).await {
                    shell.controller().resolve(attempt, event);
                }
            }

            FlowStep::RequestOtp => {
                let email = expect_email(&mut shell);
                let step = RequestOtpStep::new(email);
                let confirmed = Confirm::with_theme(&theme)
                    .with_prompt(format!("Email a passcode to {}?", step.email()))
                    .interact()?;
                if !confirmed {
                    shell.controller().handle(AuthEvent::Back);
                    continue;
                }
                let attempt = shell.controller().attempt();
                if let Some(event) = step.submit(&api).await {
                    shell.controller().resolve(attempt, event);
                }
            }

            FlowStep::VerifyOtp => {
                let email = expect_email(&mut shell);
                let step = VerifyOtpStep::new(email);
                let code: String = Input::with_theme(&theme)
                    .with_prompt(format!(
                        "Passcode sent to {} (hint: {}, empty to go back)",
                        step.email(),
                        DEMO_PASSCODE
                    ))
                    .allow_empty(true)
                    .interact_text()?;
                if code.is_empty() {
                    shell.controller().handle(AuthEvent::Back);
                    continue;
                }
                let attempt = shell.controller().attempt();
                if let Some(event) = step.submit(&api, code.trim()).await {
                    shell.controller().resolve(attempt, event);
                }
            }

            FlowStep::Authenticated => {
                let user = shell
                    .current_user_id()
                    .unwrap_or("(unknown)")
                    .to_string();
                let verified = if shell.is_user_verified() {
                    style("verified").green().to_string()
                } else {
                    style("unverified").yellow().to_string()
                };
                let choice = Select::with_theme(&theme)
                    .with_prompt(format!("Signed in as {user} ({verified})"))
                    .items(&["Analyze a document", "Show history", "Log out", "Quit"])
                    .default(0)
                    .interact()?;
                match choice {
                    0 => analyze_document(&mut shell)?,
                    1 => show_history(&shell),
                    2 => shell.on_logout(),
                    _ => break,
                }
            }
        }
    }

    Ok(())
}

/// The pending email, which a pre-auth step is guaranteed to have (the
/// controller resets to `EmailInput` otherwise before rendering).
fn expect_email<S: auth_flow::SessionStore>(shell: &mut AppShell<S>) -> String {
    shell
        .controller()
        .pending_email()
        .unwrap_or_default()
        .to_string()
}

/// Simulated analysis: text-like files succeed with a canned summary,
/// anything else fails the way the real pipeline would reject it.
fn analyze_document<S: auth_flow::SessionStore>(shell: &mut AppShell<S>) -> Result<()> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Document name")
        .interact_text()?;
    let user_id = shell.current_user_id().unwrap_or_default().to_string();

    let supported = [".pdf", ".txt", ".md", ".docx"]
        .iter()
        .any(|ext| name.to_lowercase().ends_with(ext));
    if supported {
        let record = DocumentRecord::completed(
            uuid::Uuid::new_v4().to_string(),
            &name,
            format!("Key points extracted from {name}."),
            user_id,
        );
        println!("{}", style(format!("Analyzed {name}.")).green());
        shell.on_document_analyzed(record);
    } else {
        let record =
            DocumentRecord::failed(uuid::Uuid::new_v4().to_string(), &name, user_id);
        shell.on_analysis_failed(
            record,
            format!("analysis failed: unsupported file type for {name}"),
        );
    }
    Ok(())
}

fn show_history<S: auth_flow::SessionStore>(shell: &AppShell<S>) {
    if shell.documents().is_empty() {
        println!("{}", style("No documents analyzed yet.").dim());
        return;
    }
    for record in shell.documents() {
        println!(
            "  {}  {}  [{}]  {}",
            style(&record.id[..8.min(record.id.len())]).dim(),
            record.name,
            record.status,
            record.timestamp.format("%Y-%m-%d %H:%M"),
        );
    }
}
