//! Terminal front-end
//!
//! Drives the views from the keyboard. Each run builds fresh adapters and a
//! fresh dashboard; a reload (after a crash or closing the diagnostic report)
//! throws all of it away and starts again, like reloading the page.

use crate::auth::{FederatedCredential, FederatedProvider};
use crate::cli::output::Output;
use crate::cli::prompt;
use crate::notify::{ToastReceiver, Toaster};
use crate::types::Result;
use crate::utils::config::{Config, FirebaseConfig};
use crate::views::auth_modal::{AuthModal, ModalState};
use crate::views::boundary;
use crate::views::chat::ChatView;
use crate::views::dashboard::{self, Dashboard, Screen};
use crate::views::diagnostic::DiagnosticReporter;
use crate::views::Exit;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the interactive app until the user quits.
pub async fn run(config: Config, out: Output) -> Result<()> {
    loop {
        let (toaster, toasts) = Toaster::channel();
        let (dashboard, auth) = Dashboard::from_config(&config, toaster);
        let dashboard = dashboard.with_theme(out.theme);

        tokio::spawn(async move { auth.restore().await });

        let firebase = config.firebase.clone();
        let exit = match boundary::guard(run_dashboard(dashboard, toasts, firebase, out)).await {
            Ok(result) => result?,
            Err(crash) => {
                out.crash(&crash);
                if prompt::confirm(boundary::RELOAD_LABEL, true).await? {
                    Exit::Reload
                } else {
                    Exit::Quit
                }
            }
        };

        match exit {
            Exit::Quit => return Ok(()),
            Exit::Reload => tracing::info!("Reloading"),
        }
    }
}

/// Print the diagnostic report once. Returns whether the configuration is valid.
pub async fn doctor(firebase: FirebaseConfig, out: Output) -> bool {
    let reporter = DiagnosticReporter::new(firebase);
    let spinner = prompt::spinner("Running Firebase diagnostics...");
    let report = reporter.run().await;
    spinner.finish_and_clear();
    out.diagnostic(&report);
    report.is_valid()
}

/// Interactive diagnostic report with "Run Again" and "Close".
async fn diagnostics(firebase: FirebaseConfig, out: Output) -> Result<Exit> {
    let reporter = DiagnosticReporter::new(firebase);
    loop {
        let spinner = prompt::spinner("Running Firebase diagnostics...");
        let report = reporter.run().await;
        spinner.finish_and_clear();
        out.diagnostic(&report);

        let choice = prompt::select("Diagnostics", vec!["Run Again".into(), "Close".into()]).await?;
        if choice != Some(0) {
            return Ok(reporter.close());
        }
    }
}

fn show_toasts(toasts: &mut ToastReceiver, out: &Output) {
    for toast in toasts.drain() {
        out.toast(&toast);
    }
}

async fn run_dashboard(
    mut dashboard: Dashboard,
    mut toasts: ToastReceiver,
    firebase: FirebaseConfig,
    mut out: Output,
) -> Result<Exit> {
    loop {
        show_toasts(&mut toasts, &out);

        match dashboard.screen() {
            Screen::Loading => {
                out.loading();
                dashboard.settled().await;
            }
            Screen::Landing => {
                out.landing();
                let items = vec![
                    dashboard::CALL_TO_ACTION.to_string(),
                    format!("Switch to {} theme", dashboard.theme().toggle().name()),
                    "Run Firebase diagnostics".to_string(),
                    "Quit".to_string(),
                ];
                match prompt::select("MRBOT", items).await? {
                    Some(0) => {
                        if dashboard.open_auth() {
                            auth_flow(dashboard.auth_modal(), &mut toasts, &out).await?;
                        }
                    }
                    Some(1) => out.theme = dashboard.toggle_theme(),
                    Some(2) => return diagnostics(firebase, out).await,
                    _ => return Ok(Exit::Quit),
                }
            }
            Screen::Chat(chat) => {
                if let Some(exit) = chat_loop(&mut dashboard, chat, &mut toasts, &mut out).await? {
                    return Ok(exit);
                }
            }
        }
    }
}

async fn auth_flow(modal: &AuthModal, toasts: &mut ToastReceiver, out: &Output) -> Result<()> {
    while modal.is_open() {
        show_toasts(toasts, out);
        let state = modal.state();
        out.modal(state);

        match state {
            ModalState::LoginForm | ModalState::SignupForm => {
                let mut actions = vec![
                    state.submit_label(false).to_string(),
                    "Continue with Google".to_string(),
                    "Continue with GitHub".to_string(),
                    state.toggle_label().to_string(),
                ];
                if state == ModalState::LoginForm {
                    actions.push("Forgot your password?".to_string());
                }
                actions.push("Close".to_string());
                let close = actions.len() - 1;

                match prompt::select("Choose", actions).await? {
                    Some(0) => {
                        let email = prompt::input("Email", &modal.email(), true).await?;
                        let password = prompt::secret("Password").await?;
                        modal.set_email(email);
                        modal.set_password(password);

                        let spinner = prompt::spinner(state.submit_label(true));
                        modal.submit_credentials().await;
                        spinner.finish_and_clear();
                    }
                    Some(choice @ (1 | 2)) => {
                        let provider = FederatedProvider::ALL[choice - 1];
                        out.hint(&format!(
                            "Complete the {} sign-in in your browser, then paste the {} here. Leave it empty to cancel.",
                            provider,
                            match provider {
                                FederatedProvider::Google => "ID token",
                                FederatedProvider::GitHub => "access token",
                            }
                        ));
                        let token = prompt::secret(&format!("{} token", provider)).await?;

                        let spinner = prompt::spinner("Processing...");
                        modal
                            .submit_federated(FederatedCredential::new(provider, token))
                            .await;
                        spinner.finish_and_clear();
                    }
                    Some(3) => {
                        modal.toggle_mode();
                    }
                    Some(4) if state == ModalState::LoginForm => {
                        modal.show_forgot_password();
                    }
                    Some(i) if i != close => {}
                    _ => {
                        modal.close();
                    }
                }
            }
            ModalState::ForgotPasswordForm => {
                let actions = vec![
                    state.submit_label(false).to_string(),
                    "Back to Sign In".to_string(),
                    "Close".to_string(),
                ];
                match prompt::select("Choose", actions).await? {
                    Some(0) => {
                        let email = prompt::input("Email", &modal.email(), true).await?;
                        modal.set_email(email);

                        let spinner = prompt::spinner(state.submit_label(true));
                        modal.submit_password_reset().await;
                        spinner.finish_and_clear();
                    }
                    Some(1) => {
                        modal.back_to_sign_in();
                    }
                    _ => {
                        modal.close();
                    }
                }
            }
            ModalState::Closed => {}
        }
    }
    show_toasts(toasts, out);
    Ok(())
}

/// What a line typed into the chat input means.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Send(&'a str),
    Clear,
    Theme,
    Export(Option<&'a str>),
    SignOut,
    Quit,
}

fn parse_command(line: &str) -> ChatCommand<'_> {
    let trimmed = line.trim();
    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (trimmed, None),
    };
    match command {
        "/clear" => ChatCommand::Clear,
        "/theme" => ChatCommand::Theme,
        "/export" => ChatCommand::Export(arg),
        "/signout" | "/logout" => ChatCommand::SignOut,
        "/quit" | "/exit" => ChatCommand::Quit,
        _ => ChatCommand::Send(line),
    }
}

/// Runs until the session ends (`None`) or the user quits.
async fn chat_loop(
    dashboard: &mut Dashboard,
    chat: Arc<ChatView>,
    toasts: &mut ToastReceiver,
    out: &mut Output,
) -> Result<Option<Exit>> {
    out.chat_header(&chat.user_label());
    let mut shown = 0;

    loop {
        let messages = chat.messages();
        if messages.len() < shown {
            // Cleared: redraw from the greeting.
            out.chat_header(&chat.user_label());
            shown = 0;
        }
        for message in &messages[shown..] {
            out.message(message);
        }
        shown = messages.len();
        show_toasts(toasts, out);

        if chat.take_focus_request() {
            out.newline();
        }
        let line = prompt::input("You", &chat.input(), true).await?;

        match parse_command(&line) {
            ChatCommand::Clear => {
                chat.clear_chat();
                shown = usize::MAX;
            }
            ChatCommand::Theme => {
                out.theme = dashboard.toggle_theme();
                out.success(&format!("Switched to {} theme", out.theme.name()));
            }
            ChatCommand::Export(path) => {
                let path = PathBuf::from(path.unwrap_or("mrbot-transcript.html"));
                match tokio::fs::write(&path, chat.export_html()).await {
                    Ok(()) => out.success(&format!("Transcript saved to {}", path.display())),
                    Err(e) => {
                        tracing::error!(path = %path.display(), "Failed to export transcript: {}", e);
                        out.error(&format!("Could not write {}", path.display()));
                    }
                }
            }
            ChatCommand::SignOut => {
                if chat.sign_out().await {
                    show_toasts(toasts, out);
                    return Ok(None);
                }
            }
            ChatCommand::Quit => return Ok(Some(Exit::Quit)),
            ChatCommand::Send(text) => {
                chat.set_input(text);
                let spinner = prompt::spinner("Thinking...");
                let outcome = chat.send_input().await;
                spinner.finish_and_clear();
                tracing::debug!(?outcome, "Message exchange finished");
            }
        }

        if !matches!(dashboard.screen(), Screen::Chat(ref current) if Arc::ptr_eq(current, &chat)) {
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/clear"), ChatCommand::Clear);
        assert_eq!(parse_command("  /quit "), ChatCommand::Quit);
        assert_eq!(parse_command("/signout"), ChatCommand::SignOut);
        assert_eq!(parse_command("/export"), ChatCommand::Export(None));
        assert_eq!(
            parse_command("/export chat.html"),
            ChatCommand::Export(Some("chat.html"))
        );
        assert_eq!(parse_command("Hello"), ChatCommand::Send("Hello"));
        assert_eq!(parse_command("/unknown x"), ChatCommand::Send("/unknown x"));
    }
}
