//! Interactive prompts
//!
//! dialoguer reads the terminal synchronously, so every prompt runs on the
//! blocking pool and the runtime stays free for background work such as
//! session restoration and delayed notifications.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

async fn blocking<T, F>(prompt: F) -> io::Result<T>
where
    F: FnOnce() -> Result<T, dialoguer::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(io::Error::other)?
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Free-text input. `initial` pre-fills the field.
pub async fn input(label: &str, initial: &str, allow_empty: bool) -> io::Result<String> {
    let label = label.to_string();
    let initial = initial.to_string();
    blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .with_initial_text(initial)
            .allow_empty(allow_empty)
            .interact_text()
    })
    .await
}

/// Hidden input, used for passwords and OAuth tokens.
pub async fn secret(label: &str) -> io::Result<String> {
    let label = label.to_string();
    blocking(move || {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
    })
    .await
}

/// Pick one of `items`. `None` when the user backs out with Esc or q.
pub async fn select(label: &str, items: Vec<String>) -> io::Result<Option<usize>> {
    let label = label.to_string();
    blocking(move || {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .items(&items)
            .default(0)
            .interact_opt()
    })
    .await
}

pub async fn confirm(label: &str, default: bool) -> io::Result<bool> {
    let label = label.to_string();
    blocking(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .default(default)
            .interact()
    })
    .await
}

/// Spinner shown while waiting on the network. Call `finish_and_clear` when done.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
