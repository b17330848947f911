//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for MRBOT, including the
//! screens drawn for each view.

use crate::markdown::terminal::TerminalRenderer;
use crate::markdown::Document;
use crate::notify::{Toast, ToastKind};
use crate::types::{Message, Sender};
use crate::utils::config::{Config, ConfigError};
use crate::views::auth_modal::ModalState;
use crate::views::boundary::{self, Crash};
use crate::views::chat::renders_markdown;
use crate::views::dashboard::{self, FEATURES, HIGHLIGHTS};
use crate::views::diagnostic::{self, DiagnosticReport, AUTHORIZED_DOMAINS, SIGN_IN_METHODS};
use crate::views::theme::{Rgb, Theme};
use owo_colors::OwoColorize;

/// Output style configuration
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
    pub theme: Theme,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self {
            colored: true,
            theme: Theme::default(),
        }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self {
            colored: false,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn paint(&self, text: &str, color: Rgb) -> String {
        if self.colored {
            text.truecolor(color.0, color.1, color.2).to_string()
        } else {
            text.to_string()
        }
    }

    /// Print the MRBOT banner
    pub fn banner(&self) {
        let art = [
            r" __  __ ____  ____   ___ _____ ",
            r"|  \/  |  _ \| __ ) / _ \_   _|",
            r"| |\/| | |_) |  _ \| | | || |  ",
            r"| |  | |  _ <| |_) | |_| || |  ",
            r"|_|  |_|_| \_\____/ \___/ |_|  ",
        ];
        println!();
        for line in art {
            if self.colored {
                let accent = self.theme.palette().accent;
                println!("   {}", self.paint(line, accent).bold());
            } else {
                println!("   {}", line);
            }
        }
        if self.colored {
            println!(
                "\n   {} {}\n",
                "AI chat powered by Gemini".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                "\n   AI chat powered by Gemini v{}\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print a link
    pub fn link(&self, label: &str, url: &str) {
        if self.colored {
            println!("    {} {}", label.bright_white(), url.bright_blue().underline());
        } else {
            println!("    {} <{}>", label, url);
        }
    }

    /// Print a check result
    pub fn check(&self, label: &str, ok: bool) {
        match (self.colored, ok) {
            (true, true) => println!("    {} {}", "✓".green().bold(), label),
            (true, false) => println!("    {} {}", "✗".red().bold(), label),
            (false, true) => println!("    [OK] {}", label),
            (false, false) => println!("    [MISSING] {}", label),
        }
    }

    /// Print a toast notification
    pub fn toast(&self, toast: &Toast) {
        match toast.kind {
            ToastKind::Success => self.success(&toast.text),
            ToastKind::Error => self.error(&toast.text),
        }
    }

    /// Blank line between an exchange and the next prompt.
    pub fn newline(&self) {
        println!();
    }

    // ============= Screens =============

    /// Shown while the identity provider is still restoring the session.
    pub fn loading(&self) {
        self.info("Loading...");
    }

    /// The landing page shown to signed-out users
    pub fn landing(&self) {
        self.banner();
        if self.colored {
            println!("  {}", dashboard::TAGLINE.bright_white());
        } else {
            println!("  {}", dashboard::TAGLINE);
        }
        println!();
        let highlights = HIGHLIGHTS.join("  ·  ");
        if self.colored {
            println!("  {}", highlights.dimmed());
        } else {
            println!("  {}", highlights);
        }

        for feature in FEATURES {
            self.subheader(feature.title);
            println!("    {}", feature.description);
        }
        println!();
    }

    /// Header of the sign-in dialog for its current form
    pub fn modal(&self, state: ModalState) {
        self.header(state.title());
        if self.colored {
            println!("  {}", state.subtitle().dimmed());
        } else {
            println!("  {}", state.subtitle());
        }
    }

    /// Chat header with the signed-in user
    pub fn chat_header(&self, user_label: &str) {
        self.header("MRBOT");
        self.kv("Signed in as", user_label);
        self.hint("Commands: /clear, /theme, /export <file>, /signout, /quit");
    }

    /// Print a transcript message
    pub fn message(&self, message: &Message) {
        println!("{}", self.format_message(message));
    }

    /// Render a transcript message: sender line, then the indented body.
    pub fn format_message(&self, message: &Message) -> String {
        let palette = self.theme.palette();
        let (name, color) = match message.sender {
            Sender::User => ("You", palette.user),
            Sender::Assistant => ("MRBOT", palette.assistant),
        };
        let time = message.timestamp.format("%H:%M").to_string();
        let heading = if self.colored {
            format!(
                "  {} {}",
                self.paint(name, color).bold(),
                self.paint(&time, palette.muted)
            )
        } else {
            format!("  {} [{}]", name, time)
        };

        let renderer = TerminalRenderer::new(self.colored);
        let body = if renders_markdown(message) {
            renderer.render(&Document::parse(&message.text))
        } else {
            renderer.render_plain(&message.text)
        };

        format!("\n{}\n{}", heading, body)
    }

    /// Blocking configuration error screen
    pub fn config_error(&self, error: &ConfigError) {
        self.header("Configuration Error");
        match error {
            ConfigError::Missing(keys) => {
                self.error("Missing required environment variables:");
                for key in keys {
                    self.list_item(key);
                }
                self.hint("Set them in your environment or in a .env file, then restart.");
            }
            ConfigError::EnvFile { .. } => self.error(&error.to_string()),
        }
        self.hint("Run the diagnostic report for more detail:");
        self.command("mrbot doctor");
        println!();
    }

    /// Error boundary fallback screen
    pub fn crash(&self, crash: &Crash) {
        self.header(boundary::TITLE);
        println!("  {}", boundary::BODY);
        if self.colored {
            println!("  {}", crash.message.dimmed());
        } else {
            println!("  ({})", crash.message);
        }
        println!();
    }

    /// Firebase diagnostic report
    pub fn diagnostic(&self, report: &DiagnosticReport) {
        self.header(diagnostic::TITLE);

        self.subheader("Environment Variables:");
        for check in &report.env {
            self.check(check.key, check.present);
        }

        self.subheader("Firebase Configuration:");
        self.check(&format!("Status: {}", report.status_label()), report.is_valid());
        if !report.validation.errors.is_empty() {
            println!("    Errors:");
            for error in &report.validation.errors {
                self.list_item(error);
            }
        }

        self.subheader("Project Information:");
        self.kv("Project ID", report.project_id_label());
        self.kv("Auth Domain", report.auth_domain_label());

        self.subheader("Quick Fix Actions:");
        println!("    1. Enable Authentication in Firebase Console:");
        self.link("  Open Firebase Authentication Settings", &report.providers_url);
        println!("    2. Enable these sign-in methods:");
        for method in SIGN_IN_METHODS {
            self.list_item(method);
        }
        println!("    3. Add authorized domains:");
        self.link("  Manage Authorized Domains", &report.settings_url);
        println!("       Add: {}", AUTHORIZED_DOMAINS.join(", "));
        println!();
    }

    /// Summary of the loaded configuration with secrets masked
    pub fn config_summary(&self, config: &Config) {
        self.header("Configuration");
        self.subheader("Firebase");
        self.kv("API key", &mask(&config.firebase.api_key));
        self.kv("Auth domain", &config.firebase.auth_domain);
        self.kv("Project ID", &config.firebase.project_id);
        self.kv("Storage bucket", &config.firebase.storage_bucket);
        self.kv("Messaging sender ID", &config.firebase.messaging_sender_id);
        self.kv("App ID", &config.firebase.app_id);
        if let Some(id) = &config.firebase.measurement_id {
            self.kv("Measurement ID", id);
        }
        self.subheader("Gemini");
        self.kv("API key", &mask(&config.gemini.api_key));
        self.kv("Model", &config.gemini.model);
        self.kv("Endpoint", &config.gemini.api_base);
        self.subheader("Session");
        match &config.session_file {
            Some(path) => self.kv("Session file", &path.display().to_string()),
            None => self.kv("Session file", "not persisted"),
        }
    }
}

/// Keep the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
