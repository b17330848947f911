//! Toast notifications
//!
//! Views push toasts through a cloneable [`Toaster`]; the front-end drains the
//! matching [`ToastReceiver`] and decides how to show them.

use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    /// How long the toast stays visible.
    pub duration: Duration,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

/// Sending side of the toast queue.
#[derive(Debug, Clone)]
pub struct Toaster {
    tx: mpsc::UnboundedSender<Toast>,
}

impl Toaster {
    pub fn channel() -> (Toaster, ToastReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Toaster { tx }, ToastReceiver { rx })
    }

    pub fn push(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => tracing::debug!(text = %toast.text, "Toast"),
            ToastKind::Error => tracing::debug!(text = %toast.text, "Error toast"),
        }
        // The front-end may already be gone during shutdown.
        let _ = self.tx.send(toast);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(Toast::success(text));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Toast::error(text));
    }

    /// Show `toast` after `delay` without blocking the caller.
    pub fn schedule(&self, delay: Duration, toast: Toast) {
        let toaster = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            toaster.push(toast);
        });
    }
}

/// Receiving side of the toast queue.
#[derive(Debug)]
pub struct ToastReceiver {
    rx: mpsc::UnboundedReceiver<Toast>,
}

impl ToastReceiver {
    /// Everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        let mut toasts = Vec::new();
        while let Ok(toast) = self.rx.try_recv() {
            toasts.push(toast);
        }
        toasts
    }

    pub async fn recv(&mut self) -> Option<Toast> {
        self.rx.recv().await
    }
}
