//! Headless views
//!
//! Each view owns its state and exposes event handlers; nothing here draws.
//! The terminal front-end in [`crate::cli`] reads the state after every event
//! and renders it.
//!
//! # Module Structure
//!
//! - [`views::dashboard`](crate::views::dashboard) - landing page, loading state and chat routing
//! - [`views::auth_modal`](crate::views::auth_modal) - sign-in / sign-up / reset state machine
//! - [`views::chat`](crate::views::chat) - message list, input buffer and AI exchange
//! - [`views::diagnostic`](crate::views::diagnostic) - identity configuration report
//! - [`views::theme`](crate::views::theme) - dark/light palette
//! - [`views::boundary`](crate::views::boundary) - panic capture and reload prompt

pub mod auth_modal;
pub mod boundary;
pub mod chat;
pub mod dashboard;
pub mod diagnostic;
pub mod theme;

use std::sync::atomic::{AtomicBool, Ordering};

/// How a front-end run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// Start over with fresh state, as a page reload would.
    Reload,
}

/// One-at-a-time guard for async operations started from a view.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark busy, or `None` when an operation is already running.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears the busy flag when dropped.
#[derive(Debug)]
pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
