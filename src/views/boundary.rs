//! Error boundary
//!
//! The view tree runs as its own task. A panic anywhere inside it ends that
//! task only; [`guard`] turns it into a [`Crash`] so the front-end can show
//! the fallback screen and offer a reload.

use std::any::Any;
use std::future::Future;

pub const TITLE: &str = "Something went wrong";
pub const BODY: &str = "We encountered an unexpected error. Please try refreshing the page.";
pub const RELOAD_LABEL: &str = "Refresh Page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crash {
    pub message: String,
}

/// Run `view` as a task and catch a panic from it.
pub async fn guard<F, T>(view: F) -> Result<T, Crash>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(view).await {
        Ok(value) => Ok(value),
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic().as_ref());
            tracing::error!(%message, "View tree panicked");
            Err(Crash { message })
        }
        Err(e) => {
            tracing::error!("View task ended unexpectedly: {}", e);
            Err(Crash {
                message: e.to_string(),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
