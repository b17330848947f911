//! Session Context
//!
//! The signed-in user is process-wide state, but it is never a global: the
//! identity adapter owns a [`SessionPublisher`] and views observe it through a
//! [`SessionContext`] that is constructed explicitly and handed down.
//!
//! The context subscribes when it is mounted and releases the subscription
//! when it is dropped. It has no mutation methods; sign-in and sign-out happen
//! through the identity adapter and arrive here asynchronously.

use crate::auth::IdentityProvider;
use crate::types::Session;
use tokio::sync::watch;

/// Authentication state; exactly one variant holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The provider has not reported a result yet.
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }
}

/// Write side of the session stream, owned by an identity adapter.
#[derive(Debug)]
pub struct SessionPublisher {
    tx: watch::Sender<AuthState>,
}

impl Default for SessionPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPublisher {
    /// Start in [`AuthState::Loading`].
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::Loading);
        Self { tx }
    }

    pub fn publish(&self, state: AuthState) {
        tracing::debug!(state = state_name(&state), "Publishing session state");
        self.tx.send_replace(state);
    }

    pub fn signed_in(&self, session: Session) {
        self.publish(AuthState::SignedIn(session));
    }

    pub fn signed_out(&self) {
        self.publish(AuthState::SignedOut);
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Read side of the session stream. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<AuthState>,
}

impl Subscription {
    pub fn state(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Session state as seen by the views.
#[derive(Debug)]
pub struct SessionContext {
    subscription: Subscription,
}

impl SessionContext {
    /// Subscribe to `provider`'s session changes for the lifetime of the context.
    pub fn mount(provider: &dyn IdentityProvider) -> Self {
        let subscription = provider.subscribe();
        tracing::debug!(state = state_name(&subscription.state()), "Session context mounted");
        Self { subscription }
    }

    pub fn state(&self) -> AuthState {
        self.subscription.state()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    /// Wait for the next transition.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.subscription.changed().await
    }

    /// Wait until the provider has reported a result.
    ///
    /// Never resolves if the provider stays in `Loading`.
    pub async fn settled(&mut self) -> AuthState {
        loop {
            let state = self.state();
            if !state.is_loading() {
                return state;
            }
            if self.changed().await.is_none() {
                return self.state();
            }
        }
    }
}

fn state_name(state: &AuthState) -> &'static str {
    match state {
        AuthState::Loading => "loading",
        AuthState::SignedOut => "signed_out",
        AuthState::SignedIn(_) => "signed_in",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_starts_loading() {
        let publisher = SessionPublisher::new();
        assert_eq!(publisher.current(), AuthState::Loading);
        assert!(publisher.subscribe().state().is_loading());
    }

    #[test]
    fn test_dropping_subscription_releases_it() {
        let publisher = SessionPublisher::new();
        let first = publisher.subscribe();
        let second = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        drop(first);
        assert_eq!(publisher.subscriber_count(), 1);
        drop(second);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_keeps_value() {
        let publisher = SessionPublisher::new();
        publisher.signed_in(Session::new("u1"));

        let subscription = publisher.subscribe();
        assert_eq!(
            subscription.state().session().map(|s| s.uid.as_str()),
            Some("u1")
        );
    }

    #[tokio::test]
    async fn test_subscription_observes_transitions() {
        let publisher = SessionPublisher::new();
        let mut subscription = publisher.subscribe();

        publisher.signed_out();
        assert_eq!(subscription.changed().await, Some(AuthState::SignedOut));

        publisher.signed_in(Session::new("u2"));
        let state = subscription.changed().await.unwrap();
        assert_eq!(state.session().unwrap().uid, "u2");
    }

    #[tokio::test]
    async fn test_changed_returns_none_after_publisher_dropped() {
        let publisher = SessionPublisher::new();
        let mut subscription = publisher.subscribe();
        drop(publisher);

        assert_eq!(subscription.changed().await, None);
    }
}
