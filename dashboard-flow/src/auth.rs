use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Snapshot delivered by the auth provider on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_loading: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub type AuthCallback = Box<dyn Fn(&AuthState) + Send + Sync>;

/// Guard for an auth subscription. The release closure runs exactly once,
/// either through [`Subscription::unsubscribe`] or when the guard is dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// External authentication collaborator
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a callback for auth state changes. The current state is
    /// delivered once immediately.
    fn subscribe(&self, callback: AuthCallback) -> Subscription;

    async fn login(&self) -> Result<()>;

    async fn logout(&self) -> Result<()>;
}

/// In-process auth provider that signs in a single configured operator
pub struct LocalAuthProvider {
    operator: User,
    state: watch::Sender<AuthState>,
    listeners: Arc<DashMap<Uuid, Arc<AuthCallback>>>,
}

impl LocalAuthProvider {
    /// Provider that is still resolving the session; call [`Self::restore`] to finish
    pub fn new(operator: User) -> Self {
        Self::with_state(operator, AuthState::loading())
    }

    pub fn signed_out(operator: User) -> Self {
        Self::with_state(operator, AuthState::signed_out())
    }

    fn with_state(operator: User, initial: AuthState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            operator,
            state,
            listeners: Arc::new(DashMap::new()),
        }
    }

    /// Finish loading with a restored session, or none
    pub fn restore(&self, user: Option<User>) {
        let state = match user {
            Some(user) => AuthState::signed_in(user),
            None => AuthState::signed_out(),
        };
        self.publish(state);
    }

    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state.clone());
        // snapshot first so callbacks never run while a map shard is locked
        let callbacks: Vec<Arc<AuthCallback>> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        debug!(
            listeners = callbacks.len(),
            authenticated = state.is_authenticated(),
            "Publishing auth state"
        );
        for callback in callbacks {
            callback(&state);
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn subscribe(&self, callback: AuthCallback) -> Subscription {
        callback(&self.current());

        let id = Uuid::new_v4();
        self.listeners.insert(id, Arc::new(callback));
        debug!(subscription_id = %id, "Auth listener registered");

        let listeners: Weak<DashMap<Uuid, Arc<AuthCallback>>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.remove(&id);
                debug!(subscription_id = %id, "Auth listener released");
            }
        })
    }

    async fn login(&self) -> Result<()> {
        info!(user_id = %self.operator.id, "Operator signed in");
        self.publish(AuthState::signed_in(self.operator.clone()));
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        info!("Operator signed out");
        self.publish(AuthState::signed_out());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn operator() -> User {
        User {
            id: "op-1".to_string(),
            name: "Back Office Operator".to_string(),
            email: "operator@insurance.local".to_string(),
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<AuthState>>>, AuthCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: AuthCallback = Box::new(move |state: &AuthState| {
            sink.lock().unwrap().push(state.clone());
        });
        (seen, callback)
    }

    #[tokio::test]
    async fn subscribe_delivers_current_state_then_changes() {
        let provider = LocalAuthProvider::new(operator());
        let (seen, callback) = recorder();
        let _subscription = provider.subscribe(callback);

        provider.restore(None);
        provider.login().await.unwrap();
        provider.logout().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                AuthState::loading(),
                AuthState::signed_out(),
                AuthState::signed_in(operator()),
                AuthState::signed_out(),
            ]
        );
    }

    #[tokio::test]
    async fn dropping_the_guard_stops_delivery() {
        let provider = LocalAuthProvider::signed_out(operator());
        let (seen, callback) = recorder();
        let subscription = provider.subscribe(callback);
        assert_eq!(provider.listener_count(), 1);

        drop(subscription);
        assert_eq!(provider.listener_count(), 0);

        provider.login().await.unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(provider.current().is_authenticated());
    }

    #[test]
    fn explicit_unsubscribe_releases_once() {
        let provider = LocalAuthProvider::signed_out(operator());
        let (_, first) = recorder();
        let (_, second) = recorder();
        let first = provider.subscribe(first);
        let _second = provider.subscribe(second);

        first.unsubscribe();
        assert_eq!(provider.listener_count(), 1);
    }
}
