//! The auth-gated application shell.
//!
//! A mounted shell mirrors the provider's auth state into a watch channel
//! and renders one of three screens from it. Record content is only ever
//! rendered for an authenticated user.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    auth::{AuthProvider, AuthState, Subscription, User},
    error::Result,
    pages::PageView,
    section::{NavItem, Section, sidebar},
    workspace::Workspace,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

impl Default for SignInPrompt {
    fn default() -> Self {
        Self {
            title: "Insurance Platform",
            message: "Please sign in to access the insurance management dashboard",
            action: "Sign In to Continue",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppFrame {
    pub user: User,
    pub sidebar: Vec<NavItem>,
    pub active: Section,
    pub page: PageView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    SignIn(SignInPrompt),
    App(Box<AppFrame>),
}

pub struct Shell {
    provider: Arc<dyn AuthProvider>,
    workspace: Workspace,
    auth: Arc<watch::Sender<AuthState>>,
    active: watch::Sender<Section>,
    subscription: Option<Subscription>,
}

impl Shell {
    /// Subscribe to the provider and start on the dashboard
    pub fn mount(provider: Arc<dyn AuthProvider>, workspace: Workspace) -> Self {
        let (auth, _) = watch::channel(AuthState::loading());
        let auth = Arc::new(auth);

        let mirror = Arc::clone(&auth);
        let subscription = provider.subscribe(Box::new(move |state: &AuthState| {
            mirror.send_replace(state.clone());
        }));
        let (active, _) = watch::channel(Section::default());

        info!("Shell mounted");
        Self {
            provider,
            workspace,
            auth,
            active,
            subscription: Some(subscription),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    /// Receiver that observes every auth change delivered to the shell
    pub fn watch_auth(&self) -> watch::Receiver<AuthState> {
        self.auth.subscribe()
    }

    pub fn active_section(&self) -> Section {
        *self.active.borrow()
    }

    pub fn navigate(&self, section: Section) {
        let previous = self.active.send_replace(section);
        debug!(from = %previous, to = %section, "Navigated");
    }

    pub fn render(&self) -> Screen {
        let state = self.auth_state();
        if state.is_loading {
            return Screen::Loading;
        }
        let Some(user) = state.user else {
            return Screen::SignIn(SignInPrompt::default());
        };

        let active = self.active_section();
        Screen::App(Box::new(AppFrame {
            user,
            sidebar: sidebar(active),
            active,
            page: self.workspace.render(active),
        }))
    }

    pub async fn login(&self) -> Result<()> {
        self.provider.login().await
    }

    pub async fn logout(&self) -> Result<()> {
        self.provider.logout().await
    }

    /// Release the auth subscription; later auth changes are no longer seen
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("Shell unmounted");
        }
    }
}
