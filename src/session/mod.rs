use crate::{
    core::{
        tasks::TaskManager,
        Identity,
        Session,
    },
    remote::{
        AuthEvent,
        Subscription,
    },
};

/// Tracks who is signed in. Every input (initial lookup, auth notification,
/// local logout) replaces the session outright, so the last one processed wins.
pub struct SessionController {
    session: Session,
    subscription: Option<Subscription>,
}

impl SessionController {
    pub fn new() -> Self {
        Self { session: Session::anonymous(), subscription: None }
    }

    /// Asks for the current user and starts listening for auth changes.
    pub fn start(&mut self, tasks: &TaskManager) {
        tasks.fetch_current_user();

        if self.subscription.is_none() {
            self.subscription = Some(tasks.subscribe_auth_changes());
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin
    }

    pub fn user(&self) -> Option<&Identity> {
        self.session.user.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn apply_current_user(&mut self, user: Option<Identity>) {
        self.session = Session::from_user(user);
    }

    pub fn apply_auth_event(&mut self, event: &AuthEvent) {
        log::debug!("Auth change {:?}, session present: {}", event.change, event.session.is_some());
        self.session = Session::from_user(event.session.as_ref().map(|s| s.user.clone()));
    }

    pub fn login(&self, tasks: &TaskManager, email: &str, password: &str) {
        tasks.sign_in(email.trim().to_string(), password.to_string());
    }

    /// Signs out remotely and drops admin rights locally without waiting for the notification.
    pub fn logout(&mut self, tasks: &TaskManager) {
        tasks.sign_out();
        self.session = Session::anonymous();
    }

    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
