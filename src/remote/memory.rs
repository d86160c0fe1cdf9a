//! In-process stand-in for the hosted service, used by tests.

use std::{
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Mutex,
        MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    AuthChange,
    AuthEvent,
    AuthEvents,
    AuthListener,
    RemoteDataService,
    Subscription,
};
use crate::core::{
    AuthSession,
    Category,
    CategoryDraft,
    Flashcard,
    FlashcardDraft,
    Identity,
    TarjetasError,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    flashcards: Vec<Flashcard>,
    next_id: i64,
    accounts: Vec<(String, String, Identity)>,
    session: Option<AuthSession>,
    fail_reads: bool,
    write_latency: Option<Duration>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryService {
    state: Mutex<State>,
    events: AuthEvents,
    writes_in_flight: AtomicUsize,
    peak_writes: AtomicUsize,
}

impl MemoryService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State { next_id: 100, ..State::default() }),
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_category(self, id: i64, title: Option<&str>, is_category: bool) -> Self {
        self.lock().categories.push(Category { id, title: title.map(str::to_string), is_category });
        self
    }

    pub fn with_flashcard(self, id: i64, spanish: &str, arabic: &str, category: &str) -> Self {
        self.lock().flashcards.push(Flashcard {
            id,
            spanish: spanish.to_string(),
            arabic: arabic.to_string(),
            phonetic: None,
            category: Some(category.to_string()),
        });
        self
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        let identity =
            Identity { id: Uuid::new_v4(), email: Some(email.to_string()), last_sign_in_at: None };
        self.lock().accounts.push((email.to_string(), password.to_string(), identity));
        self
    }

    pub fn failing_reads(self) -> Self {
        self.lock().fail_reads = true;
        self
    }

    /// Card writes take `latency` each, so overlapping writes can be counted.
    pub fn with_write_latency(self, latency: Duration) -> Self {
        self.lock().write_latency = Some(latency);
        self
    }

    /// Most card writes that were in flight at the same time.
    pub fn peak_concurrent_writes(&self) -> usize {
        self.peak_writes.load(Ordering::SeqCst)
    }

    async fn simulate_write(&self) {
        let latency = self.lock().write_latency;
        let Some(latency) = latency else {
            return;
        };

        let in_flight = self.writes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_writes.fetch_max(in_flight, Ordering::SeqCst);
        tokio::time::sleep(latency).await;
        self.writes_in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn emit(&self, event: AuthEvent) {
        self.events.emit(event);
    }

    pub fn flashcards(&self) -> Vec<Flashcard> {
        self.lock().flashcards.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    fn check_reads(&self) -> Result<(), TarjetasError> {
        if self.lock().fail_reads {
            return Err(TarjetasError::Remote { status: 503, message: "service unavailable".into() });
        }
        Ok(())
    }

    fn not_found(table: &str, id: i64) -> TarjetasError {
        TarjetasError::Remote { status: 404, message: format!("no {table} row with id {id}") }
    }
}

#[async_trait]
impl RemoteDataService for MemoryService {
    async fn fetch_categories(&self) -> Result<Vec<Category>, TarjetasError> {
        self.check_reads()?;
        Ok(self.lock().categories.iter().filter(|c| c.is_category).cloned().collect())
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category, TarjetasError> {
        let mut state = self.lock();
        let category = Category {
            id: state.allocate_id(),
            title: Some(draft.title.clone()),
            is_category: draft.is_category,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i64,
        draft: &CategoryDraft,
    ) -> Result<Category, TarjetasError> {
        let mut state = self.lock();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("categories", id))?;
        category.title = Some(draft.title.clone());
        category.is_category = draft.is_category;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<(), TarjetasError> {
        self.lock().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn fetch_flashcards(&self, category: &str) -> Result<Vec<Flashcard>, TarjetasError> {
        self.check_reads()?;
        Ok(self
            .lock()
            .flashcards
            .iter()
            .filter(|card| card.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn fetch_all_flashcards(&self) -> Result<Vec<Flashcard>, TarjetasError> {
        self.check_reads()?;
        Ok(self.lock().flashcards.clone())
    }

    async fn insert_flashcard(&self, draft: &FlashcardDraft) -> Result<Flashcard, TarjetasError> {
        let mut state = self.lock();
        let card = Flashcard {
            id: state.allocate_id(),
            spanish: draft.spanish.clone(),
            arabic: draft.arabic.clone(),
            phonetic: draft.phonetic.clone(),
            category: draft.category.clone(),
        };
        state.flashcards.push(card.clone());
        Ok(card)
    }

    async fn update_flashcard(
        &self,
        id: i64,
        draft: &FlashcardDraft,
    ) -> Result<Flashcard, TarjetasError> {
        self.simulate_write().await;
        let mut state = self.lock();
        let card = state
            .flashcards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("flashcards", id))?;
        card.spanish = draft.spanish.clone();
        card.arabic = draft.arabic.clone();
        card.phonetic = draft.phonetic.clone();
        card.category = draft.category.clone();
        Ok(card.clone())
    }

    async fn delete_flashcard(&self, id: i64) -> Result<(), TarjetasError> {
        self.simulate_write().await;
        self.lock().flashcards.retain(|c| c.id != id);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>, TarjetasError> {
        Ok(self.lock().session.as_ref().map(|session| session.user.clone()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, TarjetasError> {
        let session = {
            let mut state = self.lock();
            let identity = state
                .accounts
                .iter()
                .find(|(e, p, _)| e == email && p == password)
                .map(|(_, _, identity)| identity.clone())
                .ok_or_else(|| TarjetasError::Auth("Invalid login credentials".to_string()))?;

            let session = AuthSession {
                access_token: format!("token-{}", identity.id),
                refresh_token: "refresh".to_string(),
                expires_at: None,
                user: identity,
            };
            state.session = Some(session.clone());
            session
        };

        self.events.emit(AuthEvent::new(AuthChange::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), TarjetasError> {
        self.lock().session = None;
        self.events.emit(AuthEvent::signed_out());
        Ok(())
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        let session = self.lock().session.clone();
        self.events.subscribe(listener, AuthEvent::new(AuthChange::InitialSession, session))
    }
}
