use std::sync::{
    Mutex,
    MutexGuard,
};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    Client,
    RequestBuilder,
    Response,
    StatusCode,
    Url,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

use super::{
    AuthChange,
    AuthEvent,
    AuthEvents,
    AuthListener,
    RemoteDataService,
    Subscription,
};
use crate::{
    core::{
        AuthSession,
        Category,
        CategoryDraft,
        Flashcard,
        FlashcardDraft,
        Identity,
        TarjetasError,
    },
    persistence,
};

const CATEGORIES: &str = "categories";
const FLASHCARDS: &str = "flashcards";

/// Error payloads differ between the REST and auth endpoints; this covers both.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    hint: Option<String>,
}

impl ErrorBody {
    fn into_message(self, fallback: &str) -> String {
        let message = self
            .message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| fallback.to_string());

        match self.hint {
            Some(hint) if !hint.is_empty() => format!("{message} ({hint})"),
            _ => message,
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.trim().to_string()
    };

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.into_message(&fallback))
        .unwrap_or(fallback)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: Identity,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|seconds| Utc::now().timestamp() + seconds));

        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Supabase project reached through its REST and auth HTTP APIs.
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    session: Mutex<Option<AuthSession>>,
    refresh_lock: tokio::sync::Mutex<()>,
    session_file: Option<String>,
    events: AuthEvents,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, TarjetasError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(TarjetasError::Config("Supabase URL is not set".to_string()));
        }
        if anon_key.trim().is_empty() {
            return Err(TarjetasError::Config("Supabase anon key is not set".to_string()));
        }

        // Joining relative paths needs the trailing slash.
        let normalized =
            if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") };
        let base_url = Url::parse(&normalized)
            .map_err(|e| TarjetasError::Config(format!("Invalid Supabase URL {base_url}: {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TarjetasError::Config(format!(
                "Supabase URL must use http or https, got {}",
                base_url.scheme()
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("tarjetas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TarjetasError::Custom(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.trim().to_string(),
            session: Mutex::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
            session_file: None,
            events: AuthEvents::new(),
        })
    }

    /// Restores the session saved by a previous run and keeps the file up to date.
    pub fn with_persisted_session(mut self, filename: &str) -> Self {
        let restored: Option<AuthSession> = persistence::load_json_or_default(filename);
        if let Some(session) = &restored {
            log::info!("Restored session for {}", session.user.display_name());
        }

        *self.lock_session() = restored;
        self.session_file = Some(filename.to_string());
        self
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<AuthSession>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_snapshot(&self) -> Option<AuthSession> {
        self.lock_session().clone()
    }

    fn store_session(&self, session: Option<AuthSession>) {
        *self.lock_session() = session.clone();

        let Some(filename) = &self.session_file else {
            return;
        };

        let result = match &session {
            Some(session) => persistence::save_json(session, filename),
            None => persistence::delete_data_file(filename),
        };

        if let Err(e) = result {
            log::warn!("Could not persist auth session: {e}");
        }
    }

    fn clear_session(&self) {
        self.store_session(None);
        self.events.emit(AuthEvent::signed_out());
    }

    fn endpoint(&self, path: &str) -> Result<Url, TarjetasError> {
        self.base_url
            .join(path)
            .map_err(|e| TarjetasError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    fn table(&self, table: &str) -> Result<Url, TarjetasError> {
        self.endpoint(&format!("rest/v1/{table}"))
    }

    /// The stored session, renewed first if its token has expired.
    ///
    /// Concurrent callers wait on one refresh. A failed refresh signs out locally.
    async fn fresh_session(&self) -> Option<AuthSession> {
        let session = self.session_snapshot()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }

        let _refreshing = self.refresh_lock.lock().await;

        // Renewed by whoever held the lock before us.
        let session = self.session_snapshot()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }

        match self.refresh_session(&session).await {
            Ok(refreshed) => Some(refreshed),
            Err(e) => {
                log::warn!("Session refresh failed, signing out locally: {e}");
                self.clear_session();
                None
            }
        }
    }

    /// Signed-in requests carry the user's token so row-level security applies.
    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .fresh_session()
            .await
            .map(|session| session.access_token)
            .unwrap_or_else(|| self.anon_key.clone());

        builder.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    async fn check(response: Response) -> Result<Response, TarjetasError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TarjetasError::Remote { status: status.as_u16(), message: error_message(status, &body) })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, TarjetasError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());
        query.push(("order", "id.asc".to_string()));

        let response =
            self.authorized(self.http.get(self.table(table)?)).await.query(&query).send().await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, TarjetasError> {
        let response = self
            .authorized(self.http.post(self.table(table)?))
            .await
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        Self::first_row(table, Self::check(response).await?.json().await?)
    }

    async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        id: i64,
        body: &B,
    ) -> Result<T, TarjetasError> {
        let response = self
            .authorized(self.http.patch(self.table(table)?))
            .await
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        Self::first_row(table, Self::check(response).await?.json().await?)
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), TarjetasError> {
        let response = self
            .authorized(self.http.delete(self.table(table)?))
            .await
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    fn first_row<T>(table: &str, rows: Vec<T>) -> Result<T, TarjetasError> {
        rows.into_iter().next().ok_or_else(|| {
            TarjetasError::Custom(format!("No {table} row returned (is the row visible to you?)"))
        })
    }

    async fn token_request<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<AuthSession, TarjetasError> {
        let response = self
            .http
            .post(self.endpoint("auth/v1/token")?)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TarjetasError::Auth(error_message(status, &body)));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_session())
    }

    async fn refresh_session(&self, session: &AuthSession) -> Result<AuthSession, TarjetasError> {
        let refreshed = self
            .token_request("refresh_token", &RefreshGrant { refresh_token: &session.refresh_token })
            .await?;

        self.store_session(Some(refreshed.clone()));
        self.events.emit(AuthEvent::new(AuthChange::TokenRefreshed, Some(refreshed.clone())));
        Ok(refreshed)
    }
}

#[async_trait]
impl RemoteDataService for SupabaseClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, TarjetasError> {
        self.select(CATEGORIES, &[("is_category", "eq.true".to_string())]).await
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category, TarjetasError> {
        self.insert(CATEGORIES, draft).await
    }

    async fn update_category(
        &self,
        id: i64,
        draft: &CategoryDraft,
    ) -> Result<Category, TarjetasError> {
        self.update(CATEGORIES, id, draft).await
    }

    async fn delete_category(&self, id: i64) -> Result<(), TarjetasError> {
        self.delete(CATEGORIES, id).await
    }

    async fn fetch_flashcards(&self, category: &str) -> Result<Vec<Flashcard>, TarjetasError> {
        self.select(FLASHCARDS, &[("category", format!("eq.{category}"))]).await
    }

    async fn fetch_all_flashcards(&self) -> Result<Vec<Flashcard>, TarjetasError> {
        self.select(FLASHCARDS, &[]).await
    }

    async fn insert_flashcard(&self, draft: &FlashcardDraft) -> Result<Flashcard, TarjetasError> {
        self.insert(FLASHCARDS, draft).await
    }

    async fn update_flashcard(
        &self,
        id: i64,
        draft: &FlashcardDraft,
    ) -> Result<Flashcard, TarjetasError> {
        self.update(FLASHCARDS, id, draft).await
    }

    async fn delete_flashcard(&self, id: i64) -> Result<(), TarjetasError> {
        self.delete(FLASHCARDS, id).await
    }

    async fn current_user(&self) -> Result<Option<Identity>, TarjetasError> {
        let Some(mut session) = self.fresh_session().await else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            log::info!("Stored session was rejected by the auth service");
            self.clear_session();
            return Ok(None);
        }

        let user: Identity = Self::check(response).await?.json().await?;

        session.user = user.clone();
        self.store_session(Some(session));
        Ok(Some(user))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, TarjetasError> {
        let session = self.token_request("password", &PasswordGrant { email, password }).await?;

        log::info!(
            "Signed in as {}; any signed-in account gets the admin tools",
            session.user.display_name()
        );

        self.store_session(Some(session.clone()));
        self.events.emit(AuthEvent::new(AuthChange::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), TarjetasError> {
        if let Some(session) = self.session_snapshot() {
            let result = self
                .http
                .post(self.endpoint("auth/v1/logout")?)
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;

            match result {
                Ok(response) if !response.status().is_success() => {
                    log::warn!("Sign-out returned {}", response.status());
                }
                Err(e) => log::warn!("Sign-out request failed: {e}"),
                Ok(_) => {}
            }
        }

        // The local session goes away whether or not the server heard about it.
        self.clear_session();
        Ok(())
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        let initial = AuthEvent::new(AuthChange::InitialSession, self.session_snapshot());
        self.events.subscribe(listener, initial)
    }
}
