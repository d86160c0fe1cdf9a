use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use uuid::Uuid;

/// A row of the `categories` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_category: bool,
}

impl Category {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub title: String,
    pub is_category: bool,
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self { title: category.display_title().to_string(), is_category: category.is_category }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spanish: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arabic: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Flashcard {
    /// Label shown above the card text.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => "General",
        }
    }

    pub fn phonetic_line(&self) -> Option<&str> {
        self.phonetic.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDraft {
    pub spanish: String,
    pub arabic: String,
    pub phonetic: Option<String>,
    pub category: Option<String>,
}

impl From<&Flashcard> for FlashcardDraft {
    fn from(card: &Flashcard) -> Self {
        Self {
            spanish: card.spanish.clone(),
            arabic: card.arabic.clone(),
            phonetic: card.phonetic.clone(),
            category: card.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("admin")
    }
}

/// Session issued by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // Treat tokens expiring in the next few seconds as already gone.
        self.expires_at.is_some_and(|expires_at| expires_at <= now.timestamp() + 10)
    }
}

/// Local view of who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<Identity>,
    pub is_admin: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_user(user: Option<Identity>) -> Self {
        // No role lookup: any signed-in identity is treated as admin.
        let is_admin = user.is_some();
        Self { user, is_admin }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcard_nulls_deserialize_as_empty() {
        let card: Flashcard = serde_json::from_str(
            r#"{"id": 4, "spanish": null, "arabic": "كتاب", "phonetic": null}"#,
        )
        .unwrap();

        assert_eq!(card.spanish, "");
        assert_eq!(card.arabic, "كتاب");
        assert_eq!(card.phonetic_line(), None);
        assert_eq!(card.category_label(), "General");
    }

    #[test]
    fn test_category_missing_title() {
        let category: Category = serde_json::from_str(r#"{"id": 9, "is_category": true}"#).unwrap();
        assert_eq!(category.title, None);
        assert_eq!(category.display_title(), "");
    }

    #[test]
    fn test_session_admin_follows_user() {
        let user = Identity { id: Uuid::new_v4(), email: None, last_sign_in_at: None };
        assert!(Session::from_user(Some(user)).is_admin);
        assert!(!Session::from_user(None).is_admin);
    }

    #[test]
    fn test_auth_session_expiry() {
        let now = Utc::now();
        let user = Identity { id: Uuid::new_v4(), email: None, last_sign_in_at: None };
        let mut session = AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Some(now.timestamp() + 3600),
            user,
        };
        assert!(!session.is_expired(now));

        session.expires_at = Some(now.timestamp() - 1);
        assert!(session.is_expired(now));

        session.expires_at = None;
        assert!(!session.is_expired(now));
    }
}
