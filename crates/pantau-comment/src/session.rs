//! The acting user, as supplied by the embedding application.
//!
//! Authentication itself happens elsewhere; this crate only reads who is
//! acting to pre-fill names and gate reactions.

use serde::{Deserialize, Serialize};

/// A user's linked biography record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biografi {
    /// Server id of the biography record.
    pub biografi_id: i64,
    /// Full name recorded in the biography.
    #[serde(default)]
    pub nama_lengkap: Option<String>,
    /// Profile photo reference.
    #[serde(default)]
    pub foto: Option<String>,
}

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login name.
    pub username: String,
    /// Account full name.
    #[serde(default)]
    pub full_name: String,
    /// Linked biography, if the account has one.
    #[serde(default)]
    pub biografi: Option<Biografi>,
}

impl User {
    /// Creates a user without a linked biography.
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            biografi: None,
        }
    }

    /// Links a biography record.
    pub fn with_biografi(mut self, biografi: Biografi) -> Self {
        self.biografi = Some(biografi);
        self
    }

    /// Name shown on this user's comments: biography name, else account name.
    pub fn display_name(&self) -> Option<&str> {
        self.biografi
            .as_ref()
            .and_then(|biografi| biografi.nama_lengkap.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.full_name.trim()).filter(|name| !name.is_empty()))
    }

    /// Name sent with reactions.
    pub fn reaction_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Who is acting on a comment section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A logged-in account.
    Authenticated(User),
}

impl Session {
    /// Returns the logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Returns true when a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Id of the acting user's biography record, if any.
    pub fn biografi_id(&self) -> Option<i64> {
        self.user()
            .and_then(|user| user.biografi.as_ref())
            .map(|biografi| biografi.biografi_id)
    }

    /// Pre-filled display name for compose forms.
    pub fn prefill_name(&self) -> Option<&str> {
        self.user().and_then(User::display_name)
    }
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self::Authenticated(user)
    }
}
