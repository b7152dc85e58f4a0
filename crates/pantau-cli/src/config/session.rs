//! Acting user configuration.

use clap::Args;
use pantau_comment::{Biografi, CommentPolicy, Session, User};

use crate::TRACING_TARGET_CONFIG;

/// Who the CLI acts as.
///
/// Without `--username` every operation runs anonymously, which is enough
/// to read and post comments but not to react.
#[derive(Debug, Clone, Default, Args)]
pub struct SessionConfig {
    /// Login name of the acting user
    #[arg(long, env = "PANTAU_USERNAME")]
    pub username: Option<String>,

    /// Full name of the acting user
    #[arg(long, env = "PANTAU_FULL_NAME", requires = "username")]
    pub full_name: Option<String>,

    /// Biography record linked to the acting user
    #[arg(long, env = "PANTAU_BIOGRAFI_ID", requires = "username")]
    pub biografi_id: Option<i64>,

    /// Full name recorded in the linked biography
    #[arg(long, env = "PANTAU_BIOGRAFI_NAME", requires = "biografi_id")]
    pub biografi_name: Option<String>,

    /// Refuse to post comments without a logged-in user
    #[arg(long, env = "PANTAU_REQUIRE_LOGIN")]
    pub require_login: bool,
}

impl SessionConfig {
    /// Builds the session described by the flags.
    pub fn session(&self) -> Session {
        let Some(username) = &self.username else {
            return Session::Anonymous;
        };

        let mut user = User::new(username.clone(), self.full_name.clone().unwrap_or_default());
        if let Some(biografi_id) = self.biografi_id {
            user = user.with_biografi(Biografi {
                biografi_id,
                nama_lengkap: self.biografi_name.clone(),
                foto: None,
            });
        }

        user.into()
    }

    /// Posting policy described by the flags.
    pub fn policy(&self) -> CommentPolicy {
        CommentPolicy {
            allow_anonymous: !self.require_login,
        }
    }

    pub(super) fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            authenticated = self.username.is_some(),
            has_biografi = self.biografi_id.is_some(),
            require_login = self.require_login,
            "Session configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_by_default() {
        let config = SessionConfig::default();
        assert_eq!(config.session(), Session::Anonymous);
        assert!(config.policy().allow_anonymous);
    }

    #[test]
    fn test_user_with_biografi() {
        let config = SessionConfig {
            username: Some("budi".to_owned()),
            full_name: Some("Budi".to_owned()),
            biografi_id: Some(7),
            biografi_name: Some("Budi Santoso".to_owned()),
            require_login: true,
        };

        let session = config.session();
        assert_eq!(session.biografi_id(), Some(7));
        assert_eq!(session.prefill_name(), Some("Budi Santoso"));
        assert!(!config.policy().allow_anonymous);
    }
}
