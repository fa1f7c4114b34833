//! Operator session handed to the page by the surrounding application

use cardpay_config::SessionConfig;
use serde::{Deserialize, Serialize};

/// Profile of the signed-in operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub is_superuser: bool,
}

/// Session state the page is constructed with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub logged_in: bool,
    pub profile: Profile,
}

impl SessionContext {
    pub fn new(logged_in: bool, profile: Profile) -> Self {
        Self { logged_in, profile }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            logged_in: config.logged_in,
            profile: Profile {
                username: config.username.clone(),
                is_superuser: config.is_superuser,
            },
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.logged_in && self.profile.is_superuser
    }

    /// Login URL to send an anonymous operator to, returning to `path`
    pub fn login_redirect(&self, path: &str) -> Option<String> {
        if self.logged_in {
            None
        } else {
            Some(format!("/login?redirectTo={}", urlencoding::encode(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let session = SessionContext::from_config(&SessionConfig {
            logged_in: true,
            username: "ops".to_string(),
            is_superuser: true,
        });
        assert!(session.is_superuser());
        assert_eq!(session.profile.username, "ops");
    }

    #[test]
    fn test_logged_out_is_never_superuser() {
        let session = SessionContext::new(
            false,
            Profile {
                username: "ops".to_string(),
                is_superuser: true,
            },
        );
        assert!(!session.is_superuser());
    }

    #[test]
    fn test_login_redirect() {
        let session = SessionContext::default();
        assert_eq!(
            session.login_redirect("/card-purchases").as_deref(),
            Some("/login?redirectTo=%2Fcard-purchases")
        );

        let session = SessionContext::new(true, Profile::default());
        assert_eq!(session.login_redirect("/card-purchases"), None);
    }
}
