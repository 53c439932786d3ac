use crate::error::{AppError, Result};

/// Per-caller session state.
///
/// Replaces the app-wide "logged in" and "dark mode" flags: the presentation
/// layer builds the value per request and passes it into every operation that
/// needs it. Services only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user_id: Option<String>,
    dark_mode: bool,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            dark_mode: false,
        }
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// The logged-in user's id, or `Unauthenticated` for `action`
    pub fn require_user(&self, action: &str) -> Result<&str> {
        self.user_id().ok_or_else(|| {
            AppError::Unauthenticated(format!("you must be logged in to {}", action))
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session_requires_login() {
        let session = SessionContext::anonymous();
        assert!(!session.is_logged_in());
        assert!(matches!(
            session.require_user("favorite recipes"),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_logged_in_session_keeps_theme() {
        let session = SessionContext::logged_in("uid-1").with_dark_mode(true);
        assert_eq!(session.require_user("review").unwrap(), "uid-1");
        assert!(session.dark_mode());
    }
}
