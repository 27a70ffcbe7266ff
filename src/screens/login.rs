use super::{Notification, Screen};
use crate::api::{ApiError, Credentials};
use thiserror::Error;
use tracing::{error, info, warn};

pub const LOGIN_SUCCESS: &str = "Login Success";
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";
pub const LOGIN_FAILED: &str = "Login Failed";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter a username and password")]
    MissingFields,

    #[error("A login is already in progress")]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub notification: Notification,
    pub navigate_to: Option<Screen>,
}

/// Login form state. Credentials are handed out for a single request and not
/// kept here.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pending: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validates the form and marks a login as in flight.
    pub fn begin(&mut self, username: &str, password: &str) -> Result<Credentials, LoginError> {
        if self.pending {
            return Err(LoginError::Pending);
        }
        // Whitespace-only usernames count as empty, but the name is sent as typed.
        if username.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        self.pending = true;
        info!(user = %username, "submitting login");
        Ok(Credentials {
            user_name: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Turns the backend's answer into what the user sees next.
    pub fn complete(&mut self, result: Result<(), ApiError>) -> LoginOutcome {
        self.pending = false;

        match result {
            Ok(()) => LoginOutcome {
                notification: Notification::info(LOGIN_SUCCESS),
                navigate_to: Some(Screen::Home),
            },
            Err(e) if e.is_rejection() => {
                warn!("login rejected: {}", e);
                LoginOutcome {
                    notification: Notification::error(INVALID_CREDENTIALS),
                    navigate_to: None,
                }
            }
            Err(e) => {
                error!("login failed: {}", e);
                LoginOutcome {
                    notification: Notification::error(LOGIN_FAILED),
                    navigate_to: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LOGIN_PATH;

    #[test]
    fn successful_login_navigates_home() {
        let mut login = LoginScreen::new();
        let credentials = login.begin("admin", "secret").unwrap();
        assert_eq!(credentials.user_name, "admin");
        assert!(login.is_pending());

        let outcome = login.complete(Ok(()));
        assert_eq!(outcome.navigate_to, Some(Screen::Home));
        assert_eq!(outcome.notification, Notification::info(LOGIN_SUCCESS));
        assert!(!login.is_pending());
    }

    #[test]
    fn rejected_login_stays_put() {
        let mut login = LoginScreen::new();
        login.begin("admin", "wrong").unwrap();

        let outcome = login.complete(Err(ApiError::Rejected {
            path: LOGIN_PATH,
            status: 401,
        }));
        assert_eq!(outcome.navigate_to, None);
        assert_eq!(outcome.notification, Notification::error(INVALID_CREDENTIALS));
    }

    #[test]
    fn malformed_response_is_a_generic_failure() {
        let mut login = LoginScreen::new();
        login.begin("admin", "secret").unwrap();

        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let outcome = login.complete(Err(ApiError::MalformedResponse {
            path: LOGIN_PATH,
            source,
        }));
        assert_eq!(outcome.navigate_to, None);
        assert_eq!(outcome.notification, Notification::error(LOGIN_FAILED));
    }

    #[test]
    fn username_is_sent_exactly_as_typed() {
        let mut login = LoginScreen::new();
        let credentials = login.begin(" admin ", " secret ").unwrap();
        assert_eq!(credentials.user_name, " admin ");
        assert_eq!(credentials.password, " secret ");
    }

    #[test]
    fn empty_fields_are_refused_before_sending() {
        let mut login = LoginScreen::new();
        assert_eq!(login.begin("", "secret").unwrap_err(), LoginError::MissingFields);
        assert_eq!(login.begin("   ", "secret").unwrap_err(), LoginError::MissingFields);
        assert_eq!(login.begin("admin", "").unwrap_err(), LoginError::MissingFields);
        assert!(!login.is_pending());
    }

    #[test]
    fn second_submit_while_pending_is_refused() {
        let mut login = LoginScreen::new();
        login.begin("admin", "secret").unwrap();
        assert_eq!(login.begin("admin", "secret").unwrap_err(), LoginError::Pending);
    }
}
