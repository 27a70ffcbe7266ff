//! Screen logic without any GTK in it.
//!
//! Each screen is a small state machine. The GUI feeds it user actions and
//! backend results, then shows whatever [`Notification`] comes back and
//! switches to the returned [`Screen`], if any.

pub mod home;
pub mod login;
pub mod register;

pub use home::{HomeError, HomeScreen, HomeState, HomeView};
pub use login::{LoginError, LoginOutcome, LoginScreen};
pub use register::{RegisterForm, RegisterScreen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
