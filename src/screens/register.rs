use super::Screen;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub username: String,
    pub password: String,
}

/// Account sign-up. The backend has no registration endpoint, so nothing
/// leaves the client.
#[derive(Debug, Default)]
pub struct RegisterScreen;

impl RegisterScreen {
    pub fn new() -> Self {
        RegisterScreen
    }

    pub fn submit(&self, form: RegisterForm) -> Screen {
        info!(
            full_name = %form.full_name,
            username = %form.username,
            "registration collected locally, not sent"
        );
        Screen::Login
    }

    pub fn go_to_login(&self) -> Screen {
        Screen::Login
    }
}
