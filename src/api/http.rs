use super::{ApiError, AttendanceApi, AttendanceRequest, Credentials, LOGIN_PATH};
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// [`AttendanceApi`] over HTTP with a blocking reqwest client.
#[derive(Clone, Debug)]
pub struct HttpAttendanceApi {
    base_url: String,
    client: Client,
}

impl HttpAttendanceApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpAttendanceApi {
            // Paths start with a slash, so a trailing one here would double up.
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Content-Type: application/json is set by `.json()`.
    fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &'static str,
        body: &T,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send()?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Rejected {
                path,
                status: status.as_u16(),
            })
        }
    }
}

impl AttendanceApi for HttpAttendanceApi {
    fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self.post_json(LOGIN_PATH, credentials)?;
        let text = response.text()?;

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| ApiError::MalformedResponse {
                path: LOGIN_PATH,
                source,
            })?;
        debug!(response = %body, "login response");

        info!(user = %credentials.user_name, "login accepted");
        Ok(())
    }

    fn record(&self, request: &AttendanceRequest) -> Result<(), ApiError> {
        let path = request.path();
        let response = self.post_json(path, &request.body)?;

        // The backend stores the timestamp before answering, so an odd body
        // does not undo a 2xx.
        match response.text() {
            Ok(text) => match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(body) => debug!(%path, response = %body, "attendance response"),
                Err(e) => warn!(%path, "attendance response was not JSON: {}", e),
            },
            Err(e) => warn!(%path, "failed to read attendance response: {}", e),
        }

        info!(event = %request.event, role = %request.role, "attendance recorded");
        Ok(())
    }
}
