//! Requests understood by the attendance backend and the [`AttendanceApi`]
//! seam the screens talk through.

mod error;
mod http;

pub use error::ApiError;
pub use http::HttpAttendanceApi;

use crate::identity::{IdValue, Identifier, Role, ScannedIdentity};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://student-monitoring-backend.onrender.com";
pub const LOGIN_PATH: &str = "/api/faculty/login";

/// Remote operations the client needs. Implementations block; callers run
/// them off the UI thread.
pub trait AttendanceApi: Send + Sync {
    fn login(&self, credentials: &Credentials) -> Result<(), ApiError>;
    fn record(&self, request: &AttendanceRequest) -> Result<(), ApiError>;
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceEvent {
    Entry,
    Exit,
}

impl AttendanceEvent {
    /// Message shown once the backend has stored the timestamp.
    pub fn saved_message(self) -> &'static str {
        match self {
            AttendanceEvent::Entry => "Entry Time Saved",
            AttendanceEvent::Exit => "Exit Time Saved",
        }
    }
}

impl fmt::Display for AttendanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendanceEvent::Entry => "Entry",
            AttendanceEvent::Exit => "Exit",
        })
    }
}

/// Fixed endpoint for each role and event.
pub fn endpoint(role: Role, event: AttendanceEvent) -> &'static str {
    match (role, event) {
        (Role::Student, AttendanceEvent::Entry) => "/api/students/entryStudent",
        (Role::Student, AttendanceEvent::Exit) => "/api/students/exitStudent",
        (Role::Faculty, AttendanceEvent::Entry) => "/api/faculty/entryFaculty",
        (Role::Faculty, AttendanceEvent::Exit) => "/api/faculty/exitFaculty",
    }
}

/// JSON body of an entry/exit request. The faculty key is spelled the way
/// the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttendanceBody {
    Student {
        #[serde(rename = "rollNumber")]
        roll_number: IdValue,
    },
    Faculty {
        #[serde(rename = "emplyoeeId")]
        employee_id: IdValue,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRequest {
    pub event: AttendanceEvent,
    pub role: Role,
    pub body: AttendanceBody,
}

impl AttendanceRequest {
    pub fn new(event: AttendanceEvent, identity: &ScannedIdentity) -> Self {
        let body = match &identity.id {
            Identifier::RollNumber(roll_number) => AttendanceBody::Student {
                roll_number: roll_number.clone(),
            },
            Identifier::EmployeeId(employee_id) => AttendanceBody::Faculty {
                employee_id: employee_id.clone(),
            },
        };

        AttendanceRequest {
            event,
            role: identity.role(),
            body,
        }
    }

    pub fn path(&self) -> &'static str {
        endpoint(self.role, self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(payload: &str) -> ScannedIdentity {
        ScannedIdentity::from_payload(payload).unwrap()
    }

    #[test]
    fn student_requests_carry_only_roll_number() {
        let student = identity(r#"{"user":"student","name":"A","rollNumber":"R1"}"#);

        let entry = AttendanceRequest::new(AttendanceEvent::Entry, &student);
        assert_eq!(entry.path(), "/api/students/entryStudent");
        assert_eq!(
            serde_json::to_value(&entry.body).unwrap(),
            json!({"rollNumber": "R1"})
        );

        let exit = AttendanceRequest::new(AttendanceEvent::Exit, &student);
        assert_eq!(exit.path(), "/api/students/exitStudent");
        assert_eq!(exit.body, entry.body);
    }

    #[test]
    fn faculty_requests_use_backend_spelling() {
        let faculty = identity(r#"{"user":"faculty","name":"B","employeeId":"E7"}"#);

        let entry = AttendanceRequest::new(AttendanceEvent::Entry, &faculty);
        assert_eq!(entry.path(), "/api/faculty/entryFaculty");
        assert_eq!(
            serde_json::to_value(&entry.body).unwrap(),
            json!({"emplyoeeId": "E7"})
        );

        let exit = AttendanceRequest::new(AttendanceEvent::Exit, &faculty);
        assert_eq!(exit.path(), "/api/faculty/exitFaculty");
    }

    #[test]
    fn numeric_identifiers_are_posted_as_numbers() {
        let student = identity(r#"{"user":"student","name":"A","rollNumber":12345}"#);
        let entry = AttendanceRequest::new(AttendanceEvent::Entry, &student);
        assert_eq!(
            serde_json::to_value(&entry.body).unwrap(),
            json!({"rollNumber": 12345})
        );

        let faculty = identity(r#"{"user":"faculty","name":"B","emplyoeeId":77}"#);
        let exit = AttendanceRequest::new(AttendanceEvent::Exit, &faculty);
        assert_eq!(
            serde_json::to_value(&exit.body).unwrap(),
            json!({"emplyoeeId": 77})
        );
    }

    #[test]
    fn credentials_serialise_with_backend_keys_and_hide_password() {
        let credentials = Credentials {
            user_name: "admin".to_owned(),
            password: "hunter2".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            json!({"userName": "admin", "password": "hunter2"})
        );
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }
}
