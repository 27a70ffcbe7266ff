// Identities decoded from the barcode printed on a student or faculty ID card.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The two kinds of people the attendance backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    /// Value of the `user` field in a scanned payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }

    fn parse(user: &str) -> Result<Self, IdentityError> {
        match user {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            other => Err(IdentityError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier exactly as printed on the card. Cards encode it either as a
/// JSON string or a JSON number, and the backend gets back whichever it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl IdValue {
    fn is_blank(&self) -> bool {
        match self {
            IdValue::Text(text) => text.trim().is_empty(),
            IdValue::Number(_) => false,
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Text(text) => f.write_str(text),
            IdValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for IdValue {
    fn from(text: &str) -> Self {
        IdValue::Text(text.to_owned())
    }
}

impl From<u64> for IdValue {
    fn from(number: u64) -> Self {
        IdValue::Number(number.into())
    }
}

/// The identifying number a card carries. Which one is present decides the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    RollNumber(IdValue),
    EmployeeId(IdValue),
}

impl Identifier {
    pub fn role(&self) -> Role {
        match self {
            Identifier::RollNumber(_) => Role::Student,
            Identifier::EmployeeId(_) => Role::Faculty,
        }
    }

    pub fn value(&self) -> &IdValue {
        match self {
            Identifier::RollNumber(value) | Identifier::EmployeeId(value) => value,
        }
    }

    /// Label shown next to the value on the Home screen.
    pub fn label(&self) -> &'static str {
        match self {
            Identifier::RollNumber(_) => "Roll Number",
            Identifier::EmployeeId(_) => "Employee Id",
        }
    }
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Scanned payload is not a valid identity: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unrecognised role {0:?} in scanned payload")]
    UnknownRole(String),

    #[error("Scanned {role} card has no {field}")]
    MissingIdentifier { role: Role, field: &'static str },

    #[error("Scanned {role} card also carries a {field}")]
    ConflictingIdentifier { role: Role, field: &'static str },

    #[error("Scanned card carries employeeId {spelled:?} and emplyoeeId {misspelled:?}")]
    MismatchedEmployeeId { spelled: String, misspelled: String },
}

// Shape of the JSON encoded in the barcode. Older faculty cards spell the
// identifier `emplyoeeId`, matching the backend's wire name. Some cards carry
// both spellings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentity {
    user: String,
    name: String,
    roll_number: Option<IdValue>,
    employee_id: Option<IdValue>,
    #[serde(rename = "emplyoeeId")]
    emplyoee_id: Option<IdValue>,
}

impl RawIdentity {
    // Both spellings are fine as long as they agree.
    fn employee_id(&mut self) -> Result<Option<IdValue>, IdentityError> {
        let spelled = self.employee_id.take().filter(|value| !value.is_blank());
        let misspelled = self.emplyoee_id.take().filter(|value| !value.is_blank());
        match (spelled, misspelled) {
            (Some(spelled), Some(misspelled)) if spelled != misspelled => {
                Err(IdentityError::MismatchedEmployeeId {
                    spelled: spelled.to_string(),
                    misspelled: misspelled.to_string(),
                })
            }
            (spelled, misspelled) => Ok(spelled.or(misspelled)),
        }
    }
}

/// A person identified by a scanned card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedIdentity {
    pub name: String,
    pub id: Identifier,
}

impl ScannedIdentity {
    /// Decodes a barcode payload.
    ///
    /// The `user` field selects the role, and exactly the identifier belonging
    /// to that role must be present and non-empty.
    pub fn from_payload(payload: &str) -> Result<Self, IdentityError> {
        let mut raw: RawIdentity = serde_json::from_str(payload)?;
        let role = Role::parse(&raw.user)?;

        let roll_number = raw.roll_number.take().filter(|value| !value.is_blank());
        let employee_id = raw.employee_id()?;

        let id = match role {
            Role::Student => {
                if employee_id.is_some() {
                    return Err(IdentityError::ConflictingIdentifier {
                        role,
                        field: "employeeId",
                    });
                }
                Identifier::RollNumber(roll_number.ok_or(IdentityError::MissingIdentifier {
                    role,
                    field: "rollNumber",
                })?)
            }
            Role::Faculty => {
                if roll_number.is_some() {
                    return Err(IdentityError::ConflictingIdentifier {
                        role,
                        field: "rollNumber",
                    });
                }
                Identifier::EmployeeId(employee_id.ok_or(IdentityError::MissingIdentifier {
                    role,
                    field: "employeeId",
                })?)
            }
        };

        Ok(ScannedIdentity { name: raw.name, id })
    }

    pub fn role(&self) -> Role {
        self.id.role()
    }

    /// The card rendered as plain text lines, e.g. `Name: A`.
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.name),
            format!("{}: {}", self.id.label(), self.id.value()),
        ]
    }
}
