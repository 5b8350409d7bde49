use serde::Serialize;
use sqlx::FromRow;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Employee,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(String);

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "CLIENT" => Ok(Role::Client),
            "EMPLOYEE" => Ok(Role::Employee),
            _ => Err(UnknownRole(value)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Client => "CLIENT",
            Role::Employee => "EMPLOYEE",
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    /// Unique login, usually an email address.
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub birth_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

impl User {
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
