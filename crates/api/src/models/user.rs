//! User domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ecommerce_core::{Email, UserId};

use crate::validation::{FieldReader, NOT_EMAIL, ValidationErrors};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Unique email address.
    pub email: Email,
}

/// Validated fields for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub address: String,
    pub email: Email,
}

impl User {
    /// Maximum length of `name`.
    pub const NAME_MAX: usize = 50;
    /// Maximum length of `address`.
    pub const ADDRESS_MAX: usize = 200;
}

impl NewUser {
    const FIELDS: &'static [&'static str] = &["name", "address", "email"];

    /// Validate a request body.
    ///
    /// # Errors
    ///
    /// Returns every offending field when `body` is not a valid user.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(body, Self::FIELDS)?;

        let name = reader.string("name", User::NAME_MAX);
        let address = reader.string("address", User::ADDRESS_MAX);
        let email = reader
            .string("email", Email::MAX_LENGTH)
            .and_then(|raw| match Email::parse(&raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    reader.reject("email", NOT_EMAIL);
                    None
                }
            });

        let errors = reader.finish();
        match (name, address, email) {
            (Some(name), Some(address), Some(email)) if errors.is_empty() => Ok(Self {
                name,
                address,
                email,
            }),
            _ => Err(errors),
        }
    }

    /// The user this input produces once stored under `id`.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            address: self.address,
            email: self.email,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::MISSING;

    #[test]
    fn test_valid_user() {
        let body = json!({"name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"});
        let user = NewUser::from_json(&body).unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_missing_email_is_reported() {
        let body = json!({"name": "Ada", "address": "1 Loop Rd"});
        let errors = NewUser::from_json(&body).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), [MISSING]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["email"]);
    }

    #[test]
    fn test_invalid_email_and_long_name() {
        let body = json!({
            "name": "x".repeat(51),
            "address": "1 Loop Rd",
            "email": "not-an-email",
        });
        let errors = NewUser::from_json(&body).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), [NOT_EMAIL]);
        assert_eq!(
            errors.get("name").unwrap(),
            ["Longer than maximum length 50."]
        );
    }

    #[test]
    fn test_serializes_wire_shape() {
        let user = User {
            id: UserId::new(4),
            name: "Ada".to_owned(),
            address: "1 Loop Rd".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"id": 4, "name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"})
        );
    }
}
