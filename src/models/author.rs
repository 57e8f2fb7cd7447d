//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Author record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(
        length(max = 30, message = "First name must be at most 30 characters"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(max = 30, message = "Last name must be at most 30 characters"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
}

/// Update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(
        length(max = 30, message = "First name must be at most 30 characters"),
        custom(function = "not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(max = 30, message = "Last name must be at most 30 characters"),
        custom(function = "not_blank")
    )]
    pub last_name: Option<String>,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_author_validation() {
        let author = CreateAuthor {
            first_name: "George".into(),
            last_name: "Orwell".into(),
        };
        assert!(author.validate().is_ok());

        let blank = CreateAuthor {
            first_name: "  ".into(),
            last_name: "Orwell".into(),
        };
        assert!(blank.validate().is_err());

        let long = CreateAuthor {
            first_name: "G".repeat(31),
            last_name: "Orwell".into(),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_update_author_skips_missing_fields() {
        let update = UpdateAuthor {
            first_name: None,
            last_name: Some("Blair".into()),
        };
        assert!(update.validate().is_ok());
    }
}
