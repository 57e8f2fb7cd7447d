//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::{not_blank, Author};
use super::user::UserShort;

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub author_id: i32,
    pub owner_id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.owner_id == user_id
    }
}

/// Book with author, owner and availability, as seen by a given user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: Author,
    pub owner: UserShort,
    /// The book has an approved borrowing request
    pub is_borrowed: bool,
    /// The requesting user owns this book
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
}

/// Flat row used to build [`BookDetails`]
#[derive(Debug, Clone, FromRow)]
pub struct BookDetailsRow {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i32,
    pub author_first_name: String,
    pub author_last_name: String,
    pub owner_id: i32,
    pub owner_username: String,
    pub is_borrowed: bool,
}

impl BookDetailsRow {
    pub fn into_details(self, viewer_id: i32) -> BookDetails {
        BookDetails {
            id: self.id,
            title: self.title,
            author: Author {
                id: self.author_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
            },
            is_owner: self.owner_id == viewer_id,
            owner: UserShort {
                id: self.owner_id,
                username: self.owner_username,
            },
            is_borrowed: self.is_borrowed,
            created_at: self.created_at,
        }
    }
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive title search
    pub title: Option<String>,
    pub author_id: Option<i32>,
    /// Only books without an approved request (true) or only borrowed ones (false)
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl BookQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    pub author_id: i32,
    #[validate(
        length(max = 100, message = "Title must be at most 100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub author_id: Option<i32>,
    #[validate(
        length(max = 100, message = "Title must be at most 100 characters"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
}
