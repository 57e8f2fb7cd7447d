//! Borrowing request model and the pending/approved/declined state machine
//!
//! A book can have many pending requests but at most one approved one. Approving
//! a request declines every other pending request of the same book in the same
//! step, so a book never sits with both an approved and a pending request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::book::Book;
use super::user::UserShort;
use crate::error::{AppError, AppResult};

/// Borrowing request status, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BorrowStatus {
    Pending = 0,
    Approved = 1,
    Declined = 2,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Pending => "pending",
            BorrowStatus::Approved => "approved",
            BorrowStatus::Declined => "declined",
        }
    }

    /// Status reached by applying `decision`; only pending requests can move
    pub fn apply(self, decision: RequestDecision) -> AppResult<BorrowStatus> {
        match (self, decision) {
            (BorrowStatus::Pending, RequestDecision::Approve) => Ok(BorrowStatus::Approved),
            (BorrowStatus::Pending, RequestDecision::Decline) => Ok(BorrowStatus::Declined),
            (status, _) => Err(AppError::Conflict(format!(
                "Request is already {}",
                status.as_str()
            ))),
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for BorrowStatus {
    type Error = String;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(BorrowStatus::Pending),
            1 => Ok(BorrowStatus::Approved),
            2 => Ok(BorrowStatus::Declined),
            other => Err(format!("Invalid borrowing status code: {}", other)),
        }
    }
}

impl From<BorrowStatus> for i16 {
    fn from(status: BorrowStatus) -> Self {
        status as i16
    }
}

// SQLx conversion for BorrowStatus
impl sqlx::Type<Postgres> for BorrowStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BorrowStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let code: i16 = Decode::<Postgres>::decode(value)?;
        BorrowStatus::try_from(code).map_err(|e| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <i16 as Encode<Postgres>>::encode(i16::from(*self), buf)
    }
}

/// Owner's decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Approve,
    Decline,
}

/// Borrowing request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowingRequest {
    pub id: i32,
    pub book_id: i32,
    pub borrower_id: i32,
    pub status: BorrowStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book reference embedded in request details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
}

/// Borrowing request with book, borrower and owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowingRequestDetails {
    pub id: i32,
    pub status: BorrowStatus,
    pub book: BookRef,
    pub borrower: UserShort,
    pub owner: UserShort,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BorrowingRequestDetailsRow {
    pub id: i32,
    pub status: BorrowStatus,
    pub book_id: i32,
    pub book_title: String,
    pub borrower_id: i32,
    pub borrower_username: String,
    pub owner_id: i32,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BorrowingRequestDetailsRow> for BorrowingRequestDetails {
    fn from(row: BorrowingRequestDetailsRow) -> Self {
        BorrowingRequestDetails {
            id: row.id,
            status: row.status,
            book: BookRef {
                id: row.book_id,
                title: row.book_title,
            },
            borrower: UserShort {
                id: row.borrower_id,
                username: row.borrower_username,
            },
            owner: UserShort {
                id: row.owner_id,
                username: row.owner_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Borrowing request list filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BorrowingRequestQuery {
    /// pending, approved or declined
    pub status: Option<BorrowStatus>,
}

/// Status changes produced by an owner's decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPlan {
    pub request_id: i32,
    pub new_status: BorrowStatus,
    /// Other pending requests of the same book that get declined alongside an approval
    pub declined: Vec<i32>,
}

/// Check that `borrower_id` may open a new request on `book`.
///
/// `requests` must hold every request of the book.
pub fn check_borrow(book: &Book, borrower_id: i32, requests: &[BorrowingRequest]) -> AppResult<()> {
    if book.is_owned_by(borrower_id) {
        return Err(AppError::BusinessRule(
            "You cannot borrow your own book".to_string(),
        ));
    }

    if requests.iter().any(|r| r.status == BorrowStatus::Approved) {
        return Err(AppError::Conflict("Book is already borrowed".to_string()));
    }

    if requests
        .iter()
        .any(|r| r.borrower_id == borrower_id && r.status == BorrowStatus::Pending)
    {
        return Err(AppError::Conflict(
            "You already requested this book".to_string(),
        ));
    }

    Ok(())
}

/// Work out the status changes for `actor_id` deciding on request `request_id`.
///
/// `requests` must hold every request of `book`, the target included.
pub fn plan_decision(
    book: &Book,
    actor_id: i32,
    request_id: i32,
    requests: &[BorrowingRequest],
    decision: RequestDecision,
) -> AppResult<DecisionPlan> {
    let target = requests
        .iter()
        .find(|r| r.id == request_id && r.book_id == book.id)
        .ok_or_else(|| AppError::NotFound(format!("Borrowing request {} not found", request_id)))?;

    if !book.is_owned_by(actor_id) {
        return Err(AppError::Authorization(
            "Only the book owner can handle its borrowing requests".to_string(),
        ));
    }

    let new_status = target.status.apply(decision)?;

    let declined = match new_status {
        BorrowStatus::Approved => {
            if requests
                .iter()
                .any(|r| r.id != request_id && r.status == BorrowStatus::Approved)
            {
                return Err(AppError::Conflict("Book is already borrowed".to_string()));
            }
            requests
                .iter()
                .filter(|r| r.id != request_id && r.status == BorrowStatus::Pending)
                .map(|r| r.id)
                .collect()
        }
        _ => Vec::new(),
    };

    Ok(DecisionPlan {
        request_id,
        new_status,
        declined,
    })
}
