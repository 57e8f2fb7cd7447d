//! Data models for Bookshare

pub mod author;
pub mod book;
pub mod borrowing_request;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails};
pub use borrowing_request::{BorrowStatus, BorrowingRequest, BorrowingRequestDetails, RequestDecision};
pub use user::{User, UserShort};
