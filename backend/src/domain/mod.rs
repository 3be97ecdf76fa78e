//! Domain primitives, ports, and services.
//!
//! Purpose: Define the user record types and the use-case ports the inbound
//! HTTP adapter calls, independent of actix and of the store driver.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport agnostic failure.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserDetails, UserPatch, UserRecord, UserId: the user record model.
//! - UserDirectoryService: implements `ports::UsersQuery` and
//!   `ports::UsersCommand` over `ports::UserRepository`.

pub mod error;
pub mod ports;
pub mod user;
pub mod user_directory_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{UserDetails, UserId, UserPatch, UserRecord, UserValidationError};
pub use self::user_directory_service::{USER_NOT_FOUND, UserDirectoryService};
