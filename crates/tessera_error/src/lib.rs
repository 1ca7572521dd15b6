//! Error types for the Tessera workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use tessera_error::{TesseraResult, HttpError};
//!
//! fn fetch_data() -> TesseraResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod client;
mod config;
mod error;
mod http;
mod json;
mod narrative;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use client::{ClientError, ClientErrorKind};
pub use config::ConfigError;
pub use error::{TesseraError, TesseraErrorKind, TesseraResult};
pub use http::HttpError;
pub use json::JsonError;
pub use narrative::{NarrativeError, NarrativeErrorKind};
pub use storage::{StorageError, StorageErrorKind};
