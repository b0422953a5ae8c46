//! `motionlog` - records motion-sensor events and shows them on a web page
//!
//! Sensors POST `{"timestamp": ...}` to `/api/resource`; every event is
//! appended to a single `SQLite` table and listed, newest first, at `/`.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod server;
pub mod storage;

pub use config::Config;
pub use entry::{MotionLogEntry, Timestamp};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use server::{ApiError, Server};
pub use storage::Storage;
