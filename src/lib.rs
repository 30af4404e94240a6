//! # Schedhub
//!
//! An internal tool for registering academic-conference events, tracking
//! attendee sign-ups, bulk-importing events from spreadsheets, and ranking
//! employees by attendance count.
//!
//! ## Usage
//!
//! ```bash
//! schedhub serve [--port 8293]
//! schedhub ranking [--period this-year] [--day-type weekday] [--group 서울1그룹]
//! schedhub import events.csv
//! ```
//!
//! ## Modules
//!
//! - `analytics` - The attendance aggregation engine and its filter model
//! - `api` - HTTP surface (CRUD, import, ranking, calendar feed)
//! - `calendar` - Calendar feed entries and the product color palette
//! - `config` - Configuration file loading with environment overrides
//! - `directory` - The static employee directory (roster)
//! - `hub` - In-memory event cache with a single refresh entry point
//! - `import` - Spreadsheet (CSV) field mapping for bulk import
//! - `storage` - Event store abstraction with REST and in-memory backends

pub mod analytics;
pub mod api;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod hub;
pub mod import;
pub mod storage;

pub use error::{Error, Result};
