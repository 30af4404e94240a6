//! Event store abstraction
//!
//! The application delegates persistence to a managed backend-as-a-service;
//! this module defines the contract ([`EventStore`]) plus two backends: a
//! PostgREST-style HTTP client for the real store and an in-memory table for
//! tests and offline use.

pub mod backends;
pub mod error;
pub mod traits;
pub mod types;

pub use backends::{MemoryStore, RestStore};
pub use error::{StorageError, StorageResult};
pub use traits::EventStore;
pub use types::{Event, NewEvent};
