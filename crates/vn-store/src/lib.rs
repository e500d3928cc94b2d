//! Collection storage for the VoiceNet ledger.
//!
//! The ledger persists three independently keyed collections: `voices`,
//! `dats`, and `royalties`. Each is stored as one JSON array and always
//! replaced whole, so a reader sees either the previous or the next
//! version of a collection, never a mix.
//!
//! # Storage Backends
//!
//! All backends implement the [`CollectionStore`] trait:
//!
//! - [`InMemoryCollectionStore`] -- `HashMap`-based, volatile; for tests and embedding
//! - [`FileCollectionStore`] -- one JSON file per collection under a root directory
//!
//! The backend is chosen once, at construction, from a [`StoreBackend`]
//! value (see [`open_store`]).
//!
//! # Design Rules
//!
//! 1. Reads favor availability: a missing, unreadable, or malformed
//!    collection reads as empty and is logged, never returned as an error.
//! 2. Writes replace the full collection and propagate every failure.
//! 3. The store never interprets records beyond (de)serializing them.

pub mod backend;
pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use backend::{open_store, StoreBackend};
pub use collection::Collection;
pub use error::{StoreError, StoreResult};
pub use file::FileCollectionStore;
pub use memory::InMemoryCollectionStore;
pub use traits::{CollectionStore, CollectionStoreExt};
