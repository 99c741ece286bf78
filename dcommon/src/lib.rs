//! Identifier, metadata, and storage primitives shared by every duet crate.
//!
//! ```rust
//! use dcommon::{MetadataMap, Registry, SessionId};
//!
//! let mut sessions: Registry<SessionId, MetadataMap> = Registry::new();
//! sessions
//!     .get_or_insert_with(SessionId::from("session-1"), MetadataMap::new)
//!     .insert("conversation_id".into(), "c-1".into());
//!
//! assert_eq!(sessions.len(), 1);
//! assert_eq!(sessions.get("session-1").map(|meta| meta.len()), Some(1));
//! ```

mod id;
mod registry;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

pub use id::SessionId;
pub use registry::Registry;

/// Heap-allocated `Send` future used at trait-object boundaries.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// String pairs kept sorted so snapshots and logs serialize deterministically.
pub type MetadataMap = BTreeMap<String, String>;
