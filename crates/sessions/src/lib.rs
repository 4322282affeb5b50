//! Session message storage.
//!
//! Each session is an ordered list of [`MessageRecord`]s keyed by a
//! client-generated [`SessionId`]. The only backend today is the in-memory
//! [`InMemoryMessageStore`]; everything is lost when the process exits.

pub mod key;
pub mod message;
pub mod store;

pub use {
    key::SessionId,
    message::MessageRecord,
    store::{InMemoryMessageStore, MessageStore},
};
