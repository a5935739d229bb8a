//! ticklist — a server-backed todo list and the client that stays in
//! sync with it.
//!
//! Three layers, one entity: `todo` defines the record and its wire
//! shape, `store` persists it (redb + postcard), `api` serves it over
//! four HTTP operations, and `client` keeps a rendered view reconciled
//! against those operations.

pub mod api;
pub mod client;
pub mod config;
pub mod store;
pub mod todo;

pub use client::SyncClient;
pub use store::TodoStore;
pub use todo::Todo;
