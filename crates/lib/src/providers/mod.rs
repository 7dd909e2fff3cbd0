//! # Providers
//!
//! Clients for the external services the pipeline talks to: the chat model
//! (`ai`) and the object store the finished tables are published to
//! (`storage`).

pub mod ai;
pub mod factory;
pub mod storage;
