//! Feed caching use cases.
//!
//! This module provides the time-bounded feed cache built on top of the
//! storage subsystem.
//!
//! Components:
//! - `policy`: the pure seven-day freshness rule.
//! - `local_loader`: save / load / validate against an injected `Storage`.

pub mod local_loader;
pub mod policy;

pub use local_loader::LocalFeedLoader;
pub use policy::CachePolicy;
