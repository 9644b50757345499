//! Social graph & content-interaction core: follow/follower maintenance,
//! feed composition, and idempotent like/comment mutation over a document
//! store, plus account lifecycle and the image pipeline seams.
//!
//! Authentication, HTTP routing, and storage internals live outside this
//! crate; callers pass resolved user ids in and receive domain results back.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repository;
pub mod services;
