/// Domain entities and client-facing projections
pub mod models;

pub use models::{Comment, CommentView, Post, PostView, User, UserRef, UserSummary};
