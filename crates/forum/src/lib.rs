//! Forum content: topics, posts with nested replies, and the content store.
//!
//! Deterministic domain logic only (no IO, no clock, no authorization). Authors
//! and dates are supplied by the caller.

pub mod post;
pub mod store;
pub mod topic;

pub use post::{NewPost, Post, Reply};
pub use store::{
    AddReply, ContentCommand, ContentEvent, ContentStore, CreatePost, DeletePost, PostCreated,
    PostDeleted, ReplyAdded,
};
pub use topic::{Topic, TopicFilter};
