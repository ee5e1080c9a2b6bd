use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use campusboard_core::{Entity, PostId, ReplyId};

use crate::Topic;

/// A reply attached to a post. Never edited or deleted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Position-derived id, unique only within the parent post.
    pub id: ReplyId,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
}

/// A post and its replies, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub topic: Topic,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub replies: Vec<Reply>,
}

impl Post {
    /// "1 Reply" / "3 Replies", as the reply toggle labels it.
    pub fn reply_summary(&self) -> String {
        match self.replies.len() {
            1 => "1 Reply".to_string(),
            n => format!("{n} Replies"),
        }
    }
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// User-entered fields of a post. The author is never user-entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub topic: Topic,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(topic: Topic, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            topic,
            title: title.into(),
            content: content.into(),
        }
    }
}
