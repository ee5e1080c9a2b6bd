//! Content store aggregate: posts with nested, ordered replies.
//!
//! Post ids come from a strictly monotonic sequence, so an id freed by a
//! deletion is never handed out again. Reply ids are `reply count + 1`, which is
//! collision-free because replies are never removed individually.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use campusboard_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, IdSequence, PostId, ReplyId,
};
use campusboard_events::Event;

use crate::{NewPost, Post, Reply, Topic, TopicFilter};

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePost {
    pub post: NewPost,
    pub author: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReply {
    pub post_id: PostId,
    pub content: String,
    pub author: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePost {
    pub post_id: PostId,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentCommand {
    CreatePost(CreatePost),
    AddReply(AddReply),
    DeletePost(DeletePost),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreated {
    pub post_id: PostId,
    pub topic: Topic,
    pub title: String,
    pub content: String,
    pub author: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyAdded {
    pub post_id: PostId,
    pub reply_id: ReplyId,
    pub content: String,
    pub author: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDeleted {
    pub post_id: PostId,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentEvent {
    PostCreated(PostCreated),
    ReplyAdded(ReplyAdded),
    PostDeleted(PostDeleted),
}

impl Event for ContentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ContentEvent::PostCreated(_) => "forum.post.created",
            ContentEvent::ReplyAdded(_) => "forum.post.reply_added",
            ContentEvent::PostDeleted(_) => "forum.post.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_on(&self) -> NaiveDate {
        match self {
            ContentEvent::PostCreated(e) => e.occurred_on,
            ContentEvent::ReplyAdded(e) => e.occurred_on,
            ContentEvent::PostDeleted(e) => e.occurred_on,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory collection of posts, in insertion order (ascending id).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
    ids: IdSequence,
    version: u64,
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing posts; the id sequence continues after the largest id.
    pub fn from_posts(mut posts: Vec<Post>) -> DomainResult<Self> {
        posts.sort_by_key(|p| p.id);
        if posts.windows(2).any(|w| w[0].id == w[1].id) {
            return Err(DomainError::conflict("duplicate post id"));
        }

        let mut ids = IdSequence::new();
        if let Some(last) = posts.last() {
            ids.observe(last.id.get());
        }

        Ok(Self {
            posts,
            ids,
            version: 0,
        })
    }

    /// The two reference posts.
    pub fn seeded() -> Self {
        let posts = vec![
            Post {
                id: PostId::new(1),
                topic: Topic::AcademicResources,
                title: "Library Extended Hours".to_string(),
                content: "The library will have extended hours during finals week.".to_string(),
                author: "admin".to_string(),
                date: seed_date(2025, 3, 9),
                replies: Vec::new(),
            },
            Post {
                id: PostId::new(2),
                topic: Topic::Sports,
                title: "Basketball Tournament".to_string(),
                content: "Join us for the annual basketball tournament next weekend!".to_string(),
                author: "faculty1".to_string(),
                date: seed_date(2025, 3, 8),
                replies: Vec::new(),
            },
        ];

        Self {
            posts,
            ids: IdSequence::starting_after(2),
            version: 0,
        }
    }

    /// Create a post and return it. Title and content are stored trimmed.
    pub fn create_post(
        &mut self,
        post: NewPost,
        author: &str,
        on: NaiveDate,
    ) -> DomainResult<&Post> {
        let events = self.execute(&ContentCommand::CreatePost(CreatePost {
            post,
            author: author.to_string(),
            occurred_on: on,
        }))?;

        match events.as_slice() {
            [ContentEvent::PostCreated(e)] => self.require(e.post_id),
            _ => Err(DomainError::invariant("create post emitted unexpected events")),
        }
    }

    /// Append a reply to `post_id` and return the updated post.
    pub fn add_reply(
        &mut self,
        post_id: PostId,
        content: &str,
        author: &str,
        on: NaiveDate,
    ) -> DomainResult<&Post> {
        self.execute(&ContentCommand::AddReply(AddReply {
            post_id,
            content: content.to_string(),
            author: author.to_string(),
            occurred_on: on,
        }))?;
        self.require(post_id)
    }

    /// Remove `post_id` (and its replies) and return what was removed.
    pub fn delete_post(&mut self, post_id: PostId, on: NaiveDate) -> DomainResult<Post> {
        let removed = self.require(post_id)?.clone();
        self.execute(&ContentCommand::DeletePost(DeletePost {
            post_id,
            occurred_on: on,
        }))?;
        Ok(removed)
    }

    /// Snapshot of the posts selected by `filter`, in insertion order.
    pub fn filter_by_topic(&self, filter: TopicFilter) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| filter.matches(p.topic))
            .cloned()
            .collect()
    }

    pub fn get(&self, post_id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The id the next created post will receive.
    pub fn next_post_id(&self) -> PostId {
        PostId::new(self.ids.peek())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn require(&self, post_id: PostId) -> DomainResult<&Post> {
        self.get(post_id).ok_or(DomainError::PostNotFound(post_id))
    }

    fn get_mut(&mut self, post_id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }
}

fn non_empty(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

impl AggregateRoot for ContentStore {
    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for ContentStore {
    type Command = ContentCommand;
    type Event = ContentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ContentEvent::PostCreated(e) => self.apply_post_created(e),
            ContentEvent::ReplyAdded(e) => self.apply_reply_added(e),
            ContentEvent::PostDeleted(e) => self.apply_post_deleted(e),
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ContentCommand::CreatePost(cmd) => self.handle_create_post(cmd),
            ContentCommand::AddReply(cmd) => self.handle_add_reply(cmd),
            ContentCommand::DeletePost(cmd) => self.handle_delete_post(cmd),
        }
    }
}

impl ContentStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Command Handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_create_post(&self, cmd: &CreatePost) -> DomainResult<Vec<ContentEvent>> {
        let title = non_empty("title", &cmd.post.title)?;
        let content = non_empty("content", &cmd.post.content)?;
        let author = non_empty("author", &cmd.author)?;

        Ok(vec![ContentEvent::PostCreated(PostCreated {
            post_id: self.next_post_id(),
            topic: cmd.post.topic,
            title,
            content,
            author,
            occurred_on: cmd.occurred_on,
        })])
    }

    fn handle_add_reply(&self, cmd: &AddReply) -> DomainResult<Vec<ContentEvent>> {
        let post = self.require(cmd.post_id)?;
        let content = non_empty("reply", &cmd.content)?;
        let author = non_empty("author", &cmd.author)?;

        Ok(vec![ContentEvent::ReplyAdded(ReplyAdded {
            post_id: post.id,
            reply_id: ReplyId::new(post.replies.len() as u64 + 1),
            content,
            author,
            occurred_on: cmd.occurred_on,
        })])
    }

    fn handle_delete_post(&self, cmd: &DeletePost) -> DomainResult<Vec<ContentEvent>> {
        self.require(cmd.post_id)?;

        Ok(vec![ContentEvent::PostDeleted(PostDeleted {
            post_id: cmd.post_id,
            occurred_on: cmd.occurred_on,
        })])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Appliers
    // ─────────────────────────────────────────────────────────────────────────

    fn apply_post_created(&mut self, e: &PostCreated) {
        self.ids.observe(e.post_id.get());
        self.posts.push(Post {
            id: e.post_id,
            topic: e.topic,
            title: e.title.clone(),
            content: e.content.clone(),
            author: e.author.clone(),
            date: e.occurred_on,
            replies: Vec::new(),
        });
    }

    fn apply_reply_added(&mut self, e: &ReplyAdded) {
        if let Some(post) = self.get_mut(e.post_id) {
            post.replies.push(Reply {
                id: e.reply_id,
                content: e.content.clone(),
                author: e.author.clone(),
                date: e.occurred_on,
            });
        }
    }

    fn apply_post_deleted(&mut self, e: &PostDeleted) {
        self.posts.retain(|p| p.id != e.post_id);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
