//! The board: session, account directory and content store behind one
//! caller that enforces the role policy.
//!
//! The stores perform no authorization. Every privileged operation here
//! resolves the acting account from the session and checks
//! [`campusboard_auth::authorize`] before touching a store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use campusboard_auth::{
    Account, AccountDirectory, Action, AuthError, AuthzError, DirectoryCommand, DirectoryEvent,
    Role, Session, SessionAccount, ToggleDisabled, authorize_session, permitted_actions,
};
use campusboard_core::{Aggregate, DomainError, IdSequence, PostId};
use campusboard_events::{Event, EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use campusboard_forum::{
    AddReply, ContentCommand, ContentEvent, ContentStore, CreatePost, DeletePost, NewPost, Post,
    TopicFilter,
};

use crate::{BoardConfig, BoardError, Clock, SystemClock};

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn {
        username: String,
        role: Role,
        occurred_on: NaiveDate,
    },
    LoggedOut {
        username: String,
        occurred_on: NaiveDate,
    },
}

/// Everything the board publishes after a successful change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    Session(SessionEvent),
    Content(ContentEvent),
    Directory(DirectoryEvent),
}

impl BoardEvent {
    pub fn aggregate_type(&self) -> &'static str {
        match self {
            BoardEvent::Session(_) => "auth.session",
            BoardEvent::Content(_) => "forum.content",
            BoardEvent::Directory(_) => "auth.directory",
        }
    }
}

impl Event for BoardEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BoardEvent::Session(SessionEvent::LoggedIn { .. }) => "auth.session.logged_in",
            BoardEvent::Session(SessionEvent::LoggedOut { .. }) => "auth.session.logged_out",
            BoardEvent::Content(e) => e.event_type(),
            BoardEvent::Directory(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_on(&self) -> NaiveDate {
        match self {
            BoardEvent::Session(SessionEvent::LoggedIn { occurred_on, .. })
            | BoardEvent::Session(SessionEvent::LoggedOut { occurred_on, .. }) => *occurred_on,
            BoardEvent::Content(e) => e.occurred_on(),
            BoardEvent::Directory(e) => e.occurred_on(),
        }
    }
}

impl From<SessionEvent> for BoardEvent {
    fn from(value: SessionEvent) -> Self {
        BoardEvent::Session(value)
    }
}

impl From<ContentEvent> for BoardEvent {
    fn from(value: ContentEvent) -> Self {
        BoardEvent::Content(value)
    }
}

impl From<DirectoryEvent> for BoardEvent {
    fn from(value: DirectoryEvent) -> Self {
        BoardEvent::Directory(value)
    }
}

pub type BoardEnvelope = EventEnvelope<BoardEvent>;

// ─────────────────────────────────────────────────────────────────────────────
// Board
// ─────────────────────────────────────────────────────────────────────────────

/// Single-user board instance. All operations are synchronous.
#[derive(Debug)]
pub struct Board<C = SystemClock> {
    directory: AccountDirectory,
    session: Session,
    content: ContentStore,
    filter: TopicFilter,
    config: BoardConfig,
    clock: C,
    bus: InMemoryEventBus<BoardEnvelope>,
    sequence: IdSequence,
}

impl Board<SystemClock> {
    pub fn new(config: BoardConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Board<SystemClock> {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl<C: Clock> Board<C> {
    /// Reference accounts, plus the reference posts when `config.seed_posts` is set.
    pub fn with_clock(config: BoardConfig, clock: C) -> Self {
        let content = if config.seed_posts {
            ContentStore::seeded()
        } else {
            ContentStore::new()
        };
        Self::from_parts(AccountDirectory::seeded(), content, config, clock)
    }

    pub fn from_parts(
        directory: AccountDirectory,
        content: ContentStore,
        config: BoardConfig,
        clock: C,
    ) -> Self {
        Self {
            directory,
            session: Session::LoggedOut,
            content,
            filter: config.default_filter,
            config,
            clock,
            bus: InMemoryEventBus::new(),
            sequence: IdSequence::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Log in with the role name as chosen on the sign-in form.
    ///
    /// An unknown role name can match no account and is reported as
    /// `InvalidCredentials`. While a session is active every attempt is
    /// refused with `AlreadyAuthenticated` and nothing is published.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<SessionAccount, BoardError> {
        let result = role
            .parse::<Role>()
            .map_err(|_| AuthError::InvalidCredentials)
            .and_then(|role| self.session.login(&self.directory, username, password, role));

        match result {
            Ok(account) => {
                info!(username, role = %account.role, "logged in");
                self.publish(SessionEvent::LoggedIn {
                    username: account.username.clone(),
                    role: account.role,
                    occurred_on: self.clock.today(),
                });
                Ok(account)
            }
            Err(err) => {
                debug!(username, error = %err, "login rejected");
                Err(err.into())
            }
        }
    }

    /// End the session, if any.
    pub fn logout(&mut self) -> Option<SessionAccount> {
        let ended = self.session.logout()?;
        info!(username = %ended.username, "logged out");
        self.publish(SessionEvent::LoggedOut {
            username: ended.username.clone(),
            occurred_on: self.clock.today(),
        });
        Some(ended)
    }

    pub fn current_user(&self) -> Option<&SessionAccount> {
        self.session.current()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Actions the current user may perform; empty when logged out.
    pub fn permitted_actions(&self) -> Vec<Action> {
        self.current_user()
            .map(|account| permitted_actions(account.role))
            .unwrap_or_default()
    }

    pub fn can(&self, action: Action) -> bool {
        authorize_session(&self.session, action).is_ok()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a post authored by the current user.
    pub fn create_post(&mut self, post: NewPost) -> Result<&Post, BoardError> {
        let actor = self.authorize(Action::CreatePost)?;
        let events = self
            .content
            .execute(&ContentCommand::CreatePost(CreatePost {
                post,
                author: actor.username.clone(),
                occurred_on: self.clock.today(),
            }))
            .inspect_err(|err| debug!(username = %actor.username, error = %err, "post rejected"))?;

        let post_id = match events.as_slice() {
            [ContentEvent::PostCreated(e)] => e.post_id,
            _ => return Err(DomainError::invariant("create post emitted unexpected events").into()),
        };
        info!(username = %actor.username, %post_id, "post created");
        self.publish_all(events);

        self.content
            .get(post_id)
            .ok_or(BoardError::Domain(DomainError::PostNotFound(post_id)))
    }

    /// Reply to `post_id` as the current user.
    pub fn reply(&mut self, post_id: PostId, content: &str) -> Result<&Post, BoardError> {
        let actor = self.authorize(Action::Reply)?;
        let events = self
            .content
            .execute(&ContentCommand::AddReply(AddReply {
                post_id,
                content: content.to_string(),
                author: actor.username.clone(),
                occurred_on: self.clock.today(),
            }))
            .inspect_err(|err| {
                debug!(username = %actor.username, %post_id, error = %err, "reply rejected")
            })?;

        info!(username = %actor.username, %post_id, "reply added");
        self.publish_all(events);

        self.content
            .get(post_id)
            .ok_or(BoardError::Domain(DomainError::PostNotFound(post_id)))
    }

    /// Delete `post_id`. Moderators and administrators only.
    pub fn delete_post(&mut self, post_id: PostId) -> Result<Post, BoardError> {
        let actor = self.authorize(Action::DeletePost)?;
        let removed = self
            .content
            .get(post_id)
            .cloned()
            .ok_or(DomainError::PostNotFound(post_id))
            .inspect_err(|err| {
                debug!(username = %actor.username, error = %err, "delete rejected")
            })?;

        let events = self.content.execute(&ContentCommand::DeletePost(DeletePost {
            post_id,
            occurred_on: self.clock.today(),
        }))?;

        info!(username = %actor.username, %post_id, "post deleted");
        self.publish_all(events);
        Ok(removed)
    }

    /// Posts selected by `filter`, as a snapshot.
    pub fn posts(&self, filter: TopicFilter) -> Result<Vec<Post>, BoardError> {
        self.session.current().ok_or(AuthzError::NotAuthenticated)?;
        Ok(self.content.filter_by_topic(filter))
    }

    /// Posts selected by the current view filter.
    pub fn visible_posts(&self) -> Result<Vec<Post>, BoardError> {
        self.posts(self.filter)
    }

    pub fn set_topic_filter(&mut self, filter: TopicFilter) {
        debug!(%filter, "topic filter changed");
        self.filter = filter;
    }

    pub fn topic_filter(&self) -> TopicFilter {
        self.filter
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────

    /// Every account, for the user management view. Administrators only.
    pub fn accounts(&self) -> Result<&[Account], BoardError> {
        self.authorize(Action::ViewAccounts)?;
        Ok(self.directory.accounts())
    }

    /// Enable or disable `username`. Administrators only; protected accounts
    /// (see [`BoardConfig::protected_accounts`]) are refused.
    pub fn toggle_account(&mut self, username: &str) -> Result<&Account, BoardError> {
        let actor = self.authorize(Action::ManageAccounts)?;
        if self.config.is_protected(username) {
            debug!(
                username = %actor.username,
                account = username,
                "toggle of protected account refused"
            );
            return Err(AuthzError::ProtectedAccount(username.to_string()).into());
        }

        let events = self
            .directory
            .execute(&DirectoryCommand::ToggleDisabled(ToggleDisabled {
                username: username.to_string(),
                occurred_on: self.clock.today(),
            }))
            .inspect_err(|err| {
                debug!(username = %actor.username, error = %err, "toggle rejected")
            })?;

        info!(username = %actor.username, account = username, "account status toggled");
        self.publish_all(events);

        self.directory
            .get(username)
            .ok_or(BoardError::Domain(DomainError::account_not_found(username)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots & notifications
    // ─────────────────────────────────────────────────────────────────────────

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Receive an envelope for every change made after this call.
    pub fn subscribe(&self) -> Subscription<BoardEnvelope> {
        self.bus.subscribe()
    }

    fn authorize(&self, action: Action) -> Result<SessionAccount, BoardError> {
        authorize_session(&self.session, action)
            .cloned()
            .inspect_err(|err| debug!(%action, error = %err, "action not authorized"))
            .map_err(BoardError::from)
    }

    fn publish(&mut self, event: impl Into<BoardEvent>) {
        let event = event.into();
        let envelope = EventEnvelope::wrap(event.aggregate_type(), self.sequence.next(), event);
        if let Err(err) = self.bus.publish(envelope) {
            debug!(?err, "board event not delivered");
        }
    }

    fn publish_all<E: Into<BoardEvent>>(&mut self, events: Vec<E>) {
        for event in events {
            self.publish(event);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use campusboard_forum::Topic;

    use super::*;
    use crate::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn board() -> Board<FixedClock> {
        Board::with_clock(BoardConfig::default(), FixedClock::new(today()))
    }

    fn logged_in(username: &str, password: &str, role: &str) -> Board<FixedClock> {
        let mut board = board();
        board.login(username, password, role).unwrap();
        board
    }

    #[test]
    fn unknown_role_name_is_invalid_credentials() {
        let mut board = board();
        let err = board.login("student1", "student123", "Teacher").unwrap_err();
        assert_eq!(err, BoardError::Auth(AuthError::InvalidCredentials));
        assert!(board.current_user().is_none());
    }

    #[test]
    fn logged_out_board_refuses_content_operations() {
        let mut board = board();
        let err = board
            .create_post(NewPost::new(Topic::Campus, "t", "c"))
            .unwrap_err();
        assert_eq!(err, BoardError::Authz(AuthzError::NotAuthenticated));
        assert!(board.visible_posts().is_err());
        assert!(board.permitted_actions().is_empty());
    }

    #[test]
    fn post_author_and_date_come_from_session_and_clock() {
        let mut board = logged_in("staff1", "staff123", "Staff");
        let post = board
            .create_post(NewPost::new(Topic::Technology, "Wi-Fi", "Down in hall B"))
            .unwrap();
        assert_eq!(post.author, "staff1");
        assert_eq!(post.date, today());
        assert_eq!(post.id, PostId::new(3));
    }

    #[test]
    fn student_cannot_delete_moderator_can() {
        let mut student = logged_in("student1", "student123", "Student");
        let err = student.delete_post(PostId::new(1)).unwrap_err();
        assert!(matches!(
            err,
            BoardError::Authz(AuthzError::Forbidden {
                role: Role::Student,
                action: Action::DeletePost
            })
        ));
        assert_eq!(student.content().len(), 2);

        let mut moderator = logged_in("moderator", "mod123", "Moderator");
        let removed = moderator.delete_post(PostId::new(1)).unwrap();
        assert_eq!(removed.title, "Library Extended Hours");
        assert_eq!(
            moderator.delete_post(PostId::new(1)).unwrap_err(),
            BoardError::Domain(DomainError::PostNotFound(PostId::new(1)))
        );
    }

    #[test]
    fn only_administrators_manage_accounts() {
        let mut moderator = logged_in("moderator", "mod123", "Moderator");
        assert!(moderator.accounts().is_err());
        assert!(matches!(
            moderator.toggle_account("student1").unwrap_err(),
            BoardError::Authz(AuthzError::Forbidden { .. })
        ));

        let mut admin = logged_in("admin", "admin123", "Administrator");
        assert_eq!(admin.accounts().unwrap().len(), 6);
        assert!(admin.toggle_account("student1").unwrap().is_disabled());
    }

    #[test]
    fn protected_account_is_refused_before_directory() {
        let mut admin = logged_in("admin", "admin123", "Administrator");
        assert_eq!(
            admin.toggle_account("admin").unwrap_err(),
            BoardError::Authz(AuthzError::ProtectedAccount("admin".to_string()))
        );
        assert!(!admin.directory().get("admin").unwrap().is_disabled());
    }

    #[test]
    fn unprotected_config_lets_admin_toggle_itself() {
        let config = BoardConfig {
            protected_accounts: Vec::new(),
            ..BoardConfig::default()
        };
        let mut board = Board::with_clock(config, FixedClock::new(today()));
        board.login("admin", "admin123", "Administrator").unwrap();
        assert!(board.toggle_account("admin").unwrap().is_disabled());
        // The active session survives its own account being disabled.
        assert_eq!(board.current_user().unwrap().username, "admin");
    }

    #[test]
    fn toggle_unknown_account_is_not_found() {
        let mut admin = logged_in("admin", "admin123", "Administrator");
        assert_eq!(
            admin.toggle_account("ghost").unwrap_err(),
            BoardError::Domain(DomainError::AccountNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn view_filter_defaults_from_config() {
        let config = BoardConfig {
            default_filter: TopicFilter::Only(Topic::Sports),
            ..BoardConfig::default()
        };
        let mut board = Board::with_clock(config, FixedClock::new(today()));
        board.login("faculty1", "faculty123", "Faculty").unwrap();

        let titles: Vec<_> = board.visible_posts().unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Basketball Tournament"]);

        board.set_topic_filter(TopicFilter::All);
        assert_eq!(board.visible_posts().unwrap().len(), 2);
    }

    #[test]
    fn unseeded_board_starts_empty() {
        let config = BoardConfig {
            seed_posts: false,
            ..BoardConfig::default()
        };
        let mut board = Board::with_clock(config, FixedClock::new(today()));
        board.login("student1", "student123", "Student").unwrap();
        assert!(board.visible_posts().unwrap().is_empty());
        let post = board.create_post(NewPost::new(Topic::Social, "Hi", "First!")).unwrap();
        assert_eq!(post.id, PostId::new(1));
    }

    #[test]
    fn successful_changes_are_published_in_order() {
        let mut board = board();
        let sub = board.subscribe();

        assert!(board.login("moderator", "wrong", "Moderator").is_err());
        board.login("moderator", "mod123", "Moderator").unwrap();
        board.reply(PostId::new(2), "Count me in").unwrap();
        board.delete_post(PostId::new(1)).unwrap();
        board.logout();

        let received = sub.drain();
        let types: Vec<_> = received.iter().map(|e| e.event_type().to_string()).collect();
        assert_eq!(
            types,
            vec![
                "auth.session.logged_in",
                "forum.post.reply_added",
                "forum.post.deleted",
                "auth.session.logged_out",
            ]
        );
        let seqs: Vec<_> = received.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(received[1].aggregate_type(), "forum.content");
    }

    #[test]
    fn second_login_is_refused_until_logout() {
        let mut board = logged_in("student1", "student123", "Student");
        let sub = board.subscribe();

        let err = board.login("admin", "admin123", "Administrator").unwrap_err();
        assert_eq!(err, BoardError::Auth(AuthError::AlreadyAuthenticated));
        assert_eq!(board.current_user().unwrap().username, "student1");
        assert!(sub.drain().is_empty());

        board.logout();
        board.login("admin", "admin123", "Administrator").unwrap();
        let types: Vec<_> = sub
            .drain()
            .into_iter()
            .map(|e| e.event_type().to_string())
            .collect();
        assert_eq!(types, vec!["auth.session.logged_out", "auth.session.logged_in"]);
    }

    #[test]
    fn permitted_actions_follow_role() {
        let board = logged_in("moderator", "mod123", "Moderator");
        assert!(board.can(Action::DeletePost));
        assert!(!board.can(Action::ManageAccounts));
        assert_eq!(
            board.permitted_actions(),
            vec![Action::CreatePost, Action::Reply, Action::DeletePost]
        );
    }
}
