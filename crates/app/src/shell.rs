//! Line-oriented shell over a [`Board`].
//!
//! One command per line; the reply for each line is written back followed by
//! a blank line. This is a thin presentation layer: every rule lives in the
//! board and the stores.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::Context;

use campusboard_core::PostId;
use campusboard_forum::{NewPost, Post, TopicFilter};

use crate::{Board, BoardError, Clock};

pub const HELP: &str = "\
commands:
  login <username> <password> <role>
  logout
  whoami
  topic <topic|All>
  list
  show <post id>
  post <topic> | <title> | <content>
  reply <post id> <text>
  delete <post id>
  accounts
  toggle <username>
  dump
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Read commands from `input` until EOF or `quit`, writing replies to `output`.
pub fn run<C, R, W>(board: &mut Board<C>, input: R, mut output: W) -> anyhow::Result<()>
where
    C: Clock,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Campus Blogging Platform. Type 'help' for commands.")
        .context("failed to write banner")?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        match execute(board, &line) {
            Outcome::Continue(reply) => {
                if !reply.is_empty() {
                    writeln!(output, "{reply}\n").context("failed to write reply")?;
                }
            }
            Outcome::Quit => break,
        }
        output.flush().context("failed to flush output")?;
    }

    Ok(())
}

/// Execute a single command line.
pub fn execute<C: Clock>(board: &mut Board<C>, line: &str) -> Outcome {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let result = match command {
        "" => Ok(String::new()),
        "quit" | "exit" => return Outcome::Quit,
        "help" => Ok(HELP.to_string()),
        "login" => login(board, rest),
        "logout" => Ok(match board.logout() {
            Some(account) => format!("Goodbye, {}.", account.username),
            None => "Not logged in.".to_string(),
        }),
        "whoami" => Ok(match board.current_user() {
            Some(account) => format!("{} ({})", account.username, account.role),
            None => "Not logged in.".to_string(),
        }),
        "topic" => topic(board, rest),
        "list" => list(board),
        "show" => show(board, rest),
        "post" => post(board, rest),
        "reply" => reply(board, rest),
        "delete" => delete(board, rest),
        "accounts" => accounts(board),
        "toggle" => toggle(board, rest),
        "dump" => dump(board),
        other => Ok(format!("Unknown command '{other}'. Type 'help'.")),
    };

    Outcome::Continue(result.unwrap_or_else(|err| err.user_message()))
}

fn usage(text: &str) -> Result<String, BoardError> {
    Ok(format!("usage: {text}"))
}

fn login<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [username, password, role] = parts.as_slice() else {
        return usage("login <username> <password> <role>");
    };

    let account = board.login(username, password, role)?;
    Ok(format!("Welcome, {} ({}).", account.username, account.role))
}

fn topic<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    if args.is_empty() {
        return Ok(format!("Current topic: {}", board.topic_filter()));
    }
    let filter: TopicFilter = args.parse()?;
    board.set_topic_filter(filter);
    Ok(format!("Showing: {filter}"))
}

fn author_label<C: Clock>(board: &Board<C>, author: &str) -> String {
    match board.directory().get(author) {
        Some(account) => format!("{author} ({})", account.role()),
        None => author.to_string(),
    }
}

fn summary<C: Clock>(board: &Board<C>, post: &Post) -> String {
    format!(
        "#{} [{}] {}\n    by {} on {} | {}",
        post.id,
        post.topic,
        post.title,
        author_label(board, &post.author),
        post.date,
        post.reply_summary()
    )
}

fn list<C: Clock>(board: &Board<C>) -> Result<String, BoardError> {
    let posts = board.visible_posts()?;
    if posts.is_empty() {
        return Ok("No posts available in this topic. Be the first to create a post!".to_string());
    }
    Ok(posts
        .iter()
        .map(|post| summary(board, post))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn show<C: Clock>(board: &Board<C>, args: &str) -> Result<String, BoardError> {
    let post_id: PostId = args.parse()?;
    let post = board
        .posts(TopicFilter::All)?
        .into_iter()
        .find(|p| p.id == post_id)
        .ok_or(campusboard_core::DomainError::PostNotFound(post_id))?;

    let mut out = summary(board, &post);
    let _ = write!(out, "\n\n{}", post.content);
    for reply in &post.replies {
        let _ = write!(
            out,
            "\n  - {} ({}): {}",
            reply.author, reply.date, reply.content
        );
    }
    Ok(out)
}

fn post<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    let parts: Vec<&str> = args.splitn(3, '|').map(str::trim).collect();
    let [topic, title, content] = parts.as_slice() else {
        return usage("post <topic> | <title> | <content>");
    };

    let post = board.create_post(NewPost::new(topic.parse()?, *title, *content))?;
    Ok(format!("Created post #{}.", post.id))
}

fn reply<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    let Some((id, text)) = args.split_once(char::is_whitespace) else {
        return usage("reply <post id> <text>");
    };

    let post = board.reply(id.parse()?, text)?;
    Ok(format!("Replied to #{} ({}).", post.id, post.reply_summary()))
}

fn delete<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    let removed = board.delete_post(args.parse()?)?;
    Ok(format!("Deleted post #{} \"{}\".", removed.id, removed.title))
}

fn accounts<C: Clock>(board: &Board<C>) -> Result<String, BoardError> {
    Ok(board
        .accounts()?
        .iter()
        .map(|a| format!("{:<14} {:<14} {}", a.username(), a.role(), a.status_label()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn toggle<C: Clock>(board: &mut Board<C>, args: &str) -> Result<String, BoardError> {
    if args.is_empty() {
        return usage("toggle <username>");
    }
    let account = board.toggle_account(args)?;
    Ok(format!("{} is now {}.", account.username(), account.status_label()))
}

fn dump<C: Clock>(board: &Board<C>) -> Result<String, BoardError> {
    let posts = board.visible_posts()?;
    Ok(serde_json::to_string_pretty(&posts).unwrap_or_else(|err| format!("dump failed: {err}")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{BoardConfig, FixedClock};

    fn board() -> Board<FixedClock> {
        Board::with_clock(
            BoardConfig::default(),
            FixedClock::new(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
        )
    }

    fn reply_text(board: &mut Board<FixedClock>, line: &str) -> String {
        match execute(board, line) {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("unexpected quit for '{line}'"),
        }
    }

    #[test]
    fn login_errors_use_form_messages() {
        let mut board = board();
        assert_eq!(
            reply_text(&mut board, "login disabled_user test123 Student"),
            "This account has been disabled. Please contact an administrator."
        );
        assert_eq!(
            reply_text(&mut board, "login student1 student123 Faculty"),
            "Invalid username, password, or role"
        );
        assert_eq!(
            reply_text(&mut board, "login student1"),
            "usage: login <username> <password> <role>"
        );

        reply_text(&mut board, "login student1 student123 Student");
        assert_eq!(
            reply_text(&mut board, "login admin admin123 Administrator"),
            "You are already signed in. Please sign out first."
        );
        assert_eq!(reply_text(&mut board, "whoami"), "student1 (Student)");
    }

    #[test]
    fn post_list_and_show() {
        let mut board = board();
        reply_text(&mut board, "login student1 student123 Student");

        assert_eq!(
            reply_text(&mut board, "post Health and Wellness | Yoga | Mondays at 7"),
            "Created post #3."
        );
        assert_eq!(
            reply_text(&mut board, "reply 3 See you there"),
            "Replied to #3 (1 Reply)."
        );

        reply_text(&mut board, "topic Health and Wellness");
        let listing = reply_text(&mut board, "list");
        assert!(listing.starts_with("#3 [Health and Wellness] Yoga"));
        assert!(listing.contains("by student1 (Student) on 2025-03-10"));
        assert!(!listing.contains("Basketball"));

        let shown = reply_text(&mut board, "show 3");
        assert!(shown.contains("Mondays at 7"));
        assert!(shown.contains("- student1 (2025-03-10): See you there"));
    }

    #[test]
    fn author_role_comes_from_directory() {
        let mut board = board();
        reply_text(&mut board, "login faculty1 faculty123 Faculty");
        let listing = reply_text(&mut board, "list");
        assert!(listing.contains("by admin (Administrator)"));
        assert!(listing.contains("by faculty1 (Faculty)"));
    }

    #[test]
    fn empty_topic_message() {
        let mut board = board();
        reply_text(&mut board, "login faculty1 faculty123 Faculty");
        reply_text(&mut board, "topic Travel");
        assert_eq!(
            reply_text(&mut board, "list"),
            "No posts available in this topic. Be the first to create a post!"
        );
    }

    #[test]
    fn privileged_commands_are_policed() {
        let mut board = board();
        reply_text(&mut board, "login staff1 staff123 Staff");
        assert_eq!(
            reply_text(&mut board, "delete 1"),
            "You do not have permission to do that."
        );
        assert_eq!(
            reply_text(&mut board, "accounts"),
            "You do not have permission to do that."
        );

        reply_text(&mut board, "logout");
        reply_text(&mut board, "login admin admin123 Administrator");
        assert_eq!(
            reply_text(&mut board, "toggle staff1"),
            "staff1 is now Disabled."
        );
        assert_eq!(
            reply_text(&mut board, "toggle admin"),
            "The account 'admin' cannot be disabled."
        );
        let accounts = reply_text(&mut board, "accounts");
        assert!(accounts.contains("staff1         Staff          Disabled"));
        assert_eq!(
            reply_text(&mut board, "delete 1"),
            "Deleted post #1 \"Library Extended Hours\"."
        );
    }

    #[test]
    fn dump_is_json() {
        let mut board = board();
        reply_text(&mut board, "login student1 student123 Student");
        let dump = reply_text(&mut board, "dump");
        let json: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(json[0]["topic"], "Academic Resources");
        assert_eq!(json[1]["date"], "2025-03-08");
    }

    #[test]
    fn run_stops_at_quit() {
        let mut board = board();
        let input = b"login student1 student123 Student\nquit\nwhoami\n";
        let mut output = Vec::new();
        run(&mut board, &input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Welcome, student1 (Student)."));
        assert!(!text.contains("Not logged in."));
    }

    #[test]
    fn unknown_command() {
        let mut board = board();
        assert_eq!(
            reply_text(&mut board, "frobnicate"),
            "Unknown command 'frobnicate'. Type 'help'."
        );
        assert_eq!(execute(&mut board, "exit"), Outcome::Quit);
    }
}
