//! `campusboard` — interactive shell over an in-memory campus board.

use anyhow::Context;

use campusboard_app::{Board, BoardConfig, shell};

fn main() -> anyhow::Result<()> {
    campusboard_observability::init();

    let config = BoardConfig::from_env().context("invalid board configuration")?;
    tracing::info!(
        seed_posts = config.seed_posts,
        protected = ?config.protected_accounts,
        "starting board"
    );

    let mut board = Board::new(config);
    let stdin = std::io::stdin();
    shell::run(&mut board, stdin.lock(), std::io::stdout().lock())
}
