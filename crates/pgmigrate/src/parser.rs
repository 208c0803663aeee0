//! Migration file parser.
//!
//! A migration file is plain SQL annotated with marker comments:
//!
//! ```sql
//! -- +migrate Up
//! CREATE TABLE snippets (id SERIAL PRIMARY KEY);
//!
//! -- +migrate StatementBegin
//! CREATE FUNCTION touch() RETURNS trigger AS $$
//! BEGIN
//!     NEW.updated_at = NOW();
//!     RETURN NEW;
//! END;
//! $$ LANGUAGE plpgsql;
//! -- +migrate StatementEnd
//!
//! -- +migrate Down
//! DROP FUNCTION touch();
//! DROP TABLE snippets;
//! ```
//!
//! Statements end at a line whose last word ends with `;`. Everything
//! between `StatementBegin` and `StatementEnd` is a single statement.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;

/// Prefix shared by all parser commands.
pub const COMMAND_PREFIX: &str = "-- +migrate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Up,
    Down,
}

#[derive(Default)]
struct Statements {
    up: Vec<String>,
    down: Vec<String>,
    buf: String,
}

impl Statements {
    fn push_line(&mut self, line: &str) {
        if self.buf.is_empty() && line.trim().is_empty() {
            return;
        }
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    fn has_pending(&self) -> bool {
        !self.buf.trim().is_empty()
    }

    fn flush(&mut self, block: Block) {
        let statement = self.buf.trim().to_string();
        self.buf.clear();
        if statement.is_empty() {
            return;
        }
        match block {
            Block::Up => self.up.push(statement),
            Block::Down => self.down.push(statement),
        }
    }
}

/// Parse the content of migration `id` into its Up and Down statements.
pub fn parse_migration(id: &str, content: &str) -> MigrateResult<Migration> {
    let mut block: Option<Block> = None;
    let mut seen_up = false;
    let mut in_statement = false;
    let mut statements = Statements::default();

    for (index, line) in content.lines().enumerate() {
        let lineno = index + 1;
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(COMMAND_PREFIX) {
            let mut words = rest.split_whitespace();
            let command = words.next().unwrap_or_default();
            let options: Vec<&str> = words.collect();

            match command {
                "Up" | "Down" => {
                    if in_statement {
                        return Err(MigrateError::parse(
                            id,
                            format!("line {lineno}: {command} marker inside a StatementBegin block"),
                        ));
                    }
                    if statements.has_pending() {
                        return Err(unterminated(id, lineno));
                    }
                    if let Some(option) = options.first() {
                        return Err(MigrateError::parse(
                            id,
                            format!("line {lineno}: unsupported option {option:?}"),
                        ));
                    }
                    if command == "Up" {
                        seen_up = true;
                        block = Some(Block::Up);
                    } else {
                        block = Some(Block::Down);
                    }
                }
                "StatementBegin" => {
                    if block.is_some() {
                        if statements.has_pending() {
                            return Err(unterminated(id, lineno));
                        }
                        in_statement = true;
                    }
                }
                "StatementEnd" => {
                    if let Some(current) = block {
                        if !in_statement {
                            return Err(MigrateError::parse(
                                id,
                                format!("line {lineno}: StatementEnd without StatementBegin"),
                            ));
                        }
                        in_statement = false;
                        statements.flush(current);
                    }
                }
                "" => {
                    return Err(MigrateError::parse(
                        id,
                        format!("line {lineno}: missing command after {COMMAND_PREFIX:?}"),
                    ));
                }
                other => {
                    return Err(MigrateError::parse(
                        id,
                        format!("line {lineno}: unknown command {other:?}"),
                    ));
                }
            }
            continue;
        }

        // Text before the first marker is ignored.
        let Some(current) = block else {
            continue;
        };

        if !in_statement && trimmed.starts_with("--") {
            continue;
        }

        statements.push_line(line);

        if !in_statement && ends_with_semicolon(line) {
            statements.flush(current);
        }
    }

    if in_statement {
        return Err(MigrateError::parse(
            id,
            "saw '-- +migrate StatementBegin' with no matching '-- +migrate StatementEnd'",
        ));
    }
    if !seen_up {
        return Err(MigrateError::parse(
            id,
            "no '-- +migrate Up' marker found, the file has no forward block",
        ));
    }
    if statements.has_pending() {
        return Err(unterminated(id, content.lines().count()));
    }

    Ok(Migration::new(id, statements.up, statements.down))
}

fn unterminated(id: &str, lineno: usize) -> MigrateError {
    MigrateError::parse(
        id,
        format!("line {lineno}: statement is not terminated by ';'"),
    )
}

/// True when the last word before any trailing `--` comment ends with `;`.
fn ends_with_semicolon(line: &str) -> bool {
    line.split_whitespace()
        .take_while(|word| !word.starts_with("--"))
        .last()
        .is_some_and(|word| word.ends_with(';'))
}
