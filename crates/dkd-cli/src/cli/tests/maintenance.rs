//! Tests for cursors, reset-cursor, roaming, clean.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_cursors() {
    match parse(&["dkd", "cursors"]) {
        CliCommand::Cursors => {}
        _ => panic!("expected Cursors"),
    }
}

#[test]
fn cli_parse_reset_cursor_url() {
    match parse(&["dkd", "reset-cursor", "https://keys.example/index.txt"]) {
        CliCommand::ResetCursor { index_url, all } => {
            assert_eq!(index_url.as_deref(), Some("https://keys.example/index.txt"));
            assert!(!all);
        }
        _ => panic!("expected ResetCursor"),
    }
}

#[test]
fn cli_parse_reset_cursor_all() {
    match parse(&["dkd", "reset-cursor", "--all"]) {
        CliCommand::ResetCursor { index_url, all } => {
            assert!(index_url.is_none());
            assert!(all);
        }
        _ => panic!("expected ResetCursor --all"),
    }
}

#[test]
fn cli_parse_reset_cursor_needs_target() {
    assert!(Cli::try_parse_from(["dkd", "reset-cursor"]).is_err());
    assert!(Cli::try_parse_from(["dkd", "reset-cursor", "https://k.example/i", "--all"]).is_err());
}

#[test]
fn cli_parse_roaming() {
    match parse(&["dkd", "roaming"]) {
        CliCommand::Roaming { path } => assert!(path.is_none()),
        _ => panic!("expected Roaming"),
    }
    match parse(&["dkd", "roaming", "/etc/dkd/roaming.json"]) {
        CliCommand::Roaming { path } => {
            assert_eq!(path.as_deref(), Some(Path::new("/etc/dkd/roaming.json")))
        }
        _ => panic!("expected Roaming with path"),
    }
}

#[test]
fn cli_parse_clean() {
    match parse(&["dkd", "clean"]) {
        CliCommand::Clean { older_than_hours } => assert_eq!(older_than_hours, 24),
        _ => panic!("expected Clean"),
    }
    match parse(&["dkd", "clean", "--older-than-hours", "2"]) {
        CliCommand::Clean { older_than_hours } => assert_eq!(older_than_hours, 2),
        _ => panic!("expected Clean with --older-than-hours"),
    }
}
