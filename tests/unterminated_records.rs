//! Tests for a final record that has no terminating newline.
//!
//! By default the fragment is dropped; with `keep_unterminated` it is
//! parsed like any other record.
//!
//! Note: Tests are run serially to avoid global config race conditions.

use linkroute::commands::{Outcome, QueryCommand};
use linkroute::config;
use linkroute::{parse_relations, Relation, RouteError};
use serial_test::serial;

/// Reset config to default state before each test
fn reset_config() {
    config::set_keep_unterminated(false);
}

// =============================================================================
// Default: drop the fragment
// =============================================================================

#[test]
#[serial]
fn test_fragment_dropped_by_default() {
    reset_config();

    let relations = parse_relations("A,B\nC,D").unwrap();
    assert_eq!(relations, vec![Relation::new("A", "B")]);
}

#[test]
#[serial]
fn test_dropped_fragment_is_unknown_to_queries() {
    reset_config();

    let cmd = QueryCommand::new();
    let input = "Sydney,Melbourne\nMelbourne,Perth";

    let (outcome, stats) = cmd.run_reader(input.as_bytes(), "Sydney", "Melbourne").unwrap();
    assert_eq!(outcome, Outcome::RouteExists);
    assert_eq!(stats.relations_read, 1);

    match cmd.run_reader(input.as_bytes(), "Sydney", "Perth") {
        Err(RouteError::EntityNotFound { name }) => assert_eq!(name, "Perth"),
        other => panic!("expected EntityNotFound, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_malformed_fragment_is_ignored_when_dropped() {
    reset_config();

    // The fragment has no delimiter, but it never becomes a record.
    let relations = parse_relations("A,B\nbroken").unwrap();
    assert_eq!(relations.len(), 1);
}

// =============================================================================
// keep_unterminated: parse the fragment
// =============================================================================

#[test]
#[serial]
fn test_fragment_kept_when_enabled() {
    reset_config();
    config::set_keep_unterminated(true);

    let relations = parse_relations("A,B\nC,D").unwrap();
    assert_eq!(relations, vec![Relation::new("A", "B"), Relation::new("C", "D")]);

    reset_config();
}

#[test]
#[serial]
fn test_kept_fragment_joins_groups() {
    reset_config();
    config::set_keep_unterminated(true);

    let (outcome, stats) = QueryCommand::new()
        .run_reader(&b"Sydney,Melbourne\nMelbourne,Perth"[..], "Sydney", "Perth")
        .unwrap();
    assert_eq!(outcome, Outcome::RouteExists);
    assert_eq!(stats.relations_read, 2);

    reset_config();
}

#[test]
#[serial]
fn test_kept_fragment_is_still_validated() {
    reset_config();
    config::set_keep_unterminated(true);

    match parse_relations("A,B\nbroken") {
        Err(RouteError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }

    reset_config();
}

#[test]
#[serial]
fn test_terminated_input_unaffected_by_flag() {
    let content = "A,B\nB,C\n";

    reset_config();
    let strict = parse_relations(content).unwrap();

    config::set_keep_unterminated(true);
    let lenient = parse_relations(content).unwrap();

    reset_config();
    assert_eq!(strict, lenient);
    assert_eq!(strict.len(), 2);
}
