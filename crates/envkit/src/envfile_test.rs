// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

const TEMPLATE: &str = "\
# Server
SERVER_HOST=localhost
SERVER_PORT=8000

# Security
SECRET_KEY=changethis
";

#[rstest]
fn test_parse_and_render_preserves_bytes() {
    let file = EnvFile::parse(TEMPLATE);
    assert_eq!(file.render(), TEMPLATE);

    let no_newline = "A=1\n# trailing comment";
    assert_eq!(EnvFile::parse(no_newline).render(), no_newline);
}

#[rstest]
fn test_get_ignores_comments_and_indented_lines() {
    let file = EnvFile::parse("#SECRET_KEY=commented\n  SECRET_KEY=indented\nexport X=1\n");
    assert_eq!(file.get("SECRET_KEY"), None);
    assert_eq!(file.get("X"), None);
    assert_eq!(file.iter().count(), 0);
}

#[rstest]
fn test_set_var_replaces_in_place() {
    let mut file = EnvFile::parse(TEMPLATE);
    file.set_var("SERVER_PORT", "9000").unwrap();

    let expected = TEMPLATE.replace("SERVER_PORT=8000", "SERVER_PORT=9000");
    assert_eq!(file.render(), expected);
}

#[rstest]
fn test_set_var_appends_missing_key() {
    let mut file = EnvFile::parse(TEMPLATE);
    file.set_var("ENVIRONMENT", "production").unwrap();

    assert_eq!(file.render(), format!("{TEMPLATE}ENVIRONMENT=production\n"));
}

#[rstest]
fn test_set_var_is_idempotent() {
    let mut file = EnvFile::parse(TEMPLATE);
    file.set_var("ENVIRONMENT", "dev").unwrap();
    let once = file.render();
    file.set_var("ENVIRONMENT", "dev").unwrap();
    assert_eq!(file.render(), once);
}

#[rstest]
fn test_later_value_wins_with_single_line() {
    let mut file = EnvFile::parse(TEMPLATE);
    file.set_var("SECRET_KEY", "first").unwrap();
    file.set_var("SECRET_KEY", "second").unwrap();

    let lines: Vec<_> = file.iter().filter(|(k, _)| *k == "SECRET_KEY").collect();
    assert_eq!(lines, vec![("SECRET_KEY", "second")]);
}

#[rstest]
fn test_set_var_collapses_duplicates() {
    let mut file = EnvFile::parse("A=1\n# note\nA=2\nB=3\nA=4\n");
    file.set_var("A", "5").unwrap();
    assert_eq!(file.render(), "A=5\n# note\nB=3\n");
}

#[rstest]
fn test_append_to_file_without_trailing_newline() {
    let mut file = EnvFile::parse("A=1");
    file.set_var("A", "2").unwrap();
    assert_eq!(file.render(), "A=2");

    file.set_var("B", "3").unwrap();
    assert_eq!(file.render(), "A=2\nB=3\n");
}

#[rstest]
fn test_crlf_values_have_no_carriage_return() {
    let file = EnvFile::parse("ENVIRONMENT=production\r\n# note\r\nSERVER_PORT=9000\r\n");
    assert!(file.is_crlf());
    assert_eq!(file.get("ENVIRONMENT"), Some("production"));
    assert_eq!(file.get("SERVER_PORT"), Some("9000"));
    assert_eq!(
        file.iter().collect::<Vec<_>>(),
        vec![("ENVIRONMENT", "production"), ("SERVER_PORT", "9000")]
    );
}

#[rstest]
fn test_crlf_file_renders_byte_identical() {
    let text = "# Server\r\nSERVER_HOST=localhost\r\n\r\nSECRET_KEY=changethis\r\n";
    assert_eq!(EnvFile::parse(text).render(), text);
}

#[rstest]
fn test_set_var_keeps_crlf_line_endings() {
    let mut file = EnvFile::parse("ENVIRONMENT=local\r\nSERVER_PORT=8000\r\n");
    file.set_var("ENVIRONMENT", "staging").unwrap();
    file.set_var("SERVER_HOST", "0.0.0.0").unwrap();
    assert_eq!(
        file.render(),
        "ENVIRONMENT=staging\r\nSERVER_PORT=8000\r\nSERVER_HOST=0.0.0.0\r\n"
    );

    let once = file.render();
    file.set_var("SERVER_HOST", "0.0.0.0").unwrap();
    assert_eq!(file.render(), once);
}

#[rstest]
fn test_lf_file_is_not_crlf() {
    let file = EnvFile::parse(TEMPLATE);
    assert!(!file.is_crlf());
}

#[rstest]
fn test_append_to_empty_file() {
    let mut file = EnvFile::new();
    file.set_var("A", "1").unwrap();
    assert_eq!(file.render(), "A=1\n");
}

#[rstest]
#[case("")]
#[case("BAD KEY")]
#[case("A=B")]
#[case("#A")]
fn test_set_var_rejects_invalid_keys(#[case] key: &str) {
    let mut file = EnvFile::new();
    assert!(file.set_var(key, "value").is_err());
    assert_eq!(file.render(), "");
}

#[rstest]
fn test_set_var_rejects_multiline_values() {
    let mut file = EnvFile::new();
    let err = file.set_var("A", "one\ntwo").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
}

#[rstest]
fn test_value_keeps_everything_after_first_equals() {
    let file = EnvFile::parse("DATABASE_URL=postgres://u:p@h/db?x=y\n");
    assert_eq!(file.get("DATABASE_URL"), Some("postgres://u:p@h/db?x=y"));
}

#[rstest]
fn test_upsert_on_disk_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(".env");
    std::fs::write(&path, TEMPLATE).unwrap();

    upsert(&path, "SERVER_HOST", "0.0.0.0").unwrap();
    let once = std::fs::read(&path).unwrap();
    upsert(&path, "SERVER_HOST", "0.0.0.0").unwrap();
    let twice = std::fs::read(&path).unwrap();

    assert_eq!(once, twice);
    assert!(String::from_utf8(twice).unwrap().contains("SERVER_HOST=0.0.0.0\n"));
}

#[rstest]
fn test_load_missing_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing.env");
    match EnvFile::load(&path) {
        Err(Error::ReadFailed { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ReadFailed, got {other:?}"),
    }
}

#[rstest]
#[case("\"https://localhost:3000\"", "https://localhost:3000")]
#[case("'single'", "single")]
#[case("\"", "\"")]
#[case("\"mismatched'", "\"mismatched'")]
#[case("plain", "plain")]
fn test_unquote(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(unquote(raw), expected);
}
