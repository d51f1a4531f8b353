// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

const GOOD_SECRETS: [(&str, &str); 3] = [
    ("SECRET_KEY", "0f3a"),
    ("FIRST_SUPERUSER_PASSWORD", "9b1c"),
    ("POSTGRES_PASSWORD", "77aa"),
];

fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
    EnvSnapshot::from_pairs(GOOD_SECRETS.iter().chain(pairs).copied())
}

fn keys_with(findings: &[Finding], severity: Severity) -> Vec<&str> {
    findings
        .iter()
        .filter(|f| f.severity == severity)
        .map(|f| f.key.as_str())
        .collect()
}

#[rstest]
fn test_clean_settings_have_no_findings() {
    let findings = check(&snapshot(&[
        ("ENVIRONMENT", "production"),
        ("SERVER_PORT", "9000"),
        ("SERVER_PROTOCOL", "http"),
        ("CORS_ORIGINS", "http://localhost:3000"),
    ]));
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
}

#[rstest]
#[case("local", Severity::Warning)]
#[case("remote", Severity::Warning)]
#[case("dev", Severity::Error)]
#[case("staging", Severity::Error)]
#[case("production", Severity::Error)]
fn test_placeholder_secret_severity(#[case] tier: &str, #[case] expected: Severity) {
    let findings = check(&snapshot(&[
        ("ENVIRONMENT", tier),
        ("SECRET_KEY", "changethis"),
    ]));

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].key, "SECRET_KEY");
    assert_eq!(findings[0].severity, expected);
    assert!(findings[0].message.contains("changethis"));
}

#[rstest]
fn test_invalid_tier_is_error_and_checked_strictly() {
    let findings = check(&snapshot(&[
        ("ENVIRONMENT", "prod"),
        ("POSTGRES_PASSWORD", "changethis"),
    ]));
    let errors = keys_with(&findings, Severity::Error);
    assert!(errors.contains(&"ENVIRONMENT"));
    assert!(errors.contains(&"POSTGRES_PASSWORD"));
}

#[rstest]
fn test_every_rule_reports() {
    let findings = check(&EnvSnapshot::from_pairs([
        ("SERVER_PORT", "http"),
        ("CORS_ORIGINS", "nope"),
        ("SSL_CERT_FILE", "certs/cert.pem"),
        ("SERVER_PROTOCOL", "gopher"),
    ]));

    let errors = keys_with(&findings, Severity::Error);
    assert_eq!(
        errors,
        vec!["SERVER_PORT", "CORS_ORIGINS", "SSL_KEY_FILE", "SERVER_PROTOCOL"]
    );
    assert_eq!(
        keys_with(&findings, Severity::Warning),
        vec!["SECRET_KEY", "FIRST_SUPERUSER_PASSWORD", "POSTGRES_PASSWORD"]
    );
}

#[rstest]
#[case(&[("SERVER_PROTOCOL", "https")])]
#[case(&[("SSL_CERT_FILE", "c.pem"), ("SSL_KEY_FILE", "k.pem")])]
fn test_protocol_and_tls_disagree(#[case] pairs: &[(&str, &str)]) {
    let findings = check(&snapshot(pairs));
    assert_eq!(keys_with(&findings, Severity::Warning), vec!["SERVER_PROTOCOL"]);
    assert!(keys_with(&findings, Severity::Error).is_empty());
}

#[rstest]
fn test_errors_sort_before_warnings() {
    let findings = check(&EnvSnapshot::from_pairs([("SERVER_PORT", "0")]));
    assert!(findings.first().is_some_and(Finding::is_error));
    assert!(!findings.last().is_some_and(Finding::is_error));
}
