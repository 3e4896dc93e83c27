//! Tests for the JSON validation machinery.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::{CreatePost, CreateUser, Patch};

/// Minimal schema exercising every reader accessor.
#[derive(Debug, PartialEq)]
struct Probe {
    count: u32,
    label: Option<String>,
    note: Option<String>,
    patch: Patch<bool>,
    flag: bool,
}

impl Schema for Probe {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let count = fields.required("count");
        let label = fields.optional("label");
        let note = fields.nullable("note");
        let patch = fields.patch("patch");
        let flag = fields.defaulted("flag", true);
        Some(Self {
            count: count?,
            label: label?,
            note: note?,
            patch: patch?,
            flag: flag?,
        })
    }
}

fn codes(failure: &ValidationFailure) -> Vec<(String, IssueCode)> {
    failure
        .issues()
        .iter()
        .map(|issue| (issue.path().to_string(), issue.code().clone()))
        .collect()
}

#[rstest]
fn paths_render_keys_and_indices() {
    let path = FieldPath::root().key("posts").index(1).key("title");
    assert_eq!(path.to_string(), "posts[1].title");
    assert_eq!(FieldPath::root().key("author").key("email").to_string(), "author.email");
    assert_eq!(FieldPath::root().to_string(), "<root>");
    assert_eq!(FieldPath::root().index(0).to_string(), "[0]");
}

#[rstest]
fn reader_accessors_apply_their_presence_rules() {
    let probe = Probe::validate(&json!({ "count": 3, "note": null })).expect("valid probe");
    assert_eq!(
        probe,
        Probe {
            count: 3,
            label: None,
            note: None,
            patch: Patch::Absent,
            flag: true,
        }
    );
}

#[rstest]
fn nullable_requires_the_key() {
    let failure = Probe::validate(&json!({ "count": 3 })).expect_err("note missing");
    assert_eq!(codes(&failure), vec![("note".to_owned(), IssueCode::Required)]);
}

#[rstest]
#[case(json!(-1), IssueCode::InvalidType { expected: "non-negative integer", received: "number" })]
#[case(json!(2.5), IssueCode::InvalidType { expected: "non-negative integer", received: "number" })]
#[case(json!("3"), IssueCode::InvalidType { expected: "non-negative integer", received: "string" })]
#[case(json!(5_000_000_000_u64), IssueCode::TooBig { maximum: u64::from(u32::MAX) })]
fn counts_must_be_non_negative_integers(#[case] count: Value, #[case] expected: IssueCode) {
    let failure =
        Probe::validate(&json!({ "count": count, "note": null })).expect_err("bad count");
    assert_eq!(codes(&failure), vec![("count".to_owned(), expected)]);
}

#[rstest]
#[case(json!([]), "array")]
#[case(json!(null), "null")]
#[case(json!("text"), "string")]
fn non_objects_are_rejected_at_the_root(#[case] input: Value, #[case] received: &'static str) {
    let failure = CreateUser::validate(&input).expect_err("not an object");
    assert_eq!(
        codes(&failure),
        vec![(
            "<root>".to_owned(),
            IssueCode::InvalidType {
                expected: "object",
                received
            }
        )]
    );
}

#[rstest]
fn unknown_keys_are_reported_after_declared_members() {
    let failure = CreateUser::validate(&json!({ "name": "A", "extra": 1 }))
        .expect_err("two problems");
    assert_eq!(
        codes(&failure),
        vec![
            ("email".to_owned(), IssueCode::Required),
            ("extra".to_owned(), IssueCode::UnrecognizedKey),
        ]
    );
}

#[rstest]
fn strip_policy_still_reports_real_violations() {
    let failure = CreatePost::validate_with(
        &json!({ "title": "", "authorId": "123e4567-e89b-12d3-a456-426614174000", "x": 1 }),
        UnknownKeys::Strip,
    )
    .expect_err("empty title");
    assert_eq!(
        codes(&failure),
        vec![("title".to_owned(), IssueCode::TooSmall { minimum: 1 })]
    );
}

#[rstest]
fn malformed_json_is_a_root_issue() {
    let failure = CreateUser::validate_json("{ not json").expect_err("malformed");
    let [issue] = failure.issues() else {
        panic!("expected exactly one issue, got {failure:?}");
    };
    assert!(issue.path().is_root());
    assert!(matches!(issue.code(), IssueCode::InvalidJson { .. }));
}

#[rstest]
fn validate_json_accepts_well_formed_text() {
    let input = CreateUser::validate_json(r#"{"email":"a@b.co","name":"A","role":"ADMIN"}"#)
        .expect("valid text");
    assert_eq!(input.role, crate::Role::Admin);
}

#[rstest]
fn failure_display_lists_every_issue() {
    let failure = CreateUser::validate(&json!({ "email": "x", "role": "ROOT" }))
        .expect_err("invalid");
    assert_eq!(
        failure.to_string(),
        "validation failed: email: invalid email; name: required; \
         role: expected one of USER, ADMIN"
    );
}

#[rstest]
fn issue_message_is_human_readable() {
    let issue = FieldIssue::new(
        FieldPath::root().key("name"),
        IssueCode::TooSmall { minimum: 1 },
    );
    assert_eq!(issue.message(), "must be at least 1");
    assert_eq!(issue.to_string(), "name: must be at least 1");
}
