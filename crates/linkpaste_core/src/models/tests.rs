//! Model-level unit tests.

use super::paste::*;
use chrono::{Duration, TimeZone, Utc};

fn sample_paste() -> Paste {
    Paste {
        slug: "abcDEF12".to_string(),
        secret_token: "t".repeat(32),
        title: Some("notes".to_string()),
        content: "hello".to_string(),
        language: "plaintext".to_string(),
        privacy: Privacy::Unlisted,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        expires_at: None,
        views: 0,
    }
}

#[test]
fn expiration_specs_resolve_relative_to_now() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let cases = [
        ("1h", Some(now + Duration::hours(1))),
        ("1d", Some(now + Duration::days(1))),
        ("1w", Some(now + Duration::days(7))),
        ("never", None),
    ];
    for (raw, expected) in cases {
        let spec: ExpirationSpec = raw.parse().expect("known spec");
        assert_eq!(spec.resolve(now), expected, "spec {}", raw);
    }
    assert!("2h".parse::<ExpirationSpec>().is_err());
}

#[test]
fn privacy_parses_case_insensitively_and_round_trips_as_lowercase_json() {
    assert_eq!("PRIVATE".parse::<Privacy>(), Ok(Privacy::Private));
    assert_eq!(" public ".parse::<Privacy>(), Ok(Privacy::Public));
    assert!("secret".parse::<Privacy>().is_err());
    assert_eq!(
        serde_json::to_value(Privacy::Unlisted).expect("serialize"),
        serde_json::json!("unlisted")
    );
}

#[test]
fn paste_expires_at_boundary() {
    let mut paste = sample_paste();
    let expires_at = paste.created_at + Duration::hours(1);
    paste.expires_at = Some(expires_at);

    assert!(!paste.is_expired(expires_at - Duration::seconds(1)));
    assert!(!paste.is_expired(expires_at));
    assert!(paste.is_expired(expires_at + Duration::nanoseconds(1)));
    paste.expires_at = None;
    assert!(!paste.is_expired(expires_at + Duration::weeks(52)));
}

#[test]
fn view_uses_camel_case_and_omits_token() {
    let paste = sample_paste();
    let json = serde_json::to_value(PasteView::from(&paste)).expect("serialize");
    let object = json.as_object().expect("object");
    for key in [
        "slug",
        "title",
        "content",
        "language",
        "privacy",
        "createdAt",
        "expiresAt",
        "views",
    ] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(object.len(), 8);
    assert!(!json.to_string().contains(&paste.secret_token));
}

#[test]
fn patch_touches_only_supplied_fields() {
    let mut paste = sample_paste();
    let before = paste.clone();
    PastePatch {
        title: Some(None),
        privacy: Some(Privacy::Private),
        ..PastePatch::default()
    }
    .apply_to(&mut paste);

    assert_eq!(paste.title, None);
    assert_eq!(paste.privacy, Privacy::Private);
    assert_eq!(paste.content, before.content);
    assert_eq!(paste.language, before.language);
    assert_eq!(paste.slug, before.slug);
    assert_eq!(paste.secret_token, before.secret_token);
}

#[test]
fn create_request_tolerates_missing_content() {
    let request: CreatePasteRequest =
        serde_json::from_value(serde_json::json!({ "title": "x" })).expect("deserialize");
    assert!(request.content.is_empty());
}
