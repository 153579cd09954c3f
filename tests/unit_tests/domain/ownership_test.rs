use tunefold::domain::{AudioFilter, AudioId, AudioRecord, Owned, UserId};

fn record(owner: &str) -> AudioRecord {
    AudioRecord {
        id: AudioId::new(),
        owner_id: UserId::new(owner),
        url: "http://cdn/audio/a.mp3".to_string(),
        title: "a".to_string(),
        filter: AudioFilter::Default,
        view_count: 0,
        duration_seconds: 1.0,
    }
}

#[test]
fn given_record_when_checking_its_owner_then_is_owned() {
    let audio = record("alice@example.com");

    assert!(audio.is_owned_by(&UserId::new("alice@example.com")));
}

#[test]
fn given_record_when_checking_other_user_then_is_not_owned() {
    let audio = record("alice@example.com");

    assert!(!audio.is_owned_by(&UserId::new("bob@example.com")));
    assert!(!audio.is_owned_by(&UserId::new("Alice@example.com")));
}

#[test]
fn given_malformed_id_when_parsing_then_returns_none() {
    assert!(AudioId::parse("not-a-uuid").is_none());
    assert!(AudioId::parse("").is_none());
}

#[test]
fn given_displayed_id_when_parsing_then_returns_same_id() {
    let id = AudioId::new();

    assert_eq!(AudioId::parse(&id.to_string()), Some(id));
}
