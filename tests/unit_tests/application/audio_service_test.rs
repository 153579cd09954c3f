use std::sync::Arc;

use tunefold::application::ports::{AudioRepository, FolderRepository};
use tunefold::application::services::{AudioServiceError, LinkUpload};
use tunefold::domain::{AudioFilter, AudioOrder, PageRequest};
use tunefold::infrastructure::transcoding::MOCK_SOURCE_TITLE;

use super::fixtures::{Harness, UnavailableCache, mp3_upload, user};

#[tokio::test]
async fn given_song_mp3_with_default_filter_when_uploading_then_record_is_persisted() {
    let harness = Harness::new(42.0);

    let audio = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("song.mp3", "  My Song  ", "Default"))
        .await
        .unwrap();

    assert_eq!(audio.filter, AudioFilter::Default);
    assert!((audio.duration_seconds - 42.0).abs() < f64::EPSILON);
    assert_eq!(audio.view_count, 0);
    assert_eq!(audio.title, "My Song");
    assert_eq!(harness.object_store.stored_keys().len(), 1);
    assert!(audio.url.ends_with(&harness.object_store.stored_keys()[0]));
}

#[tokio::test]
async fn given_audio_over_ceiling_when_uploading_then_nothing_is_kept() {
    let harness = Harness::new(301.0);

    let result = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("long.mp3", "Long", "NightCore"))
        .await;

    assert!(matches!(
        result,
        Err(AudioServiceError::TooLong { max_seconds: 300 })
    ));
    assert!(harness.object_store.stored_keys().is_empty());
    let listed = harness
        .store
        .list(AudioOrder::Latest, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(listed.count, 0);
}

#[tokio::test]
async fn given_audio_at_ceiling_when_uploading_then_it_is_accepted() {
    let harness = Harness::new(300.0);

    let result = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("edge.mp3", "Edge", "Stereo"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_invalid_upload_fields_when_uploading_then_validation_errors() {
    let harness = Harness::new(42.0);
    let owner = user("alice");
    let cases = [
        mp3_upload("song.mp3", "   ", "Default"),
        mp3_upload("song.wav", "Song", "Default"),
        mp3_upload(".mp3", "Song", "Default"),
        mp3_upload("song.mp3", "Song", "Vaporwave"),
        mp3_upload("song.mp3", &"x".repeat(76), "Default"),
    ];

    for upload in cases {
        let result = harness.audio_service.upload_by_file(&owner, upload).await;
        assert!(
            matches!(result, Err(AudioServiceError::Validation(_))),
            "expected validation error, got {result:?}"
        );
    }
    assert!(harness.object_store.stored_keys().is_empty());
}

#[tokio::test]
async fn given_uppercase_extension_when_uploading_then_it_is_accepted() {
    let harness = Harness::new(42.0);

    let result = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("SONG.MP3", "Song", "noisefilter"))
        .await
        .unwrap();

    assert_eq!(result.filter, AudioFilter::NoiseFilter);
}

#[tokio::test]
async fn given_link_without_name_when_uploading_then_source_title_is_used() {
    let harness = Harness::new(42.0);

    let audio = harness
        .audio_service
        .upload_by_link(
            &user("alice"),
            LinkUpload {
                youtube_link: "https://www.youtube.com/watch?v=abc".to_string(),
                filter: "Stereo".to_string(),
                name: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(audio.title, MOCK_SOURCE_TITLE);
    assert_eq!(audio.filter, AudioFilter::Stereo);
}

#[tokio::test]
async fn given_link_with_name_when_uploading_then_name_wins() {
    let harness = Harness::new(42.0);

    let audio = harness
        .audio_service
        .upload_by_link(
            &user("alice"),
            LinkUpload {
                youtube_link: "https://youtu.be/abc".to_string(),
                filter: "Default".to_string(),
                name: Some("Chosen".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(audio.title, "Chosen");
}

#[tokio::test]
async fn given_non_url_link_when_uploading_then_validation_error() {
    let harness = Harness::new(42.0);

    let result = harness
        .audio_service
        .upload_by_link(
            &user("alice"),
            LinkUpload {
                youtube_link: "not a link".to_string(),
                filter: "Default".to_string(),
                name: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AudioServiceError::Validation(_))));
}

#[tokio::test]
async fn given_same_ip_when_reading_twice_then_view_counts_once() {
    let harness = Harness::new(42.0);
    let audio = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let id = audio.id.to_string();

    let first = harness.audio_service.get_by_id(&id, "10.0.0.1").await.unwrap();
    let second = harness.audio_service.get_by_id(&id, "10.0.0.1").await.unwrap();

    assert_eq!(first.view_count, 1);
    assert_eq!(second.view_count, 1);
}

#[tokio::test]
async fn given_concurrent_reads_from_same_ip_when_counting_views_then_double_count_is_tolerated() {
    let harness = Harness::new(42.0);
    let audio = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let id = audio.id.to_string();

    let (first, second) = tokio::join!(
        harness.audio_service.get_by_id(&id, "10.0.0.1"),
        harness.audio_service.get_by_id(&id, "10.0.0.1"),
    );
    first.unwrap();
    second.unwrap();

    let stored = AudioRepository::find_by_id(harness.store.as_ref(), audio.id)
        .await
        .unwrap()
        .unwrap();
    assert!((1..=2).contains(&stored.view_count));
}

#[tokio::test]
async fn given_different_ips_when_reading_then_each_counts() {
    let harness = Harness::new(42.0);
    let audio = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let id = audio.id.to_string();

    harness.audio_service.get_by_id(&id, "10.0.0.1").await.unwrap();
    let second = harness.audio_service.get_by_id(&id, "10.0.0.2").await.unwrap();

    assert_eq!(second.view_count, 2);
}

#[tokio::test]
async fn given_cache_unavailable_when_reading_then_record_returned_without_counting() {
    let harness = Harness::with_cache(42.0, Arc::new(UnavailableCache));
    let audio = harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();

    let read = harness
        .audio_service
        .get_by_id(&audio.id.to_string(), "10.0.0.1")
        .await
        .unwrap();

    assert_eq!(read.id, audio.id);
    assert_eq!(read.view_count, 0);
}

#[tokio::test]
async fn given_malformed_or_unknown_id_when_reading_then_not_found() {
    let harness = Harness::new(42.0);

    let malformed = harness.audio_service.get_by_id("xyz", "10.0.0.1").await;
    let unknown = harness
        .audio_service
        .get_by_id("00000000-0000-0000-0000-000000000000", "10.0.0.1")
        .await;

    assert!(matches!(malformed, Err(AudioServiceError::NotFound(_))));
    assert!(matches!(unknown, Err(AudioServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_non_owner_when_deleting_then_record_and_memberships_survive() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    harness
        .folder_service
        .add_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await
        .unwrap();

    let result = harness
        .audio_service
        .delete(&user("mallory"), &audio.id.to_string())
        .await;

    assert!(matches!(result, Err(AudioServiceError::Forbidden(_))));
    assert!(
        AudioRepository::find_by_id(harness.store.as_ref(), audio.id)
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(harness.store.membership(folder.id).await.unwrap(), vec![audio.id]);
}

#[tokio::test]
async fn given_owner_when_deleting_then_memberships_are_cascaded() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    harness
        .folder_service
        .add_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await
        .unwrap();

    harness
        .audio_service
        .delete(&alice, &audio.id.to_string())
        .await
        .unwrap();

    assert!(harness.store.membership(folder.id).await.unwrap().is_empty());
    let detail = harness
        .folder_service
        .get(&folder.id.to_string(), None)
        .await
        .unwrap();
    assert!(detail.audio.is_empty());
    assert!(
        FolderRepository::find_by_id(harness.store.as_ref(), folder.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn given_titles_when_searching_then_returns_matches_with_total() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    for name in ["Night Drive", "night swim", "Morning"] {
        harness
            .audio_service
            .upload_by_file(&alice, mp3_upload("a.mp3", name, "Default"))
            .await
            .unwrap();
    }

    let page = harness
        .audio_service
        .search(PageRequest::first(), "NIGHT")
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn given_uploads_by_two_users_when_listing_by_owner_then_only_own_newest_first() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    for name in ["one", "two"] {
        harness
            .audio_service
            .upload_by_file(&alice, mp3_upload("a.mp3", name, "Default"))
            .await
            .unwrap();
    }
    harness
        .audio_service
        .upload_by_file(&user("bob"), mp3_upload("b.mp3", "bob's", "Default"))
        .await
        .unwrap();

    let mine = harness.audio_service.list_by_owner(&alice).await.unwrap();

    let titles: Vec<_> = mine.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["two", "one"]);
}

#[tokio::test]
async fn given_few_records_when_sampling_random_then_returns_all_of_them() {
    let harness = Harness::new(42.0);
    harness
        .audio_service
        .upload_by_file(&user("alice"), mp3_upload("a.mp3", "only", "Default"))
        .await
        .unwrap();

    let sample = harness.audio_service.random().await.unwrap();

    assert_eq!(sample.len(), 1);
}
