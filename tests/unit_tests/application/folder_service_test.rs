use std::sync::Arc;

use tunefold::application::ports::FolderRepository;
use tunefold::application::services::{FolderSearch, FolderService, FolderServiceError};
use tunefold::domain::{FolderSort, LikeToggle, PageRequest};

use super::fixtures::{Harness, Vanish, VanishingParentStore, mp3_upload, user};

fn racing_service(harness: &Harness, vanish: Vanish) -> FolderService {
    let folders = Arc::new(VanishingParentStore {
        inner: harness.store.clone(),
        vanish,
    });
    FolderService::new(folders, harness.store.clone())
}

#[tokio::test]
async fn given_existing_name_when_creating_then_conflict() {
    let harness = Harness::new(42.0);
    harness.folder_service.create(&user("alice"), "Favorites").await.unwrap();

    let result = harness.folder_service.create(&user("bob"), "Favorites").await;

    assert!(matches!(result, Err(FolderServiceError::Conflict(_))));
}

#[tokio::test]
async fn given_names_differing_in_case_when_creating_then_both_succeed() {
    let harness = Harness::new(42.0);

    harness.folder_service.create(&user("alice"), "Chill").await.unwrap();
    let second = harness.folder_service.create(&user("alice"), "chill").await;

    assert!(second.is_ok());
}

#[tokio::test]
async fn given_blank_or_long_name_when_creating_then_validation_error() {
    let harness = Harness::new(42.0);
    let alice = user("alice");

    let blank = harness.folder_service.create(&alice, "   ").await;
    let long = harness.folder_service.create(&alice, &"n".repeat(76)).await;
    let at_limit = harness.folder_service.create(&alice, &"n".repeat(75)).await;

    assert!(matches!(blank, Err(FolderServiceError::Validation(_))));
    assert!(matches!(long, Err(FolderServiceError::Validation(_))));
    assert!(at_limit.is_ok());
}

#[tokio::test]
async fn given_non_owner_when_renaming_then_forbidden() {
    let harness = Harness::new(42.0);
    let folder = harness.folder_service.create(&user("alice"), "Mine").await.unwrap();

    let result = harness
        .folder_service
        .rename(&user("bob"), &folder.id.to_string(), "Stolen")
        .await;

    assert!(matches!(result, Err(FolderServiceError::Forbidden(_))));
}

#[tokio::test]
async fn given_taken_name_when_renaming_then_conflict() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    harness.folder_service.create(&alice, "First").await.unwrap();
    let second = harness.folder_service.create(&alice, "Second").await.unwrap();

    let result = harness
        .folder_service
        .rename(&alice, &second.id.to_string(), "First")
        .await;

    assert!(matches!(result, Err(FolderServiceError::Conflict(_))));
}

#[tokio::test]
async fn given_owner_when_renaming_to_same_name_then_succeeds() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Same").await.unwrap();

    harness
        .folder_service
        .rename(&alice, &folder.id.to_string(), "Same")
        .await
        .unwrap();
    harness
        .folder_service
        .rename(&alice, &folder.id.to_string(), "Renamed")
        .await
        .unwrap();

    let detail = harness
        .folder_service
        .get(&folder.id.to_string(), None)
        .await
        .unwrap();
    assert_eq!(detail.folder.name, "Renamed");
}

#[tokio::test]
async fn given_missing_audio_when_adding_then_not_found() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();

    let result = harness
        .folder_service
        .add_audio(
            &alice,
            &folder.id.to_string(),
            "00000000-0000-0000-0000-000000000000",
        )
        .await;

    assert!(matches!(result, Err(FolderServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_audio_already_in_folder_when_adding_again_then_conflict() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("a.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let (folder_id, audio_id) = (folder.id.to_string(), audio.id.to_string());

    harness
        .folder_service
        .add_audio(&alice, &folder_id, &audio_id)
        .await
        .unwrap();
    let again = harness
        .folder_service
        .add_audio(&alice, &folder_id, &audio_id)
        .await;

    assert!(matches!(again, Err(FolderServiceError::Conflict(_))));
}

#[tokio::test]
async fn given_audio_of_another_user_when_adding_to_own_folder_then_succeeds() {
    let harness = Harness::new(42.0);
    let audio = harness
        .audio_service
        .upload_by_file(&user("bob"), mp3_upload("b.mp3", "Bob's", "Default"))
        .await
        .unwrap();
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();

    let result = harness
        .folder_service
        .add_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_non_owner_when_adding_audio_then_forbidden() {
    let harness = Harness::new(42.0);
    let audio = harness
        .audio_service
        .upload_by_file(&user("bob"), mp3_upload("b.mp3", "Bob's", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&user("alice"), "Mix").await.unwrap();

    let result = harness
        .folder_service
        .add_audio(&user("bob"), &folder.id.to_string(), &audio.id.to_string())
        .await;

    assert!(matches!(result, Err(FolderServiceError::Forbidden(_))));
}

#[tokio::test]
async fn given_pair_not_in_folder_when_removing_then_not_found() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("a.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();

    let result = harness
        .folder_service
        .remove_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await;

    assert!(matches!(result, Err(FolderServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_added_audio_when_removing_then_folder_is_empty() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("a.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let (folder_id, audio_id) = (folder.id.to_string(), audio.id.to_string());
    harness
        .folder_service
        .add_audio(&alice, &folder_id, &audio_id)
        .await
        .unwrap();

    harness
        .folder_service
        .remove_audio(&alice, &folder_id, &audio_id)
        .await
        .unwrap();

    let detail = harness.folder_service.get(&folder_id, None).await.unwrap();
    assert!(detail.audio.is_empty());
}

#[tokio::test]
async fn given_several_audio_when_getting_folder_then_listed_in_membership_order() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let folder_id = folder.id.to_string();
    let mut uploaded = Vec::new();
    for name in ["first", "second", "third"] {
        let audio = harness
            .audio_service
            .upload_by_file(&alice, mp3_upload("a.mp3", name, "Default"))
            .await
            .unwrap();
        uploaded.push(audio.id);
    }
    for id in uploaded.iter().rev() {
        harness
            .folder_service
            .add_audio(&alice, &folder_id, &id.to_string())
            .await
            .unwrap();
    }

    let detail = harness.folder_service.get(&folder_id, None).await.unwrap();

    let titles: Vec<_> = detail.audio.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(detail.like_status, None);
}

#[tokio::test]
async fn given_like_then_unlike_when_toggling_then_count_is_restored() {
    let harness = Harness::new(42.0);
    let folder = harness.folder_service.create(&user("alice"), "Mix").await.unwrap();
    let folder_id = folder.id.to_string();
    let bob = user("bob");

    let first = harness.folder_service.toggle_like(&bob, &folder_id).await.unwrap();
    let liked = harness.folder_service.get(&folder_id, Some(&bob)).await.unwrap();
    let second = harness.folder_service.toggle_like(&bob, &folder_id).await.unwrap();
    let unliked = harness.folder_service.get(&folder_id, Some(&bob)).await.unwrap();

    assert_eq!(first, LikeToggle::Liked);
    assert_eq!(first.as_str(), "liked");
    assert_eq!(liked.folder.like_count, 1);
    assert_eq!(liked.like_status, Some(true));
    assert_eq!(second, LikeToggle::Unliked);
    assert_eq!(second.as_str(), "unliked");
    assert_eq!(unliked.folder.like_count, 0);
    assert_eq!(unliked.like_status, Some(false));
}

#[tokio::test]
async fn given_missing_folder_when_liking_then_not_found() {
    let harness = Harness::new(42.0);

    let unknown = harness
        .folder_service
        .toggle_like(&user("bob"), "00000000-0000-0000-0000-000000000000")
        .await;
    let malformed = harness.folder_service.toggle_like(&user("bob"), "nope").await;

    assert!(matches!(unknown, Err(FolderServiceError::NotFound(_))));
    assert!(matches!(malformed, Err(FolderServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_folder_deleted_during_like_when_toggling_then_not_found() {
    let harness = Harness::new(42.0);
    let folder = harness.folder_service.create(&user("alice"), "Mix").await.unwrap();
    let service = racing_service(&harness, Vanish::Folder);

    let result = service.toggle_like(&user("bob"), &folder.id.to_string()).await;

    assert!(matches!(
        result,
        Err(FolderServiceError::NotFound(ref msg)) if msg == "folder does not exist"
    ));
}

#[tokio::test]
async fn given_audio_deleted_during_add_when_adding_then_reports_missing_audio() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let service = racing_service(&harness, Vanish::Audio);

    let result = service
        .add_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await;

    assert!(matches!(
        result,
        Err(FolderServiceError::NotFound(ref msg)) if msg == "audio does not exist"
    ));
}

#[tokio::test]
async fn given_folder_deleted_during_add_when_adding_then_reports_missing_folder() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("song.mp3", "Song", "Default"))
        .await
        .unwrap();
    let service = racing_service(&harness, Vanish::Folder);

    let result = service
        .add_audio(&alice, &folder.id.to_string(), &audio.id.to_string())
        .await;

    assert!(matches!(
        result,
        Err(FolderServiceError::NotFound(ref msg)) if msg == "folder does not exist"
    ));
}

#[tokio::test]
async fn given_two_likers_when_searching_then_like_status_follows_requester() {
    let harness = Harness::new(42.0);
    let (u1, u2) = (user("u1"), user("u2"));
    let favorites = harness.folder_service.create(&u1, "Favorites").await.unwrap();
    harness.folder_service.create(&u2, "Other").await.unwrap();
    harness
        .folder_service
        .toggle_like(&u1, &favorites.id.to_string())
        .await
        .unwrap();
    harness
        .folder_service
        .toggle_like(&u2, &favorites.id.to_string())
        .await
        .unwrap();

    let search = FolderSearch {
        sort: FolderSort::LikeDesc,
        ..FolderSearch::default()
    };
    let as_u1 = harness
        .folder_service
        .search(search.clone(), Some(&u1))
        .await
        .unwrap();
    let anonymous = harness.folder_service.search(search, None).await.unwrap();

    assert_eq!(as_u1.count, 2);
    assert_eq!(as_u1.items[0].folder.name, "Favorites");
    assert_eq!(as_u1.items[0].folder.like_count, 2);
    assert_eq!(as_u1.items[0].like_status, Some(true));
    assert_eq!(as_u1.items[1].like_status, Some(false));
    assert!(anonymous.items.iter().all(|s| s.like_status.is_none()));
}

#[tokio::test]
async fn given_keyword_and_creator_when_searching_then_both_filters_apply() {
    let harness = Harness::new(42.0);
    let (alice, bob) = (user("alice"), user("bob"));
    harness.folder_service.create(&alice, "Road Trip").await.unwrap();
    harness.folder_service.create(&alice, "Study").await.unwrap();
    harness.folder_service.create(&bob, "road rage").await.unwrap();

    let page = harness
        .folder_service
        .search(
            FolderSearch {
                keyword: Some("road".to_string()),
                creator: Some("alice".to_string()),
                ..FolderSearch::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].folder.name, "Road Trip");
}

#[tokio::test]
async fn given_blank_filters_when_searching_then_they_are_ignored() {
    let harness = Harness::new(42.0);
    harness.folder_service.create(&user("alice"), "One").await.unwrap();
    harness.folder_service.create(&user("bob"), "Two").await.unwrap();

    let page = harness
        .folder_service
        .search(
            FolderSearch {
                keyword: Some("  ".to_string()),
                creator: Some(String::new()),
                page: PageRequest::new(0),
                sort: FolderSort::DateLatest,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn given_liked_folders_when_listing_liked_then_annotated_true() {
    let harness = Harness::new(42.0);
    let bob = user("bob");
    let a = harness.folder_service.create(&user("alice"), "A").await.unwrap();
    let b = harness.folder_service.create(&user("alice"), "B").await.unwrap();
    harness.folder_service.create(&user("alice"), "C").await.unwrap();
    harness.folder_service.toggle_like(&bob, &a.id.to_string()).await.unwrap();
    harness.folder_service.toggle_like(&bob, &b.id.to_string()).await.unwrap();

    let liked = harness
        .folder_service
        .liked_by(&bob, PageRequest::first())
        .await
        .unwrap();

    assert_eq!(liked.count, 2);
    let names: Vec<_> = liked.items.iter().map(|s| s.folder.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert!(liked.items.iter().all(|s| s.like_status == Some(true)));
}

#[tokio::test]
async fn given_non_owner_when_deleting_folder_then_forbidden() {
    let harness = Harness::new(42.0);
    let folder = harness.folder_service.create(&user("alice"), "Mine").await.unwrap();

    let result = harness
        .folder_service
        .delete(&user("bob"), &folder.id.to_string())
        .await;

    assert!(matches!(result, Err(FolderServiceError::Forbidden(_))));
}

#[tokio::test]
async fn given_owner_when_deleting_folder_then_likes_and_memberships_go_with_it() {
    let harness = Harness::new(42.0);
    let alice = user("alice");
    let audio = harness
        .audio_service
        .upload_by_file(&alice, mp3_upload("a.mp3", "Song", "Default"))
        .await
        .unwrap();
    let folder = harness.folder_service.create(&alice, "Mix").await.unwrap();
    let folder_id = folder.id.to_string();
    harness
        .folder_service
        .add_audio(&alice, &folder_id, &audio.id.to_string())
        .await
        .unwrap();
    harness.folder_service.toggle_like(&user("bob"), &folder_id).await.unwrap();

    harness.folder_service.delete(&alice, &folder_id).await.unwrap();

    let gone = harness.folder_service.get(&folder_id, None).await;
    assert!(matches!(gone, Err(FolderServiceError::NotFound(_))));
    assert!(harness.store.membership(folder.id).await.unwrap().is_empty());
    let liked = harness
        .folder_service
        .liked_by(&user("bob"), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(liked.count, 0);
    let recreated = harness.folder_service.create(&alice, "Mix").await;
    assert!(recreated.is_ok());
}
