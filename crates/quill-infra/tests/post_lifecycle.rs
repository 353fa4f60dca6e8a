use std::sync::Arc;

use uuid::Uuid;

use quill_core::domain::PostInput;
use quill_core::ports::{Anonymous, AuthError, Caller, PostFilter, PostRepository};
use quill_core::{DomainError, PostService};
use quill_infra::{InMemoryPostRepository, default_pipeline};

fn caller(name: &str) -> Caller {
    Caller {
        id: Uuid::new_v4(),
        email: format!("{name}@example.com"),
        fullname: name.to_string(),
    }
}

fn setup() -> (PostService, Arc<InMemoryPostRepository>) {
    let repo = Arc::new(InMemoryPostRepository::new());
    let service = PostService::new(repo.clone(), default_pipeline());
    (service, repo)
}

fn input(title: &str) -> PostInput {
    PostInput::new(title, "A short description", "Some *markdown* body")
}

#[tokio::test]
async fn create_then_get_by_slug_returns_sanitized_post() {
    let (service, _) = setup();
    let ada = caller("ada");

    let body = "# Hi\n\n<script>alert('x')</script>\n\n[click](javascript:alert(1)) <img src=x onerror=alert(1)>";
    let created = service
        .create_post(&ada, PostInput::new("Hello World!", "desc", body))
        .await
        .unwrap();

    assert_eq!(created.slug, "hello-world");
    assert_eq!(created.user_id, ada.id);
    assert_eq!(created.email, ada.email);
    assert_eq!(created.fullname, ada.fullname);
    assert!(created.likes.is_empty());

    let fetched = service.get_post("hello-world").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.body, body);
    assert!(fetched.sanitized_html.contains("<h1>Hi</h1>"));
    for banned in ["<script", "javascript:", "onerror", "alert("] {
        assert!(
            !fetched.sanitized_html.contains(banned),
            "{banned} survived: {}",
            fetched.sanitized_html
        );
    }
}

#[tokio::test]
async fn duplicate_title_is_a_conflict() {
    let (service, repo) = setup();

    service.create_post(&caller("ada"), input("Same")).await.unwrap();
    let err = service
        .create_post(&caller("bob"), input("Same"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict { field: "title", .. }));
    assert_eq!(repo.find_all(&PostFilter::all()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_input_lists_every_empty_field() {
    let (service, repo) = setup();

    let err = service
        .create_post(&caller("ada"), PostInput::new(" ", "", "body"))
        .await
        .unwrap_err();

    match err {
        DomainError::InvalidInput { errors } => {
            assert!(errors.contains_key("title"));
            assert!(errors.contains_key("desc"));
            assert!(!errors.contains_key("body"));
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert!(repo.find_all(&PostFilter::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn punctuation_only_title_is_rejected() {
    let (service, _) = setup();

    let err = service
        .create_post(&caller("ada"), input("?!?!"))
        .await
        .unwrap_err();

    match err {
        DomainError::InvalidInput { errors } => {
            assert!(errors["title"].contains("letter or digit"));
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthenticated_mutations_fail_before_touching_the_store() {
    let (service, repo) = setup();
    let existing = service
        .create_post(&caller("ada"), input("Existing"))
        .await
        .unwrap();

    let create = service.create_post(&Anonymous, input("Nope")).await;
    let update = service
        .update_post(&Anonymous, existing.id, input("Nope"))
        .await;
    let delete = service.delete_post(&Anonymous, existing.id).await;
    let like = service.like_post(&Anonymous, existing.id).await;

    for result in [create.map(|_| ()), update.map(|_| ()), delete, like.map(|_| ())] {
        assert!(matches!(
            result,
            Err(DomainError::Unauthenticated(AuthError::MissingAuth))
        ));
    }
    let stored = repo.find_by_id(existing.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Existing");
    assert!(stored.likes.is_empty());
}

#[tokio::test]
async fn update_recomputes_derived_fields_and_keeps_owner() {
    let (service, _) = setup();
    let ada = caller("ada");
    let created = service
        .create_post(&ada, input("Hello World!"))
        .await
        .unwrap();

    let updated = service
        .update_post(
            &ada,
            created.id,
            PostInput::new("New Title", "New description", "**bold**"),
        )
        .await
        .unwrap();

    assert_eq!(updated.slug, "new-title");
    assert_eq!(updated.desc, "New description");
    assert!(updated.sanitized_html.contains("<strong>bold</strong>"));
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.fullname, created.fullname);
    assert_eq!(updated.created_at, created.created_at);

    assert!(service.get_post("hello-world").await.is_err());
    assert_eq!(service.get_post("new-title").await.unwrap().id, created.id);
}

#[tokio::test]
async fn update_may_reuse_an_existing_title() {
    let (service, _) = setup();
    let ada = caller("ada");
    service.create_post(&ada, input("Taken")).await.unwrap();
    let other = service.create_post(&ada, input("Other")).await.unwrap();

    let updated = service
        .update_post(&ada, other.id, input("Taken"))
        .await
        .unwrap();

    assert_eq!(updated.title, "Taken");
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden_and_changes_nothing() {
    let (service, _) = setup();
    let created = service
        .create_post(&caller("ada"), input("Mine"))
        .await
        .unwrap();

    let err = service
        .update_post(&caller("bob"), created.id, input("Hijacked"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Forbidden));
    let stored = service.get_post_for_update(created.id).await.unwrap();
    assert_eq!(stored.title, "Mine");
    assert_eq!(stored.version, created.version);
}

#[tokio::test]
async fn update_of_missing_post_is_not_found() {
    let (service, _) = setup();

    let err = service
        .update_post(&caller("ada"), Uuid::new_v4(), input("Anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn update_racing_a_newer_write_is_stale() {
    let (service, repo) = setup();
    let ada = caller("ada");
    let created = service.create_post(&ada, input("Draft")).await.unwrap();

    // Another writer lands between our read and our write.
    let mut content = default_pipeline().prepare(input("Concurrent")).unwrap();
    repo.update_content(created.id, created.version, content.clone())
        .await
        .unwrap();
    content.title = "Lost".to_string();
    let stale = repo
        .update_content(created.id, created.version, content)
        .await;
    assert!(stale.is_err());

    // The engine always reads the current version, so its own update lands.
    let updated = service
        .update_post(&ada, created.id, input("Final"))
        .await
        .unwrap();
    assert_eq!(updated.version, created.version + 2);
}

#[tokio::test]
async fn delete_of_missing_post_is_not_found_even_for_strangers() {
    let (service, _) = setup();

    let err = service
        .delete_post(&caller("mallory"), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn delete_is_owner_only() {
    let (service, _) = setup();
    let ada = caller("ada");
    let created = service.create_post(&ada, input("Doomed")).await.unwrap();

    let err = service
        .delete_post(&caller("bob"), created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
    assert!(service.get_post_for_update(created.id).await.is_ok());

    service.delete_post(&ada, created.id).await.unwrap();
    assert!(matches!(
        service.get_post_for_update(created.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn like_toggles_per_caller() {
    let (service, _) = setup();
    let created = service
        .create_post(&caller("ada"), input("Likeable"))
        .await
        .unwrap();
    let bob = caller("bob");

    let liked = service.like_post(&bob, created.id).await.unwrap();
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].email, bob.email);

    let unliked = service.like_post(&bob, created.id).await.unwrap();
    assert!(unliked.likes.is_empty());
}

#[tokio::test]
async fn owner_can_like_own_post_alongside_others() {
    let (service, _) = setup();
    let ada = caller("ada");
    let bob = caller("bob");
    let created = service.create_post(&ada, input("Popular")).await.unwrap();

    service.like_post(&bob, created.id).await.unwrap();
    let post = service.like_post(&ada, created.id).await.unwrap();

    let emails: Vec<_> = post.likes.iter().map(|l| l.email.clone()).collect();
    assert_eq!(emails, [bob.email.clone(), ada.email.clone()]);

    let post = service.like_post(&bob, created.id).await.unwrap();
    assert_eq!(post.likes.len(), 1);
    assert_eq!(post.likes[0].email, ada.email);
}

#[tokio::test]
async fn like_of_missing_post_is_not_found() {
    let (service, _) = setup();

    let err = service
        .like_post(&caller("bob"), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn search_matches_title_or_desc_case_insensitively() {
    let (service, _) = setup();
    let ada = caller("ada");
    service
        .create_post(&ada, PostInput::new("ABCs of Rust", "intro", "b"))
        .await
        .unwrap();
    service
        .create_post(&ada, PostInput::new("Cooking", "learn your abc", "b"))
        .await
        .unwrap();
    service
        .create_post(&ada, PostInput::new("Gardening", "soil", "b"))
        .await
        .unwrap();

    let mut titles: Vec<_> = service
        .search_posts(Some("abc"))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    titles.sort();
    assert_eq!(titles, ["ABCs of Rust", "Cooking"]);

    assert_eq!(service.search_posts(None).await.unwrap().len(), 3);
    assert_eq!(service.search_posts(Some("")).await.unwrap().len(), 3);
    assert!(service.search_posts(Some("a.c")).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_text_is_matched_untrimmed() {
    let (service, _) = setup();
    let ada = caller("ada");
    service
        .create_post(&ada, PostInput::new("Hello world", "d", "b"))
        .await
        .unwrap();
    service
        .create_post(&ada, PostInput::new("Helloworld", "d", "b"))
        .await
        .unwrap();

    let spaced: Vec<_> = service
        .search_posts(Some(" world"))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(spaced, ["Hello world"]);

    let blanks = service.search_posts(Some("  ")).await.unwrap();
    assert!(blanks.is_empty());
}

#[tokio::test]
async fn slug_shared_by_two_titles_resolves_to_newest() {
    let (service, _) = setup();
    let ada = caller("ada");
    service
        .create_post(&ada, input("Hello World!"))
        .await
        .unwrap();
    let newer = service.create_post(&ada, input("hello world")).await.unwrap();

    assert_eq!(newer.slug, "hello-world");
    assert_eq!(service.get_post("hello-world").await.unwrap().id, newer.id);
}

#[tokio::test]
async fn listings_are_newest_first_and_scoped_by_user() {
    let (service, _) = setup();
    let ada = caller("ada");
    let bob = caller("bob");

    let first = service.create_post(&ada, input("First")).await.unwrap();
    let second = service.create_post(&bob, input("Second")).await.unwrap();
    let third = service.create_post(&ada, input("Third")).await.unwrap();

    let all: Vec<_> = service
        .get_posts()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(all, [third.id, second.id, first.id]);

    let adas: Vec<_> = service
        .get_user_posts(ada.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(adas, [third.id, first.id]);

    assert!(service.get_user_posts(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_post_unknown_slug_is_not_found() {
    let (service, _) = setup();

    let err = service.get_post("missing").await.unwrap_err();

    match err {
        DomainError::NotFound { entity_type, key } => {
            assert_eq!(entity_type, "Post");
            assert_eq!(key, "missing");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}
