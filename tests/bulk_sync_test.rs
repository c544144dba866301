mod common;

use std::sync::Arc;

use fixflow::infrastructure::database::{IssueRepositoryImpl, UserDirectoryImpl};
use fixflow::services::{BulkSync, IssueSync, SyncError};

use common::{insert_user, raw_issue, repo, setup_test_db, teardown_test_db, MockGithub};

const USER: i64 = 1;

fn build_sync(pool: &sqlx::SqlitePool, github: MockGithub) -> BulkSync {
    BulkSync::new(
        Arc::new(github),
        Arc::new(UserDirectoryImpl::new(pool.clone())),
        IssueSync::new(Arc::new(IssueRepositoryImpl::new(pool.clone()))),
    )
}

#[tokio::test]
async fn syncs_issues_in_repo_listing_order() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![
        repo("widget", "acme/widget", false),
        repo("gadget", "acme/gadget", false),
    ]);
    github.add_issues(
        "acme/widget",
        vec![
            raw_issue(10, 1, "first", Some("Error: boom"), &[]),
            raw_issue(11, 2, "second", None, &[]),
        ],
    );
    github.add_issues("acme/gadget", vec![raw_issue(20, 1, "third", None, &["bug"])]);

    let synced = build_sync(&pool, github)
        .sync_all_issues_for_user(USER, false)
        .await
        .expect("sync should succeed");

    let ids: Vec<i64> = synced.iter().map(|s| s.issue.github_issue_id).collect();
    assert_eq!(ids, vec![10, 11, 20]);
    assert!(synced.iter().all(|s| s.created));
    assert!(synced[0].issue.is_ai_fixable, "body marker should classify");
    assert!(!synced[1].issue.is_ai_fixable);
    assert!(synced[2].issue.is_ai_fixable, "bug label should classify");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn fork_parent_issues_follow_the_fork() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![
        repo("widget", "me/widget", true),
        repo("gadget", "me/gadget", false),
    ]);
    github.add_issues("me/widget", vec![raw_issue(1, 1, "fork issue", None, &[])]);
    github.add_parent("me/widget", "widget", "acme/widget");
    github.add_issues("acme/widget", vec![raw_issue(2, 5, "parent issue", None, &[])]);
    github.add_issues("me/gadget", vec![raw_issue(3, 1, "later repo", None, &[])]);

    let synced = build_sync(&pool, github)
        .sync_all_issues_for_user(USER, true)
        .await
        .expect("sync should succeed");

    // Parent issues are appended directly after the fork's own, before the
    // next repository in the listing.
    let ids: Vec<i64> = synced.iter().map(|s| s.issue.github_issue_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    assert!(synced[0].is_fork);
    assert!(!synced[0].is_parent_of_fork);

    assert!(!synced[1].is_fork, "parent is surfaced as a non-fork");
    assert!(synced[1].is_parent_of_fork);
    assert_eq!(synced[1].repo_full_name, "acme/widget");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn shared_parent_is_processed_once_case_insensitively() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    // The parent is already reachable directly, under different casing.
    let mut github = MockGithub::with_repos(vec![
        repo("Widget", "ACME/Widget", false),
        repo("widget", "me/widget", true),
    ]);
    github.add_issues("ACME/Widget", vec![raw_issue(1, 1, "upstream", None, &[])]);
    github.add_issues("me/widget", vec![raw_issue(2, 1, "fork", None, &[])]);
    github.add_parent("me/widget", "Widget", "acme/widget");

    let sync = build_sync(&pool, github);
    let synced = sync
        .sync_all_issues_for_user(USER, true)
        .await
        .expect("sync should succeed");

    let ids: Vec<i64> = synced.iter().map(|s| s.issue.github_issue_id).collect();
    assert_eq!(ids, vec![1, 2], "parent issues must not be fetched twice");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn fork_parents_ignored_without_flag() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![repo("widget", "me/widget", true)]);
    github.add_issues("me/widget", vec![raw_issue(1, 1, "fork issue", None, &[])]);
    github.add_parent("me/widget", "widget", "acme/widget");
    github.add_issues("acme/widget", vec![raw_issue(2, 5, "parent issue", None, &[])]);

    let sync = build_sync(&pool, github);
    let synced = sync
        .sync_all_issues_for_user(USER, false)
        .await
        .expect("sync should succeed");

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].issue.github_issue_id, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn failing_repo_is_skipped_and_the_rest_synced() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![
        repo("broken", "acme/broken", false),
        repo("widget", "acme/widget", false),
    ]);
    github.failing_issue_repos.insert("acme/broken".to_string());
    github.add_issues("acme/widget", vec![raw_issue(5, 1, "survives", None, &[])]);

    let synced = build_sync(&pool, github)
        .sync_all_issues_for_user(USER, false)
        .await
        .expect("one broken repo must not abort the sync");

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].repo_full_name, "acme/widget");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn failing_fork_detail_skips_only_the_parent() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![repo("widget", "me/widget", true)]);
    github.add_issues("me/widget", vec![raw_issue(1, 1, "fork issue", None, &[])]);
    github.failing_detail_repos.insert("me/widget".to_string());

    let synced = build_sync(&pool, github)
        .sync_all_issues_for_user(USER, true)
        .await
        .expect("detail failure must not abort the sync");

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].issue.github_issue_id, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn repo_listing_failure_is_fatal() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::default();
    github.fail_repo_listing = true;

    let err = build_sync(&pool, github)
        .sync_all_issues_for_user(USER, false)
        .await
        .expect_err("listing failure must propagate");
    assert!(matches!(err, SyncError::RepoListing(_)));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn unknown_user_is_rejected() {
    let pool = setup_test_db().await;

    let err = build_sync(&pool, MockGithub::default())
        .sync_all_issues_for_user(999, false)
        .await
        .expect_err("unregistered user must be rejected");
    assert!(matches!(err, SyncError::UnknownUser(999)));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn resync_reports_updates_not_creates() {
    let pool = setup_test_db().await;
    insert_user(&pool, USER, "octocat", "tok").await;

    let mut github = MockGithub::with_repos(vec![repo("widget", "acme/widget", false)]);
    github.add_issues("acme/widget", vec![raw_issue(10, 1, "stable", None, &[])]);

    let sync = build_sync(&pool, github);
    let first = sync
        .sync_all_issues_for_user(USER, false)
        .await
        .expect("first sync");
    assert!(first[0].created);

    let second = sync
        .sync_all_issues_for_user(USER, false)
        .await
        .expect("second sync");
    assert!(!second[0].created, "same issue must upsert, not duplicate");
    assert_eq!(first[0].issue.id, second[0].issue.id);

    teardown_test_db(pool).await;
}
