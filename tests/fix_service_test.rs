mod common;

use std::sync::Arc;

use sqlx::SqlitePool;

use fixflow::domain::models::FixStatus;
use fixflow::domain::ports::{IssueRepository, NewIssue};
use fixflow::infrastructure::database::{FixRepositoryImpl, IssueRepositoryImpl};
use fixflow::services::{FixError, FixService};

use common::{insert_user, setup_test_db, teardown_test_db};

const OWNER: i64 = 1;
const STRANGER: i64 = 2;

fn service(pool: &SqlitePool) -> FixService {
    FixService::new(
        Arc::new(IssueRepositoryImpl::new(pool.clone())),
        Arc::new(FixRepositoryImpl::new(pool.clone())),
    )
}

async fn seed_issue(pool: &SqlitePool, github_issue_id: i64, fixable: bool) -> i64 {
    let repo = IssueRepositoryImpl::new(pool.clone());
    let (issue, created) = repo
        .upsert(&NewIssue {
            github_issue_id,
            title: "panic on empty input".to_string(),
            repo_full_name: "acme/widget".to_string(),
            description: Some("Traceback (most recent call last)".to_string()),
            state: "open".to_string(),
            html_url: None,
            labels: vec!["bug".to_string()],
            is_ai_fixable: fixable,
            user_id: OWNER,
        })
        .await
        .expect("seed issue");
    assert!(created);
    issue.id
}

#[tokio::test]
async fn generate_creates_pending_draft_for_fixable_issue() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    let issue_id = seed_issue(&pool, 100, true).await;

    let fix = service(&pool)
        .generate_fix(issue_id, OWNER)
        .await
        .expect("draft should be generated");

    assert_eq!(fix.issue_id, issue_id);
    assert_eq!(fix.status, FixStatus::Pending);
    assert!(!fix.is_submitted);
    assert!(fix.content.contains("panic on empty input"));
    assert!(fix.pr_url.is_none());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn generate_is_refused_for_non_fixable_issue() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    let issue_id = seed_issue(&pool, 100, false).await;

    let err = service(&pool)
        .generate_fix(issue_id, OWNER)
        .await
        .expect_err("non-fixable issue must be refused");
    assert!(matches!(err, FixError::NotFixable(_)));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn create_and_list_manual_drafts() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    let issue_id = seed_issue(&pool, 100, false).await;
    let svc = service(&pool);

    // Manual drafts are allowed regardless of the verdict.
    svc.create_fix(issue_id, OWNER, "first attempt".to_string(), None)
        .await
        .expect("create first");
    svc.create_fix(
        issue_id,
        OWNER,
        "second attempt".to_string(),
        Some("take two".to_string()),
    )
    .await
    .expect("create second");

    let fixes = svc.list_fixes(issue_id, OWNER).await.expect("list");
    assert_eq!(fixes.len(), 2);
    assert_eq!(fixes[0].content, "first attempt");
    assert_eq!(fixes[1].submission_message.as_deref(), Some("take two"));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn submit_flips_status_and_records_placeholder_pr() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    let issue_id = seed_issue(&pool, 100, true).await;
    let svc = service(&pool);

    let fix = svc.generate_fix(issue_id, OWNER).await.expect("generate");
    let submitted = svc
        .submit_fix(fix.id, OWNER, "please review".to_string())
        .await
        .expect("submit");

    assert_eq!(submitted.status, FixStatus::Submitted);
    assert!(submitted.is_submitted);
    assert_eq!(submitted.submission_message.as_deref(), Some("please review"));
    assert_eq!(
        submitted.pr_url.as_deref(),
        Some("https://github.com/acme/widget/pull/999")
    );

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn operations_require_issue_ownership() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    insert_user(&pool, STRANGER, "intruder", "tok2").await;
    let issue_id = seed_issue(&pool, 100, true).await;
    let svc = service(&pool);

    let fix = svc.generate_fix(issue_id, OWNER).await.expect("generate");

    assert!(matches!(
        svc.list_fixes(issue_id, STRANGER).await,
        Err(FixError::IssueNotFound(_))
    ));
    assert!(matches!(
        svc.submit_fix(fix.id, STRANGER, "mine now".to_string()).await,
        Err(FixError::IssueNotFound(_))
    ));
    assert!(matches!(
        svc.delete_fix(fix.id, STRANGER).await,
        Err(FixError::IssueNotFound(_))
    ));

    // Still there for the owner.
    let fixes = svc.list_fixes(issue_id, OWNER).await.expect("list");
    assert_eq!(fixes.len(), 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn delete_removes_the_draft_and_keeps_the_issue() {
    let pool = setup_test_db().await;
    insert_user(&pool, OWNER, "octocat", "tok").await;
    let issue_id = seed_issue(&pool, 100, true).await;
    let svc = service(&pool);

    let fix = svc.generate_fix(issue_id, OWNER).await.expect("generate");
    svc.delete_fix(fix.id, OWNER).await.expect("delete");

    assert!(svc.list_fixes(issue_id, OWNER).await.expect("list").is_empty());

    let issues: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(issues, 1, "deleting a fix must not touch its issue");

    let err = svc
        .delete_fix(fix.id, OWNER)
        .await
        .expect_err("double delete must fail");
    assert!(matches!(err, FixError::FixNotFound(_)));

    teardown_test_db(pool).await;
}
