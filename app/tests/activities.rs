mod common;

use std::collections::HashSet;

use tracker::models::activity::ActivityStatus;
use tracker::repos::activities::{ActivitiesRepo, ActivityPatch, NewActivity};
use tracker::repos::activity_updates::ActivityUpdatesRepo;
use tracker::repos::RepoError;

fn payload(title: &str) -> NewActivity {
    NewActivity {
        title: title.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn created_activities_get_prefixed_ids_and_start_pending() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let activity = &created[0];
    assert!(activity.activity_id.starts_with("CH"));
    assert_eq!(activity.activity_id.len(), 5);
    assert!(activity.activity_id[2..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(activity.status, ActivityStatus::Pending);
    assert_eq!(activity.created_by, user.user_id);
}

#[tokio::test]
async fn ids_stay_unique_under_shared_prefixes() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let payloads = (0..40).map(|_| payload("Check SMS logs")).collect();
    let created = repo.create_many(payloads, &user.user_id).await.unwrap();

    let ids: HashSet<String> = created.iter().map(|a| a.activity_id.clone()).collect();
    assert_eq!(ids.len(), 40);
    assert!(ids.iter().all(|id| id.starts_with("CH")));
}

#[tokio::test]
async fn batch_create_keeps_request_order() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(
            vec![payload("Check SMS logs"), payload("Review deploy")],
            &user.user_id,
        )
        .await
        .unwrap();

    assert_eq!(created[0].title, "Check SMS logs");
    assert_eq!(created[1].title, "Review deploy");
}

#[tokio::test]
async fn unknown_activity_is_not_found() {
    let db = common::setup_db().await;
    let repo = ActivitiesRepo::new(db.clone());

    let err = repo.get("ZZ999").await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn refetching_an_unmodified_activity_is_idempotent() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();
    let id = &created[0].activity_id;

    let first = repo.get(id).await.unwrap();
    let second = repo.get(id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn detailed_fetch_attaches_creator_and_updates() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();

    let detailed = repo.get_detailed(&created[0].activity_id).await.unwrap();
    assert_eq!(
        detailed.creator.as_ref().map(|c| c.user_id.as_str()),
        Some(user.user_id.as_str())
    );
    assert!(detailed.updates.is_empty());
}

#[tokio::test]
async fn editing_title_only_records_no_update_row() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();

    let updated = repo
        .update(
            &created[0].activity_id,
            ActivityPatch {
                title: Some("Check MMS logs".to_string()),
                ..Default::default()
            },
            &user.user_id,
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Check MMS logs");
    assert_eq!(updated.status, ActivityStatus::Pending);

    let detailed = repo.get_detailed(&created[0].activity_id).await.unwrap();
    assert!(detailed.updates.is_empty());
}

#[tokio::test]
async fn status_edit_through_the_parent_appends_an_audit_update() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();

    let updated = repo
        .update(
            &created[0].activity_id,
            ActivityPatch {
                status: Some(ActivityStatus::Done),
                ..Default::default()
            },
            &user.user_id,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ActivityStatus::Done);

    let detailed = repo.get_detailed(&created[0].activity_id).await.unwrap();
    assert_eq!(detailed.updates.len(), 1);

    let audit = &detailed.updates[0];
    assert!(audit.update_id.starts_with("UPD"));
    assert_eq!(audit.update_id.len(), 8);
    assert_eq!(audit.status, ActivityStatus::Done);
    assert_eq!(audit.updated_by, user.user_id);
    assert_eq!(
        audit.remark.as_deref(),
        Some("Status changed via parent update")
    );
}

#[tokio::test]
async fn setting_the_same_status_records_nothing() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let repo = ActivitiesRepo::new(db.clone());

    let created = repo
        .create_many(vec![payload("Check SMS logs")], &user.user_id)
        .await
        .unwrap();

    repo.update(
        &created[0].activity_id,
        ActivityPatch {
            status: Some(ActivityStatus::Pending),
            ..Default::default()
        },
        &user.user_id,
    )
    .await
    .unwrap();

    let all_updates = ActivityUpdatesRepo::new(db.clone())
        .get_all_detailed()
        .await
        .unwrap();
    assert!(all_updates.is_empty());
}
