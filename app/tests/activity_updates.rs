mod common;

use tracker::models::activity::ActivityStatus;
use tracker::repos::activities::{ActivitiesRepo, NewActivity};
use tracker::repos::activity_updates::{
    sync_activity_status, ActivityUpdatePatch, ActivityUpdatesRepo, NewActivityUpdate,
};
use tracker::repos::RepoError;

async fn seed_activity(
    db: &sea_orm::DatabaseConnection,
    user_id: &str,
    title: &str,
) -> tracker::models::activity::Model {
    ActivitiesRepo::new(db.clone())
        .create_many(
            vec![NewActivity {
                title: title.to_string(),
                description: None,
            }],
            user_id,
        )
        .await
        .unwrap()
        .remove(0)
}

fn update_for(activity_id: &str, status: ActivityStatus) -> NewActivityUpdate {
    NewActivityUpdate {
        activity_id: activity_id.to_string(),
        status,
        remark: None,
        progress: None,
    }
}

#[tokio::test]
async fn creating_an_update_syncs_the_parent_status() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let created = repo
        .create_many(
            vec![NewActivityUpdate {
                activity_id: activity.activity_id.clone(),
                status: ActivityStatus::Done,
                remark: Some("verified".to_string()),
                progress: None,
            }],
            &user.user_id,
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].status, ActivityStatus::Done);
    assert_eq!(created[0].remark.as_deref(), Some("verified"));

    let parent = ActivitiesRepo::new(db.clone())
        .get(&activity.activity_id)
        .await
        .unwrap();
    assert_eq!(parent.status, ActivityStatus::Done);
}

#[tokio::test]
async fn update_ids_are_seeded_from_the_activity_id() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let created = repo
        .create_many(
            vec![update_for(&activity.activity_id, ActivityStatus::Pending)],
            &user.user_id,
        )
        .await
        .unwrap();

    // Activity "CHxxx" seeds updates "CHyyy".
    assert!(created[0].update_id.starts_with("CH"));
    assert_eq!(created[0].update_id.len(), 5);
    assert!(created[0].update_id[2..]
        .chars()
        .all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn last_update_in_a_batch_wins() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let created = repo
        .create_many(
            vec![
                update_for(&activity.activity_id, ActivityStatus::Pending),
                update_for(&activity.activity_id, ActivityStatus::Done),
            ],
            &user.user_id,
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let parent = ActivitiesRepo::new(db.clone())
        .get(&activity.activity_id)
        .await
        .unwrap();
    assert_eq!(parent.status, ActivityStatus::Done);
}

#[tokio::test]
async fn unknown_activity_rolls_back_the_whole_batch() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let err = repo
        .create_many(
            vec![
                update_for(&activity.activity_id, ActivityStatus::Done),
                update_for("ZZ999", ActivityStatus::Done),
            ],
            &user.user_id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::UnknownActivity(_)));

    // The valid first item must not have landed, and the parent keeps its
    // original status.
    assert!(repo.get_all_detailed().await.unwrap().is_empty());
    let parent = ActivitiesRepo::new(db.clone())
        .get(&activity.activity_id)
        .await
        .unwrap();
    assert_eq!(parent.status, ActivityStatus::Pending);
}

#[tokio::test]
async fn editing_an_update_resyncs_the_parent() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let created = repo
        .create_many(
            vec![update_for(&activity.activity_id, ActivityStatus::Done)],
            &user.user_id,
        )
        .await
        .unwrap();

    let edited = repo
        .update(
            &created[0].update_id,
            ActivityUpdatePatch {
                status: ActivityStatus::Pending,
                remark: Some("reopened".to_string()),
                progress: Some("50%".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.status, ActivityStatus::Pending);
    assert_eq!(edited.remark.as_deref(), Some("reopened"));
    assert_eq!(edited.update_id, created[0].update_id);

    let parent = ActivitiesRepo::new(db.clone())
        .get(&activity.activity_id)
        .await
        .unwrap();
    assert_eq!(parent.status, ActivityStatus::Pending);
}

#[tokio::test]
async fn editing_an_unknown_update_is_not_found() {
    let db = common::setup_db().await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    let err = repo
        .update(
            "ZZ999",
            ActivityUpdatePatch {
                status: ActivityStatus::Done,
                remark: None,
                progress: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn detailed_updates_carry_activity_and_user() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;
    let repo = ActivityUpdatesRepo::new(db.clone());

    repo.create_many(
        vec![update_for(&activity.activity_id, ActivityStatus::Done)],
        &user.user_id,
    )
    .await
    .unwrap();

    let detailed = repo.get_all_detailed().await.unwrap();
    assert_eq!(detailed.len(), 1);
    assert_eq!(
        detailed[0].activity.as_ref().map(|a| a.activity_id.as_str()),
        Some(activity.activity_id.as_str())
    );
    assert_eq!(
        detailed[0].user.as_ref().map(|u| u.user_id.as_str()),
        Some(user.user_id.as_str())
    );
}

#[tokio::test]
async fn sync_can_be_driven_in_isolation() {
    let db = common::setup_db().await;
    let user = common::create_user(&db, "Jane Doe", "jane@example.test").await;
    let activity = seed_activity(&db, &user.user_id, "Check SMS logs").await;

    sync_activity_status(&db, &activity.activity_id, ActivityStatus::Done)
        .await
        .unwrap();

    let parent = ActivitiesRepo::new(db.clone())
        .get(&activity.activity_id)
        .await
        .unwrap();
    assert_eq!(parent.status, ActivityStatus::Done);

    let err = sync_activity_status(&db, "ZZ999", ActivityStatus::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::UnknownActivity(_)));
}
