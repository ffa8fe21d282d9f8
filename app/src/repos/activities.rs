use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, LoaderTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::models::activity::{
    self, ActiveModel, ActivityStatus, Entity as ActivityEntity, Model as Activity,
};
use crate::models::{activity_update, user};
use crate::repos::{day_bounds, now, week_bounds, RepoError};
use crate::utils::ident;

pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ActivityStatus>,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

/// An activity row with its creator and update history, the shape the
/// dashboard consumes.
#[derive(Debug, Serialize)]
pub struct DetailedActivity {
    #[serde(flatten)]
    pub activity: Activity,
    pub creator: Option<user::Model>,
    pub updates: Vec<activity_update::Model>,
}

pub struct ActivitiesRepo {
    db: DatabaseConnection,
}

impl ActivitiesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All-or-nothing: the batch runs in one transaction, so a failing item
    /// rolls back every item before it.
    pub async fn create_many(
        &self,
        payloads: Vec<NewActivity>,
        created_by: &str,
    ) -> Result<Vec<Activity>, RepoError> {
        let txn = self.db.begin().await?;

        let mut created = Vec::with_capacity(payloads.len());
        for payload in payloads {
            created.push(insert_activity(&txn, payload, created_by).await?);
        }

        txn.commit().await?;
        Ok(created)
    }

    pub async fn get(&self, activity_id: &str) -> Result<Activity, RepoError> {
        let activity = ActivityEntity::find_by_id(activity_id).one(&self.db).await?;

        match activity {
            Some(a) => Ok(a),
            None => Err(RepoError::NotFound(format!(
                "Activity {} not found",
                activity_id
            ))),
        }
    }

    pub async fn get_all_detailed(&self) -> Result<Vec<DetailedActivity>, RepoError> {
        let activities = ActivityEntity::find()
            .order_by_asc(activity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(activities).await
    }

    pub async fn get_detailed(&self, activity_id: &str) -> Result<DetailedActivity, RepoError> {
        let activity = self.get(activity_id).await?;
        let mut detailed = self.attach_relations(vec![activity]).await?;

        Ok(detailed.remove(0))
    }

    /// Partial edit. A status change through the parent is still recorded as
    /// an update row, so the history stays complete.
    pub async fn update(
        &self,
        activity_id: &str,
        patch: ActivityPatch,
        acting_user_id: &str,
    ) -> Result<Activity, RepoError> {
        let txn = self.db.begin().await?;

        let activity = ActivityEntity::find_by_id(activity_id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Activity {} not found", activity_id)))?;
        let old_status = activity.status.clone();

        let mut activity_model: ActiveModel = activity.into();
        if let Some(title) = patch.title {
            activity_model.title = Set(title);
        }
        if let Some(description) = patch.description {
            activity_model.description = Set(Some(description));
        }
        if let Some(status) = patch.status {
            activity_model.status = Set(status);
        }
        activity_model.updated_at = Set(now());
        let updated = activity_model.update(&txn).await?;

        if updated.status != old_status {
            let update_id = ident::generate_id("UPD", 10000..=99999, |candidate| {
                let txn = &txn;
                async move {
                    Ok(activity_update::Entity::find_by_id(&candidate)
                        .one(txn)
                        .await?
                        .is_some())
                }
            })
            .await?;

            let timestamp = now();
            let audit_model = activity_update::ActiveModel {
                update_id: Set(update_id),
                activity_id: Set(updated.activity_id.clone()),
                updated_by: Set(acting_user_id.to_string()),
                status: Set(updated.status.clone()),
                remark: Set(Some(patch.remark.unwrap_or_else(|| {
                    "Status changed via parent update".to_string()
                }))),
                progress: Set(patch.progress),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
            };
            audit_model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Activities created on `date`, ascending.
    pub async fn daily(&self, date: NaiveDate) -> Result<Vec<DetailedActivity>, RepoError> {
        let (start, end) = day_bounds(date);
        let activities = ActivityEntity::find()
            .filter(activity::Column::CreatedAt.gte(start))
            .filter(activity::Column::CreatedAt.lt(end))
            .order_by_asc(activity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(activities).await
    }

    /// Activities created in the current ISO week (Monday through Sunday,
    /// UTC), ascending.
    pub async fn weekly(&self) -> Result<Vec<DetailedActivity>, RepoError> {
        let (start, end) = week_bounds(Utc::now().date_naive());
        let activities = ActivityEntity::find()
            .filter(activity::Column::CreatedAt.gte(start))
            .filter(activity::Column::CreatedAt.lt(end))
            .order_by_asc(activity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(activities).await
    }

    async fn attach_relations(
        &self,
        activities: Vec<Activity>,
    ) -> Result<Vec<DetailedActivity>, RepoError> {
        let creators = activities.load_one(user::Entity, &self.db).await?;
        let updates = activities.load_many(activity_update::Entity, &self.db).await?;

        let detailed = activities
            .into_iter()
            .zip(creators)
            .zip(updates)
            .map(|((activity, creator), mut updates)| {
                updates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                DetailedActivity {
                    activity,
                    creator,
                    updates,
                }
            })
            .collect();

        Ok(detailed)
    }
}

async fn insert_activity<C: ConnectionTrait>(
    conn: &C,
    payload: NewActivity,
    created_by: &str,
) -> Result<Activity, RepoError> {
    let prefix = ident::derive_prefix(&payload.title);
    let activity_id = ident::generate_id(&prefix, 100..=999, |candidate| async move {
        Ok(ActivityEntity::find_by_id(&candidate)
            .one(conn)
            .await?
            .is_some())
    })
    .await?;

    let timestamp = now();
    let activity_model = ActiveModel {
        activity_id: Set(activity_id),
        title: Set(payload.title),
        description: Set(payload.description),
        created_by: Set(created_by.to_string()),
        status: Set(ActivityStatus::Pending),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };
    let activity = activity_model.insert(conn).await?;

    Ok(activity)
}
