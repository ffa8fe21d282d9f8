use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, LoaderTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::models::activity::{self, ActivityStatus};
use crate::models::activity_update::{
    self, ActiveModel, Entity as UpdateEntity, Model as ActivityUpdate,
};
use crate::models::user;
use crate::repos::{day_bounds, now, RepoError};
use crate::utils::ident;

pub struct NewActivityUpdate {
    pub activity_id: String,
    pub status: ActivityStatus,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

pub struct ActivityUpdatePatch {
    pub status: ActivityStatus,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

/// An update row with its parent activity and authoring user attached.
#[derive(Debug, Serialize)]
pub struct DetailedActivityUpdate {
    #[serde(flatten)]
    pub update: ActivityUpdate,
    pub activity: Option<activity::Model>,
    pub user: Option<user::Model>,
}

pub struct ActivityUpdatesRepo {
    db: DatabaseConnection,
}

impl ActivityUpdatesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All-or-nothing: one transaction, payloads processed sequentially. A
    /// batch targeting the same activity leaves it with the last-processed
    /// status.
    pub async fn create_many(
        &self,
        payloads: Vec<NewActivityUpdate>,
        updated_by: &str,
    ) -> Result<Vec<ActivityUpdate>, RepoError> {
        let txn = self.db.begin().await?;

        let mut created = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let update = insert_update(&txn, payload, updated_by).await?;
            sync_activity_status(&txn, &update.activity_id, update.status.clone()).await?;
            created.push(update);
        }

        txn.commit().await?;
        Ok(created)
    }

    pub async fn get(&self, update_id: &str) -> Result<ActivityUpdate, RepoError> {
        let update = UpdateEntity::find_by_id(update_id).one(&self.db).await?;

        match update {
            Some(u) => Ok(u),
            None => Err(RepoError::NotFound(format!(
                "Activity update {} not found",
                update_id
            ))),
        }
    }

    pub async fn get_all_detailed(&self) -> Result<Vec<DetailedActivityUpdate>, RepoError> {
        let updates = UpdateEntity::find()
            .order_by_asc(activity_update::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(updates).await
    }

    pub async fn get_detailed(&self, update_id: &str) -> Result<DetailedActivityUpdate, RepoError> {
        let update = self.get(update_id).await?;
        let mut detailed = self.attach_relations(vec![update]).await?;

        Ok(detailed.remove(0))
    }

    /// Applies the patch, then re-syncs the parent activity to this update's
    /// status, overwriting whatever the parent held.
    pub async fn update(
        &self,
        update_id: &str,
        patch: ActivityUpdatePatch,
    ) -> Result<ActivityUpdate, RepoError> {
        let txn = self.db.begin().await?;

        let update = UpdateEntity::find_by_id(update_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepoError::NotFound(format!("Activity update {} not found", update_id))
            })?;

        let mut update_model: ActiveModel = update.into();
        update_model.status = Set(patch.status);
        if let Some(remark) = patch.remark {
            update_model.remark = Set(Some(remark));
        }
        if let Some(progress) = patch.progress {
            update_model.progress = Set(Some(progress));
        }
        update_model.updated_at = Set(now());
        let updated = update_model.update(&txn).await?;

        sync_activity_status(&txn, &updated.activity_id, updated.status.clone()).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Updates created between `[start of from, end of to]`, ascending.
    /// Callers must ensure `to >= from`.
    pub async fn report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DetailedActivityUpdate>, RepoError> {
        let (start, _) = day_bounds(from);
        let (_, end) = day_bounds(to);
        let updates = UpdateEntity::find()
            .filter(activity_update::Column::CreatedAt.gte(start))
            .filter(activity_update::Column::CreatedAt.lt(end))
            .order_by_asc(activity_update::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(updates).await
    }

    /// Updates created on `date`, ascending.
    pub async fn hourly(&self, date: NaiveDate) -> Result<Vec<DetailedActivityUpdate>, RepoError> {
        let (start, end) = day_bounds(date);
        let updates = UpdateEntity::find()
            .filter(activity_update::Column::CreatedAt.gte(start))
            .filter(activity_update::Column::CreatedAt.lt(end))
            .order_by_asc(activity_update::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.attach_relations(updates).await
    }

    async fn attach_relations(
        &self,
        updates: Vec<ActivityUpdate>,
    ) -> Result<Vec<DetailedActivityUpdate>, RepoError> {
        let activities = updates.load_one(activity::Entity, &self.db).await?;
        let users = updates.load_one(user::Entity, &self.db).await?;

        let detailed = updates
            .into_iter()
            .zip(activities)
            .zip(users)
            .map(|((update, activity), user)| DetailedActivityUpdate {
                update,
                activity,
                user,
            })
            .collect();

        Ok(detailed)
    }
}

/// Overwrite the parent activity's status with `status`. Called after every
/// update insert or edit; last write wins, no versioning.
pub async fn sync_activity_status<C: ConnectionTrait>(
    conn: &C,
    activity_id: &str,
    status: ActivityStatus,
) -> Result<(), RepoError> {
    let parent = activity::Entity::find_by_id(activity_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepoError::UnknownActivity(activity_id.to_string()))?;

    let mut parent_model: activity::ActiveModel = parent.into();
    parent_model.status = Set(status);
    parent_model.updated_at = Set(now());
    parent_model.update(conn).await?;

    Ok(())
}

async fn insert_update<C: ConnectionTrait>(
    conn: &C,
    payload: NewActivityUpdate,
    updated_by: &str,
) -> Result<ActivityUpdate, RepoError> {
    // Checked up front so a dangling reference is a validation failure, not
    // a foreign key violation.
    let parent_exists = activity::Entity::find_by_id(&payload.activity_id)
        .one(conn)
        .await?
        .is_some();
    if !parent_exists {
        return Err(RepoError::UnknownActivity(payload.activity_id));
    }

    let prefix = ident::derive_prefix(&payload.activity_id);
    let update_id = ident::generate_id(&prefix, 100..=999, |candidate| async move {
        Ok(UpdateEntity::find_by_id(&candidate)
            .one(conn)
            .await?
            .is_some())
    })
    .await?;

    let timestamp = now();
    let update_model = ActiveModel {
        update_id: Set(update_id),
        activity_id: Set(payload.activity_id),
        updated_by: Set(updated_by.to_string()),
        status: Set(payload.status),
        remark: Set(payload.remark),
        progress: Set(payload.progress),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };
    let update = update_model.insert(conn).await?;

    Ok(update)
}
