use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::models::user::{self, ActiveModel, Entity as UserEntity, Model as User};
use crate::repos::{now, RepoError};
use crate::utils::ident;

pub struct UsersRepo {
    db: DatabaseConnection,
}

impl UsersRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `password` must already be hashed.
    pub async fn create(
        &self,
        name: String,
        email: String,
        password: String,
        department: Option<String>,
    ) -> Result<User, RepoError> {
        let db = &self.db;
        let prefix = ident::derive_initials(&name);
        let user_id = ident::generate_id(&prefix, 100..=999, |candidate| async move {
            Ok(UserEntity::find_by_id(&candidate).one(db).await?.is_some())
        })
        .await?;

        let timestamp = now();
        let user_model = ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            email: Set(email),
            password: Set(password),
            department: Set(department),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };
        let user = user_model.insert(&self.db).await?;

        Ok(user)
    }

    pub async fn get(&self, user_id: &str) -> Result<User, RepoError> {
        let user = UserEntity::find_by_id(user_id).one(&self.db).await?;

        match user {
            Some(u) => Ok(u),
            None => Err(RepoError::NotFound(format!("User {} not found", user_id))),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let user = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        match user {
            Some(u) => Ok(u),
            None => Err(RepoError::NotFound(format!(
                "User with the email {} not found",
                email
            ))),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        let users = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(users)
    }

    pub async fn update(
        &self,
        user_id: &str,
        name: Option<String>,
        email: Option<String>,
        department: Option<String>,
    ) -> Result<User, RepoError> {
        let user = self.get(user_id).await?;

        let mut user_model: ActiveModel = user.into();
        if let Some(name) = name {
            user_model.name = Set(name);
        }
        if let Some(email) = email {
            user_model.email = Set(email);
        }
        if let Some(department) = department {
            user_model.department = Set(Some(department));
        }
        user_model.updated_at = Set(now());
        let updated = user_model.update(&self.db).await?;

        Ok(updated)
    }

    /// The schema cascades the delete to the user's activities and their
    /// updates.
    pub async fn delete(&self, user_id: &str) -> Result<(), RepoError> {
        let user = self.get(user_id).await?;
        UserEntity::delete_by_id(user.user_id).exec(&self.db).await?;

        Ok(())
    }
}
