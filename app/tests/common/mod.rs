use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

use tracker::config::config::Config;
use tracker::models::user::Model as User;
use tracker::repos::users::UsersRepo;
use tracker::utils::password::hash_password;

#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        server_ip: "127.0.0.1".to_string(),
        max_connections: 1,
        min_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_expiry_hours: 24,
    }
}

/// Fresh in-memory sqlite database with the real migrations applied. A
/// single-connection pool keeps every statement on the same in-memory
/// database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    db.execute_raw(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();

    Migrator::up(&db, None).await.unwrap();
    db
}

#[allow(dead_code)]
pub async fn create_user(db: &DatabaseConnection, name: &str, email: &str) -> User {
    UsersRepo::new(db.clone())
        .create(
            name.to_string(),
            email.to_string(),
            hash_password("hunter22").unwrap(),
            Some("Engineering".to_string()),
        )
        .await
        .unwrap()
}
