use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table("users")
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("user_id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string("name").not_null())
                    .col(string("email").not_null().unique_key())
                    .col(string("password").not_null())
                    .col(string_null("department"))
                    .col(
                        timestamp("created_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp("updated_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // activities
        manager
            .create_table(
                Table::create()
                    .table("activities")
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("activity_id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string("title").not_null())
                    .col(string_null("description"))
                    .col(string("created_by").not_null())
                    .col(string("status").not_null())
                    .col(
                        timestamp("created_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp("updated_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_users")
                            .from("activities", "created_by")
                            .to("users", "user_id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // activity_updates
        manager
            .create_table(
                Table::create()
                    .table("activity_updates")
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("update_id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string("activity_id").not_null())
                    .col(string("updated_by").not_null())
                    .col(string("status").not_null())
                    .col(string_null("remark"))
                    .col(string_null("progress"))
                    .col(
                        timestamp("created_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp("updated_at")
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_updates_activities")
                            .from("activity_updates", "activity_id")
                            .to("activities", "activity_id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_updates_users")
                            .from("activity_updates", "updated_by")
                            .to("users", "user_id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table("activity_updates").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("activities").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("users").to_owned())
            .await?;

        Ok(())
    }
}
