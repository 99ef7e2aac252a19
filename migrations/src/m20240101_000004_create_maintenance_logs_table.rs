use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000004_create_maintenance_logs_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceLogs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceLogs::AssetId).uuid().not_null())
                    .col(
                        ColumnDef::new(MaintenanceLogs::MaintenanceType)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceLogs::Status).text().not_null())
                    .col(
                        ColumnDef::new(MaintenanceLogs::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceLogs::PerformedBy).string().null())
                    .col(ColumnDef::new(MaintenanceLogs::Cost).decimal().null())
                    .col(
                        ColumnDef::new(MaintenanceLogs::ScheduledFor)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceLogs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_logs_asset_id")
                            .from(MaintenanceLogs::Table, MaintenanceLogs::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MaintenanceLogs {
    Table,
    Id,
    AssetId,
    MaintenanceType,
    Status,
    Description,
    PerformedBy,
    Cost,
    ScheduledFor,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
}
