use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000002_create_assets_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assets::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Assets::AssetTag)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Assets::Name).string().not_null())
                    .col(ColumnDef::new(Assets::Description).text().null())
                    .col(ColumnDef::new(Assets::Category).text().not_null())
                    .col(ColumnDef::new(Assets::SerialNumber).string().null())
                    .col(ColumnDef::new(Assets::Status).text().not_null())
                    .col(ColumnDef::new(Assets::Location).string().null())
                    .col(
                        ColumnDef::new(Assets::PurchaseDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Assets::PurchasePrice).decimal().null())
                    .col(
                        ColumnDef::new(Assets::WarrantyUntil)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Assets::Notes).text().null())
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    AssetTag,
    Name,
    Description,
    Category,
    SerialNumber,
    Status,
    Location,
    PurchaseDate,
    PurchasePrice,
    WarrantyUntil,
    Notes,
    CreatedAt,
    UpdatedAt,
}
