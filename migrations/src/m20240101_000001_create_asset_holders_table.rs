use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000001_create_asset_holders_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssetHolders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetHolders::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssetHolders::Name).string().not_null())
                    .col(
                        ColumnDef::new(AssetHolders::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AssetHolders::Department).string().null())
                    .col(ColumnDef::new(AssetHolders::Phone).string().null())
                    .col(
                        ColumnDef::new(AssetHolders::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AssetHolders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssetHolders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssetHolders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AssetHolders {
    Table,
    Id,
    Name,
    Email,
    Department,
    Phone,
    Active,
    CreatedAt,
    UpdatedAt,
}
