use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000005_create_shipments_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shipments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Shipments::AssetId).uuid().not_null())
                    .col(
                        ColumnDef::new(Shipments::TrackingNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Shipments::Carrier).text().not_null())
                    .col(ColumnDef::new(Shipments::Status).text().not_null())
                    .col(ColumnDef::new(Shipments::Origin).string().not_null())
                    .col(ColumnDef::new(Shipments::Destination).string().not_null())
                    .col(ColumnDef::new(Shipments::RecipientName).string().not_null())
                    .col(
                        ColumnDef::new(Shipments::ShippedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Shipments::EstimatedDelivery)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Shipments::DeliveredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Shipments::Notes).text().null())
                    .col(
                        ColumnDef::new(Shipments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shipments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipments_asset_id")
                            .from(Shipments::Table, Shipments::AssetId)
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
            .drop_table(Table::drop().table(Shipments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Shipments {
    Table,
    Id,
    AssetId,
    TrackingNumber,
    Carrier,
    Status,
    Origin,
    Destination,
    RecipientName,
    ShippedAt,
    EstimatedDelivery,
    DeliveredAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
}
