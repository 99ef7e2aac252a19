use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000011_add_tracking_indexes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Hot lookup paths: open assignments per asset, logs per asset,
        // shipment status sweeps, and pending return queues.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_asset_status")
                    .table(Assignments::Table)
                    .col(Assignments::AssetId)
                    .col(Assignments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_holder")
                    .table(Assignments::Table)
                    .col(Assignments::HolderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_maintenance_logs_asset")
                    .table(MaintenanceLogs::Table)
                    .col(MaintenanceLogs::AssetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shipments_status")
                    .table(Shipments::Table)
                    .col(Shipments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_return_requests_status")
                    .table(ReturnRequests::Table)
                    .col(ReturnRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_assignments_asset_status")
                    .table(Assignments::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_assignments_holder")
                    .table(Assignments::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_maintenance_logs_asset")
                    .table(MaintenanceLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shipments_status")
                    .table(Shipments::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_return_requests_status")
                    .table(ReturnRequests::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    AssetId,
    HolderId,
    Status,
}

#[derive(DeriveIden)]
enum MaintenanceLogs {
    Table,
    AssetId,
}

#[derive(DeriveIden)]
enum Shipments {
    Table,
    Status,
}

#[derive(DeriveIden)]
enum ReturnRequests {
    Table,
    Status,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    CustomerId,
}
