use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000006_create_return_requests_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReturnRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReturnRequests::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReturnRequests::AssignmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReturnRequests::RequestedBy)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReturnRequests::Reason).text().not_null())
                    .col(ColumnDef::new(ReturnRequests::Status).text().not_null())
                    .col(
                        ColumnDef::new(ReturnRequests::ResolutionNotes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReturnRequests::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReturnRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReturnRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_return_requests_assignment_id")
                            .from(ReturnRequests::Table, ReturnRequests::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReturnRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ReturnRequests {
    Table,
    Id,
    AssignmentId,
    RequestedBy,
    Reason,
    Status,
    ResolutionNotes,
    ResolvedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
}
