use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Checkpoint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checkpoint::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Checkpoint::ChainId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Checkpoint::NextHeight)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Checkpoint::DateUpdated)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transaction::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transaction::Hash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Transaction::Height).big_integer().not_null())
                    .col(
                        ColumnDef::new(Transaction::Content)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Transaction::ContentLength)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transaction::Fees).string().not_null())
                    .col(ColumnDef::new(Transaction::GasUsed).big_integer().not_null())
                    .col(ColumnDef::new(Transaction::StatusMessage).text().not_null())
                    .col(
                        ColumnDef::new(Transaction::DateCreated)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("transaction_height")
                    .table(Transaction::Table)
                    .col(Transaction::Height)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Checkpoint::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Checkpoint {
    Table,
    Id,
    ChainId,
    NextHeight,
    DateUpdated,
}

#[derive(Iden)]
enum Transaction {
    Table,
    Id,
    Hash,
    Height,
    Content,
    ContentLength,
    Fees,
    GasUsed,
    StatusMessage,
    DateCreated,
}
