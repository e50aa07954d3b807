use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collection::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Collection::ChainId).string().not_null())
                    .col(ColumnDef::new(Collection::Height).big_integer().not_null())
                    .col(ColumnDef::new(Collection::TransactionId).integer().not_null())
                    .col(
                        ColumnDef::new(Collection::ContentHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Collection::Creator).string().not_null())
                    .col(ColumnDef::new(Collection::Name).string().not_null())
                    .col(ColumnDef::new(Collection::Symbol).string().not_null())
                    .col(
                        ColumnDef::new(Collection::Metadata)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Collection::DateCreated)
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
                    .name("collection_chain_symbol")
                    .table(Collection::Table)
                    .col(Collection::ChainId)
                    .col(Collection::Symbol)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inscription::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inscription::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inscription::ChainId).string().not_null())
                    .col(ColumnDef::new(Inscription::Height).big_integer().not_null())
                    .col(ColumnDef::new(Inscription::TransactionId).integer().not_null())
                    .col(
                        ColumnDef::new(Inscription::ContentHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Inscription::Creator).string().not_null())
                    .col(ColumnDef::new(Inscription::CurrentOwner).string().not_null())
                    .col(ColumnDef::new(Inscription::InscriptionType).string().not_null())
                    .col(ColumnDef::new(Inscription::CollectionId).integer().null())
                    .col(
                        ColumnDef::new(Inscription::Metadata)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(Inscription::ContentSize).integer().not_null())
                    .col(ColumnDef::new(Inscription::ContentPath).string().null())
                    .col(
                        ColumnDef::new(Inscription::DateCreated)
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
                    .name("inscription_current_owner")
                    .table(Inscription::Table)
                    .col(Inscription::CurrentOwner)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InscriptionHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InscriptionHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InscriptionHistory::ChainId).string().not_null())
                    .col(
                        ColumnDef::new(InscriptionHistory::Height)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InscriptionHistory::TransactionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InscriptionHistory::InscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InscriptionHistory::Sender).string().not_null())
                    .col(ColumnDef::new(InscriptionHistory::Receiver).string().null())
                    .col(ColumnDef::new(InscriptionHistory::Action).string().not_null())
                    .col(
                        ColumnDef::new(InscriptionHistory::DateCreated)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InscriptionHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Inscription::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Collection::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Collection {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    ContentHash,
    Creator,
    Name,
    Symbol,
    Metadata,
    DateCreated,
}

#[derive(Iden)]
enum Inscription {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    ContentHash,
    Creator,
    CurrentOwner,
    InscriptionType,
    CollectionId,
    Metadata,
    ContentSize,
    ContentPath,
    DateCreated,
}

#[derive(Iden)]
enum InscriptionHistory {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    InscriptionId,
    Sender,
    Receiver,
    Action,
    DateCreated,
}
