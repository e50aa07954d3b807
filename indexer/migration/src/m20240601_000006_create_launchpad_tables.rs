use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Launchpad::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Launchpad::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Launchpad::ChainId).string().not_null())
                    .col(ColumnDef::new(Launchpad::TransactionId).integer().not_null())
                    .col(
                        ColumnDef::new(Launchpad::CollectionId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Launchpad::MaxSupply).big_integer().null())
                    .col(
                        ColumnDef::new(Launchpad::MintedSupply)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Launchpad::DateCreated)
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
                    .table(LaunchpadStage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LaunchpadStage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LaunchpadStage::LaunchpadId).integer().not_null())
                    .col(ColumnDef::new(LaunchpadStage::CollectionId).integer().not_null())
                    .col(ColumnDef::new(LaunchpadStage::Name).string().null())
                    .col(ColumnDef::new(LaunchpadStage::Description).text().null())
                    .col(ColumnDef::new(LaunchpadStage::StartDate).timestamp().null())
                    .col(ColumnDef::new(LaunchpadStage::FinishDate).timestamp().null())
                    .col(ColumnDef::new(LaunchpadStage::Price).decimal().not_null())
                    .col(
                        ColumnDef::new(LaunchpadStage::PerUserLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LaunchpadStage::HasWhitelist)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LaunchpadWhitelist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LaunchpadWhitelist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadWhitelist::LaunchpadId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LaunchpadWhitelist::StageId).integer().not_null())
                    .col(ColumnDef::new(LaunchpadWhitelist::Address).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("launchpad_whitelist_stage_address")
                    .table(LaunchpadWhitelist::Table)
                    .col(LaunchpadWhitelist::StageId)
                    .col(LaunchpadWhitelist::Address)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LaunchpadMintReservation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::ChainId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::TransactionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::LaunchpadId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::CollectionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::StageId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::Address)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::TokenId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::IsMinted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::IsExpired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LaunchpadMintReservation::DateCreated)
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
                    .name("launchpad_mint_reservation_collection_token")
                    .table(LaunchpadMintReservation::Table)
                    .col(LaunchpadMintReservation::CollectionId)
                    .col(LaunchpadMintReservation::TokenId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LaunchpadMintReservation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LaunchpadWhitelist::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LaunchpadStage::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Launchpad::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Launchpad {
    Table,
    Id,
    ChainId,
    TransactionId,
    CollectionId,
    MaxSupply,
    MintedSupply,
    DateCreated,
}

#[derive(Iden)]
enum LaunchpadStage {
    Table,
    Id,
    LaunchpadId,
    CollectionId,
    Name,
    Description,
    StartDate,
    FinishDate,
    Price,
    PerUserLimit,
    HasWhitelist,
}

#[derive(Iden)]
enum LaunchpadWhitelist {
    Table,
    Id,
    LaunchpadId,
    StageId,
    Address,
}

#[derive(Iden)]
enum LaunchpadMintReservation {
    Table,
    Id,
    ChainId,
    TransactionId,
    LaunchpadId,
    CollectionId,
    StageId,
    Address,
    TokenId,
    IsMinted,
    IsExpired,
    DateCreated,
}
