use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MarketplaceListing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MarketplaceListing::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MarketplaceListing::ChainId).string().not_null())
                    .col(
                        ColumnDef::new(MarketplaceListing::TransactionId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::Hash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::SellerAddress)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MarketplaceListing::Total).decimal().not_null())
                    .col(
                        ColumnDef::new(MarketplaceListing::DepositTotal)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::DepositTimeout)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::DepositorAddress)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::DepositorTimedoutBlock)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::IsDeposited)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::IsFilled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::IsCancelled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::DateCreated)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MarketplaceListing::DateUpdated)
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
                    .table(MarketplaceCft20Detail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MarketplaceCft20Detail::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceCft20Detail::ListingId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceCft20Detail::TokenId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceCft20Detail::Amount)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MarketplaceCft20Detail::Ppt).decimal().not_null())
                    .col(
                        ColumnDef::new(MarketplaceCft20Detail::DateCreated)
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
                    .table(MarketplaceInscriptionDetail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MarketplaceInscriptionDetail::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceInscriptionDetail::ListingId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceInscriptionDetail::InscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MarketplaceInscriptionDetail::DateCreated)
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
            .drop_table(
                Table::drop()
                    .table(MarketplaceInscriptionDetail::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MarketplaceCft20Detail::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MarketplaceListing::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum MarketplaceListing {
    Table,
    Id,
    ChainId,
    TransactionId,
    Hash,
    SellerAddress,
    Total,
    DepositTotal,
    DepositTimeout,
    DepositorAddress,
    DepositorTimedoutBlock,
    IsDeposited,
    IsFilled,
    IsCancelled,
    DateCreated,
    DateUpdated,
}

#[derive(Iden)]
enum MarketplaceCft20Detail {
    #[iden = "marketplace_cft20_detail"]
    Table,
    Id,
    ListingId,
    TokenId,
    Amount,
    Ppt,
    DateCreated,
}

#[derive(Iden)]
enum MarketplaceInscriptionDetail {
    Table,
    Id,
    ListingId,
    InscriptionId,
    DateCreated,
}
