use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Token::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Token::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Token::ChainId).string().not_null())
                    .col(ColumnDef::new(Token::Height).big_integer().not_null())
                    .col(ColumnDef::new(Token::TransactionId).integer().not_null())
                    .col(ColumnDef::new(Token::Creator).string().not_null())
                    .col(ColumnDef::new(Token::CurrentOwner).string().not_null())
                    .col(ColumnDef::new(Token::Name).string().not_null())
                    .col(ColumnDef::new(Token::Ticker).string().not_null())
                    .col(ColumnDef::new(Token::Decimals).integer().not_null())
                    .col(ColumnDef::new(Token::MaxSupply).decimal().not_null())
                    .col(ColumnDef::new(Token::PerWalletLimit).decimal().not_null())
                    .col(ColumnDef::new(Token::LaunchTimestamp).big_integer().not_null())
                    .col(
                        ColumnDef::new(Token::CirculatingSupply)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Token::DateCreated)
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
                    .name("token_chain_ticker")
                    .table(Token::Table)
                    .col(Token::ChainId)
                    .col(Token::Ticker)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TokenHolder::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenHolder::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TokenHolder::ChainId).string().not_null())
                    .col(ColumnDef::new(TokenHolder::TokenId).integer().not_null())
                    .col(ColumnDef::new(TokenHolder::Address).string().not_null())
                    .col(ColumnDef::new(TokenHolder::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(TokenHolder::DateUpdated)
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
                    .name("token_holder_token_address")
                    .table(TokenHolder::Table)
                    .col(TokenHolder::TokenId)
                    .col(TokenHolder::Address)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TokenAddressHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenAddressHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TokenAddressHistory::ChainId).string().not_null())
                    .col(
                        ColumnDef::new(TokenAddressHistory::Height)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenAddressHistory::TransactionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TokenAddressHistory::TokenId).integer().not_null())
                    .col(ColumnDef::new(TokenAddressHistory::Action).string().not_null())
                    .col(ColumnDef::new(TokenAddressHistory::Address).string().not_null())
                    .col(ColumnDef::new(TokenAddressHistory::Sender).string().not_null())
                    .col(ColumnDef::new(TokenAddressHistory::Receiver).string().not_null())
                    .col(ColumnDef::new(TokenAddressHistory::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(TokenAddressHistory::DateCreated)
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
                    .name("token_address_history_token_address")
                    .table(TokenAddressHistory::Table)
                    .col(TokenAddressHistory::TokenId)
                    .col(TokenAddressHistory::Address)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TokenAddressHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TokenHolder::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Token::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Token {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    Creator,
    CurrentOwner,
    Name,
    Ticker,
    Decimals,
    MaxSupply,
    PerWalletLimit,
    LaunchTimestamp,
    CirculatingSupply,
    DateCreated,
}

#[derive(Iden)]
enum TokenHolder {
    Table,
    Id,
    ChainId,
    TokenId,
    Address,
    Amount,
    DateUpdated,
}

#[derive(Iden)]
enum TokenAddressHistory {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    TokenId,
    Action,
    Address,
    Sender,
    Receiver,
    Amount,
    DateCreated,
}
