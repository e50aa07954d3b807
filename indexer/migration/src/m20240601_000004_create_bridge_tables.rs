use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BridgeRemoteChain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BridgeRemoteChain::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BridgeRemoteChain::ChainId).string().not_null())
                    .col(
                        ColumnDef::new(BridgeRemoteChain::RemoteChainId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BridgeRemoteChain::RemoteContract)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BridgeRemoteChain::IbcChannel).string().null())
                    .col(
                        ColumnDef::new(BridgeRemoteChain::DateCreated)
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
                    .name("bridge_remote_chain_chain_remote")
                    .table(BridgeRemoteChain::Table)
                    .col(BridgeRemoteChain::ChainId)
                    .col(BridgeRemoteChain::RemoteChainId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BridgeToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BridgeToken::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BridgeToken::ChainId).string().not_null())
                    .col(ColumnDef::new(BridgeToken::RemoteChainId).string().not_null())
                    .col(ColumnDef::new(BridgeToken::TokenId).integer().not_null())
                    .col(ColumnDef::new(BridgeToken::Enabled).boolean().not_null())
                    .col(ColumnDef::new(BridgeToken::Signature).text().not_null())
                    .col(
                        ColumnDef::new(BridgeToken::DateCreated)
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
                    .name("bridge_token_remote_token")
                    .table(BridgeToken::Table)
                    .col(BridgeToken::RemoteChainId)
                    .col(BridgeToken::TokenId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BridgeHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BridgeHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BridgeHistory::ChainId).string().not_null())
                    .col(ColumnDef::new(BridgeHistory::Height).big_integer().not_null())
                    .col(ColumnDef::new(BridgeHistory::TransactionId).integer().not_null())
                    .col(ColumnDef::new(BridgeHistory::Action).string().not_null())
                    .col(ColumnDef::new(BridgeHistory::Sender).string().not_null())
                    .col(ColumnDef::new(BridgeHistory::TokenId).integer().not_null())
                    .col(ColumnDef::new(BridgeHistory::Ticker).string().not_null())
                    .col(ColumnDef::new(BridgeHistory::Amount).decimal().not_null())
                    .col(ColumnDef::new(BridgeHistory::RemoteChainId).string().not_null())
                    .col(
                        ColumnDef::new(BridgeHistory::RemoteContract)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BridgeHistory::Receiver).string().not_null())
                    .col(ColumnDef::new(BridgeHistory::Signature).text().null())
                    .col(
                        ColumnDef::new(BridgeHistory::DateCreated)
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
                    .name("bridge_history_transaction")
                    .table(BridgeHistory::Table)
                    .col(BridgeHistory::TransactionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BridgeHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BridgeToken::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BridgeRemoteChain::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum BridgeRemoteChain {
    Table,
    Id,
    ChainId,
    RemoteChainId,
    RemoteContract,
    IbcChannel,
    DateCreated,
}

#[derive(Iden)]
enum BridgeToken {
    Table,
    Id,
    ChainId,
    RemoteChainId,
    TokenId,
    Enabled,
    Signature,
    DateCreated,
}

#[derive(Iden)]
enum BridgeHistory {
    Table,
    Id,
    ChainId,
    Height,
    TransactionId,
    Action,
    Sender,
    TokenId,
    Ticker,
    Amount,
    RemoteChainId,
    RemoteContract,
    Receiver,
    Signature,
    DateCreated,
}
