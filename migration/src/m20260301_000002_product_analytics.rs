//! 点击事件表
//!
//! 每次成功的点击写入一行，只追加，不更新。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductAnalytics::ProductId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAnalytics::IpAddress)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductAnalytics::UserAgent).text().not_null())
                    .col(ColumnDef::new(ProductAnalytics::Referrer).text().not_null())
                    .col(
                        ColumnDef::new(ProductAnalytics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_analytics_product_id")
                            .from(ProductAnalytics::Table, ProductAnalytics::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 单商品时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_analytics_product_time")
                    .table(ProductAnalytics::Table)
                    .col(ProductAnalytics::ProductId)
                    .col(ProductAnalytics::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_product_analytics_product_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ProductAnalytics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductAnalytics {
    #[sea_orm(iden = "product_analytics")]
    Table,
    Id,
    ProductId,
    IpAddress,
    UserAgent,
    Referrer,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    #[sea_orm(iden = "products")]
    Table,
    Id,
}
