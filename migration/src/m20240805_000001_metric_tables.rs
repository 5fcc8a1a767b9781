//! 指标表初始迁移
//!
//! 创建四张周指标表：social / website / newsletter / social engagement。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // social_metrics
        manager
            .create_table(
                Table::create()
                    .table(SocialMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialMetrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialMetrics::Platform)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMetrics::BusinessUnit)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMetrics::Country)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialMetrics::Date).date().not_null())
                    .col(ColumnDef::new(SocialMetrics::Impressions).big_integer().null())
                    .col(ColumnDef::new(SocialMetrics::Followers).big_integer().null())
                    .col(
                        ColumnDef::new(SocialMetrics::NumberOfPosts)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMetrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // website_metrics
        manager
            .create_table(
                Table::create()
                    .table(WebsiteMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebsiteMetrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WebsiteMetrics::BusinessUnit)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WebsiteMetrics::Country)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WebsiteMetrics::Date).date().not_null())
                    .col(ColumnDef::new(WebsiteMetrics::Users).big_integer().null())
                    .col(ColumnDef::new(WebsiteMetrics::Clicks).big_integer().null())
                    .col(ColumnDef::new(WebsiteMetrics::Sessions).big_integer().null())
                    .col(
                        ColumnDef::new(WebsiteMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WebsiteMetrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // newsletter_metrics
        manager
            .create_table(
                Table::create()
                    .table(NewsletterMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsletterMetrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NewsletterMetrics::BusinessUnit)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterMetrics::Country)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NewsletterMetrics::Date).date().not_null())
                    .col(
                        ColumnDef::new(NewsletterMetrics::Recipients)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(NewsletterMetrics::OpenRate).double().null())
                    .col(
                        ColumnDef::new(NewsletterMetrics::NumberOfEmails)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NewsletterMetrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // social_engagement_metrics
        manager
            .create_table(
                Table::create()
                    .table(SocialEngagementMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Platform)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::BusinessUnit)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Date)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Likes)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Comments)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Shares)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Saves)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::Clicks)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::EngagementRate)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialEngagementMetrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 日期索引（范围查询与最新周期查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_metrics_date")
                    .table(SocialMetrics::Table)
                    .col(SocialMetrics::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_website_metrics_date")
                    .table(WebsiteMetrics::Table)
                    .col(WebsiteMetrics::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_newsletter_metrics_date")
                    .table(NewsletterMetrics::Table)
                    .col(NewsletterMetrics::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_engagement_metrics_date")
                    .table(SocialEngagementMetrics::Table)
                    .col(SocialEngagementMetrics::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(SocialEngagementMetrics::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(NewsletterMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WebsiteMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialMetrics::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum SocialMetrics {
    Table,
    Id,
    Platform,
    BusinessUnit,
    Country,
    Date,
    Impressions,
    Followers,
    NumberOfPosts,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum WebsiteMetrics {
    Table,
    Id,
    BusinessUnit,
    Country,
    Date,
    Users,
    Clicks,
    Sessions,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum NewsletterMetrics {
    Table,
    Id,
    BusinessUnit,
    Country,
    Date,
    Recipients,
    OpenRate,
    NumberOfEmails,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum SocialEngagementMetrics {
    Table,
    Id,
    Platform,
    BusinessUnit,
    Date,
    Likes,
    Comments,
    Shares,
    Saves,
    Clicks,
    EngagementRate,
    CreatedAt,
    UpdatedAt,
}
