//! 指标逻辑主键唯一索引
//!
//! 每张表按 (维度, date) 建立唯一索引，写入路径依赖这些索引做
//! `INSERT ... ON CONFLICT DO UPDATE` 原子 upsert。

use sea_orm_migration::prelude::*;

use crate::m20240805_000001_metric_tables::{
    NewsletterMetrics, SocialEngagementMetrics, SocialMetrics, WebsiteMetrics,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_social_metrics_key")
                    .table(SocialMetrics::Table)
                    .col(SocialMetrics::Platform)
                    .col(SocialMetrics::BusinessUnit)
                    .col(SocialMetrics::Country)
                    .col(SocialMetrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_website_metrics_key")
                    .table(WebsiteMetrics::Table)
                    .col(WebsiteMetrics::BusinessUnit)
                    .col(WebsiteMetrics::Country)
                    .col(WebsiteMetrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_newsletter_metrics_key")
                    .table(NewsletterMetrics::Table)
                    .col(NewsletterMetrics::BusinessUnit)
                    .col(NewsletterMetrics::Country)
                    .col(NewsletterMetrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_engagement_metrics_key")
                    .table(SocialEngagementMetrics::Table)
                    .col(SocialEngagementMetrics::Platform)
                    .col(SocialEngagementMetrics::BusinessUnit)
                    .col(SocialEngagementMetrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uk_engagement_metrics_key")
                    .table(SocialEngagementMetrics::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uk_newsletter_metrics_key")
                    .table(NewsletterMetrics::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uk_website_metrics_key")
                    .table(WebsiteMetrics::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uk_social_metrics_key")
                    .table(SocialMetrics::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
