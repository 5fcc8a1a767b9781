//! 存储层集成测试（临时 SQLite 文件）

use chrono::NaiveDate;
use futures_util::future::join_all;
use tempfile::TempDir;

use commsboard::errors::DashboardError;
use commsboard::model::{
    BusinessUnit, NewsletterMetricInput, OpenRate, Platform, SocialEngagementMetricInput,
    SocialMetricInput, WebsiteMetricInput,
};
use commsboard::storage::{MetricFilter, SeaOrmStorage};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn create_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("创建存储失败");
    (storage, temp_dir)
}

fn social_input(
    platform: Platform,
    unit: BusinessUnit,
    country: &str,
    date: NaiveDate,
    followers: i64,
) -> SocialMetricInput {
    SocialMetricInput {
        platform,
        business_unit: unit,
        country: country.to_string(),
        date,
        impressions: Some(followers * 10),
        followers: Some(followers),
        number_of_posts: Some(3),
    }
}

fn website_input(users: i64) -> WebsiteMetricInput {
    WebsiteMetricInput {
        business_unit: BusinessUnit::Em,
        country: "FR".to_string(),
        date: d(2024, 4, 1),
        users: Some(users),
        clicks: Some(1),
        sessions: Some(users * 2),
    }
}

fn newsletter_input(recipients: i64) -> NewsletterMetricInput {
    NewsletterMetricInput {
        business_unit: BusinessUnit::Em,
        country: "FR".to_string(),
        date: d(2024, 4, 1),
        recipients: Some(recipients),
        open_rate: Some(OpenRate::from_fraction(0.4).unwrap()),
        number_of_emails: Some(1),
    }
}

fn engagement_input(likes: i64) -> SocialEngagementMetricInput {
    SocialEngagementMetricInput {
        platform: Platform::Linkedin,
        business_unit: BusinessUnit::Em,
        date: d(2024, 4, 1),
        likes: Some(likes),
        comments: None,
        shares: None,
        saves: None,
        clicks: None,
        engagement_rate: None,
    }
}

async fn row_counts(storage: &SeaOrmStorage) -> [usize; 4] {
    let all = MetricFilter::default();
    [
        storage.find_social(&all).await.unwrap().len(),
        storage.find_website(&all).await.unwrap().len(),
        storage.find_newsletter(&all).await.unwrap().len(),
        storage.find_engagement(&all).await.unwrap().len(),
    ]
}

#[tokio::test]
async fn test_every_kind_upserts_on_fresh_database() {
    let (storage, _dir) = create_storage().await;

    // 第二轮走 ON CONFLICT 更新分支
    for round in 1..=2 {
        let social = social_input(Platform::Tiktok, BusinessUnit::Em, "FR", d(2024, 4, 1), round);
        assert_eq!(storage.upsert_social(&social).await.unwrap().followers, Some(round));
        assert_eq!(
            storage.upsert_website(&website_input(round)).await.unwrap().users,
            Some(round)
        );
        assert_eq!(
            storage
                .upsert_newsletter(&newsletter_input(round))
                .await
                .unwrap()
                .recipients,
            Some(round)
        );
        assert_eq!(
            storage
                .upsert_engagement(&engagement_input(round))
                .await
                .unwrap()
                .likes,
            Some(round)
        );
    }

    assert_eq!(row_counts(&storage).await, [1, 1, 1, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_on_one_key_keep_one_row() {
    const WRITERS: i64 = 16;
    let (storage, _dir) = create_storage().await;

    let writes = (1..=WRITERS).map(|n| {
        let storage = storage.clone();
        async move {
            let social = social_input(Platform::Facebook, BusinessUnit::Asm, "US", d(2024, 4, 1), n);
            storage.upsert_social(&social).await?;
            storage.upsert_website(&website_input(n)).await?;
            storage.upsert_newsletter(&newsletter_input(n)).await?;
            storage.upsert_engagement(&engagement_input(n)).await?;
            Ok::<_, DashboardError>(())
        }
    });
    let results = join_all(writes).await;
    let failures: Vec<String> = results
        .into_iter()
        .filter_map(|r| r.err().map(|e| e.to_string()))
        .collect();
    assert!(failures.is_empty(), "upsert errors: {:?}", failures);

    assert_eq!(row_counts(&storage).await, [1, 1, 1, 1]);

    let website = storage.find_website(&MetricFilter::default()).await.unwrap();
    assert!((1..=WRITERS).contains(&website[0].users.unwrap()));
}

#[tokio::test]
async fn test_social_upsert_is_idempotent_on_logical_key() {
    let (storage, _dir) = create_storage().await;

    let input = social_input(Platform::Facebook, BusinessUnit::Asm, "US", d(2024, 1, 1), 100);
    let first = storage.upsert_social(&input).await.unwrap();

    let mut changed = input.clone();
    changed.followers = Some(250);
    let second = storage.upsert_social(&changed).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.followers, Some(250));

    let all = storage.find_social(&MetricFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_social_filters_and_ordering() {
    let (storage, _dir) = create_storage().await;

    for (platform, unit, country, date, followers) in [
        (Platform::Facebook, BusinessUnit::Asm, "US", d(2024, 1, 8), 110),
        (Platform::Facebook, BusinessUnit::Asm, "US", d(2024, 1, 1), 100),
        (Platform::Instagram, BusinessUnit::Asm, "UK", d(2024, 1, 1), 40),
        (Platform::Facebook, BusinessUnit::Em, "US", d(2024, 1, 1), 7),
    ] {
        storage
            .upsert_social(&social_input(platform, unit, country, date, followers))
            .await
            .unwrap();
    }

    let asm = storage
        .find_social(&MetricFilter::for_business_unit(Some(BusinessUnit::Asm)))
        .await
        .unwrap();
    assert_eq!(asm.len(), 3);
    let dates: Vec<NaiveDate> = asm.iter().map(|r| r.date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let filter = MetricFilter {
        platform: Some(Platform::Facebook),
        country: Some("US".to_string()),
        ..Default::default()
    }
    .with_range(Some(d(2024, 1, 5)), None);
    let rows = storage.find_social(&filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].followers, Some(110));

    let latest = storage
        .latest_social(&MetricFilter::for_business_unit(Some(BusinessUnit::Asm)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.date, d(2024, 1, 8));
}

#[tokio::test]
async fn test_latest_on_empty_table_is_none() {
    let (storage, _dir) = create_storage().await;
    assert!(
        storage
            .latest_website(&MetricFilter::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_update_and_delete_missing_rows_are_not_found() {
    let (storage, _dir) = create_storage().await;

    let input = WebsiteMetricInput {
        business_unit: BusinessUnit::Iacl,
        country: "DE".to_string(),
        date: d(2024, 2, 5),
        users: Some(10),
        clicks: None,
        sessions: None,
    };
    let err = storage.update_website(9999, &input).await.unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));

    let err = storage.delete_website(9999).await.unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
}

#[tokio::test]
async fn test_website_update_then_delete() {
    let (storage, _dir) = create_storage().await;

    let mut input = WebsiteMetricInput {
        business_unit: BusinessUnit::Iacl,
        country: "DE".to_string(),
        date: d(2024, 2, 5),
        users: Some(10),
        clicks: Some(2),
        sessions: None,
    };
    let created = storage.upsert_website(&input).await.unwrap();

    input.users = Some(42);
    let updated = storage.update_website(created.id, &input).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.users, Some(42));
    assert_eq!(updated.created_at, created.created_at);

    storage.delete_website(created.id).await.unwrap();
    assert!(
        storage
            .find_website(&MetricFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_newsletter_open_rate_is_stored_as_fraction() {
    let (storage, _dir) = create_storage().await;

    let input = NewsletterMetricInput {
        business_unit: BusinessUnit::Em,
        country: "UK".to_string(),
        date: d(2024, 2, 5),
        recipients: Some(1200),
        open_rate: Some(OpenRate::from_fraction(0.35).unwrap()),
        number_of_emails: Some(2),
    };
    let stored = storage.upsert_newsletter(&input).await.unwrap();
    assert_eq!(stored.open_rate.map(|r| r.fraction()), Some(0.35));
    assert!((stored.open_rate_percent().unwrap() - 35.0).abs() < 1e-9);

    let missing_rate = NewsletterMetricInput {
        open_rate: None,
        date: d(2024, 2, 12),
        ..input
    };
    let stored = storage.upsert_newsletter(&missing_rate).await.unwrap();
    assert_eq!(stored.open_rate, None);
}

#[tokio::test]
async fn test_engagement_key_ignores_country() {
    let (storage, _dir) = create_storage().await;

    let input = SocialEngagementMetricInput {
        platform: Platform::Instagram,
        business_unit: BusinessUnit::Asm,
        date: d(2024, 3, 4),
        likes: Some(10),
        comments: Some(1),
        shares: None,
        saves: None,
        clicks: None,
        engagement_rate: Some(2.5),
    };
    let first = storage.upsert_engagement(&input).await.unwrap();
    let second = storage
        .upsert_engagement(&SocialEngagementMetricInput {
            likes: Some(12),
            ..input.clone()
        })
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.likes, Some(12));

    let rows = storage
        .find_engagement(&MetricFilter {
            platform: Some(Platform::Instagram),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_ping_and_close() {
    let (storage, _dir) = create_storage().await;
    assert_eq!(storage.backend_name(), "sqlite");
    storage.ping().await.unwrap();
    storage.close().await.unwrap();
}
