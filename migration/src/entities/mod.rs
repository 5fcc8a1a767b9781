pub mod newsletter_metric;
pub mod social_engagement_metric;
pub mod social_metric;
pub mod website_metric;

pub use newsletter_metric::Entity as NewsletterMetricEntity;
pub use social_engagement_metric::Entity as SocialEngagementMetricEntity;
pub use social_metric::Entity as SocialMetricEntity;
pub use website_metric::Entity as WebsiteMetricEntity;
