//! 领域模型
//!
//! 四类周指标记录及其维度类型。记录中的度量字段均为 `Option`：
//! `None` 表示"未采集"，只有在聚合时才按 0 处理。

mod dimensions;
mod open_rate;
mod records;

pub use dimensions::{BusinessUnit, GLOBAL_COUNTRY, Platform, normalize_country};
pub use open_rate::OpenRate;
pub use records::{
    NewsletterMetric, NewsletterMetricInput, NewsletterMetricView, SocialEngagementMetric,
    SocialEngagementMetricInput, SocialMetric, SocialMetricInput, WebsiteMetric,
    WebsiteMetricInput,
};

/// TypeScript 类型导出路径（供 React 看板使用）
pub const TS_EXPORT_PATH: &str = "../dashboard/src/services/types.generated.ts";
