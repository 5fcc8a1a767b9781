//! Seed command - 从 JSON 文件批量写入指标

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use serde::Deserialize;

use crate::interfaces::cli::CliError;
use crate::model::{
    NewsletterMetricInput, SocialEngagementMetricInput, SocialMetricInput, WebsiteMetricInput,
};
use crate::services::{MetricInput, MetricService};
use crate::storage::SeaOrmStorage;

/// Seed 文件结构，缺省的数组视为空
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedDocument {
    pub social: Vec<SocialMetricInput>,
    pub website: Vec<WebsiteMetricInput>,
    pub newsletter: Vec<NewsletterMetricInput>,
    pub engagement: Vec<SocialEngagementMetricInput>,
}

impl SeedDocument {
    pub fn len(&self) -> usize {
        self.social.len() + self.website.len() + self.newsletter.len() + self.engagement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inputs(self) -> Vec<MetricInput> {
        let mut inputs = Vec::with_capacity(self.len());
        inputs.extend(self.social.into_iter().map(MetricInput::Social));
        inputs.extend(self.website.into_iter().map(MetricInput::Website));
        inputs.extend(self.newsletter.into_iter().map(MetricInput::Newsletter));
        inputs.extend(self.engagement.into_iter().map(MetricInput::Engagement));
        inputs
    }
}

fn read_seed_file(path: &Path) -> Result<SeedDocument, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::CommandError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Upsert every record in the seed file
pub async fn seed_metrics(storage: Arc<SeaOrmStorage>, file: String) -> Result<(), CliError> {
    let document = read_seed_file(Path::new(&file))?;
    if document.is_empty() {
        println!("{} {}", "No records found in".yellow(), file.blue());
        return Ok(());
    }

    println!(
        "{} {} social, {} website, {} newsletter, {} engagement",
        "Seeding".bold().green(),
        document.social.len(),
        document.website.len(),
        document.newsletter.len(),
        document.engagement.len()
    );

    let service = MetricService::new(storage);
    let written = service.upsert_all(document.into_inputs()).await?;

    println!("{} {} records upserted", "✓".bold().green(), written);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seed_document_missing_sections_default_to_empty() {
        let doc: SeedDocument = serde_json::from_str(
            r#"{"website":[{"businessUnit":"ASM","country":"US","date":"2024-01-01","users":10}]}"#,
        )
        .unwrap();
        assert!(doc.social.is_empty());
        assert_eq!(doc.len(), 1);

        let inputs = doc.into_inputs();
        assert!(matches!(inputs[0], MetricInput::Website(_)));
    }

    #[tokio::test]
    async fn test_seed_file_is_upserted() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let url = format!("sqlite://{}", db_path.display());
        let storage = Arc::new(SeaOrmStorage::new(&url, "sqlite").await.unwrap());

        let seed_path = dir.path().join("seed.json");
        let mut file = std::fs::File::create(&seed_path).unwrap();
        write!(
            file,
            r#"{{
                "social": [
                    {{"platform":"FACEBOOK","businessUnit":"ASM","country":"us","date":"2024-01-01","followers":100}},
                    {{"platform":"FACEBOOK","businessUnit":"ASM","country":"US","date":"2024-01-01","followers":120}}
                ],
                "newsletter": [
                    {{"businessUnit":"EM","country":"UK","date":"2024-01-01","recipients":50,"openRate":0.4}}
                ]
            }}"#
        )
        .unwrap();

        seed_metrics(storage.clone(), seed_path.to_string_lossy().to_string())
            .await
            .unwrap();

        let social = storage
            .find_social(&crate::storage::MetricFilter::default())
            .await
            .unwrap();
        assert_eq!(social.len(), 1);
        assert_eq!(social[0].followers, Some(120));
    }

    #[tokio::test]
    async fn test_invalid_seed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let url = format!("sqlite://{}", db_path.display());
        let storage = Arc::new(SeaOrmStorage::new(&url, "sqlite").await.unwrap());

        let seed_path = dir.path().join("broken.json");
        std::fs::write(&seed_path, "{ not json").unwrap();

        let err = seed_metrics(storage, seed_path.to_string_lossy().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::ParseError(_)));
    }
}
