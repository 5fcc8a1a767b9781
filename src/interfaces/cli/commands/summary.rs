//! Summary command - 在终端输出看板总览

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::model::BusinessUnit;
use crate::rollup::GrowthFigure;
use crate::services::{DashboardOverview, DashboardService, OverviewFigure};
use crate::storage::{MetricFilter, SeaOrmStorage};

fn parse_business_unit(raw: Option<String>) -> Result<Option<BusinessUnit>, CliError> {
    raw.map(|b| {
        BusinessUnit::from_str(&b)
            .map_err(|_| CliError::ParseError(format!("Unknown business unit: {}", b)))
    })
    .transpose()
}

fn parse_as_of(raw: Option<String>) -> Result<NaiveDate, CliError> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            CliError::ParseError(format!("Invalid as_of: '{}'. Expected YYYY-MM-DD", s))
        }),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

fn format_growth(growth: &GrowthFigure) -> String {
    if !growth.has_baseline {
        return "n/a".dimmed().to_string();
    }
    let text = format!("{:+.1}%", growth.growth);
    if growth.growth >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

fn print_figure(label: &str, figure: &OverviewFigure) {
    println!(
        "  {:<22} {:>12}   {}",
        label.cyan(),
        figure.latest.total,
        format_growth(&figure.growth)
    );
}

fn print_overview(overview: &DashboardOverview, business_unit: Option<BusinessUnit>) {
    let scope = business_unit
        .map(|b| b.to_string())
        .unwrap_or_else(|| "all business units".to_string());
    println!("{} ({})", "Dashboard Overview".bold().green(), scope);
    println!(
        "  {} {} vs {}",
        "Growth period:".dimmed(),
        overview.periods.current.start.format("%b %Y"),
        overview.periods.previous.start.format("%b %Y")
    );

    print_figure("Followers", &overview.followers);
    print_figure("Posts", &overview.posts);
    print_figure("Impressions", &overview.impressions);
    print_figure("Website users", &overview.website_users);
    print_figure("Newsletter recipients", &overview.newsletter_recipients);

    match overview.average_open_rate_percent {
        Some(percent) => println!("  {:<22} {:>11.1}%", "Avg open rate".cyan(), percent),
        None => println!("  {:<22} {:>12}", "Avg open rate".cyan(), "n/a".dimmed()),
    }

    let engagement = &overview.engagement;
    match engagement.date {
        Some(date) => {
            println!("{} (week of {})", "Engagement".bold().green(), date);
            println!(
                "  likes {}  comments {}  shares {}  saves {}  clicks {}",
                engagement.likes,
                engagement.comments,
                engagement.shares,
                engagement.saves,
                engagement.clicks
            );
        }
        None => println!("{} {}", "Engagement".bold().green(), "no data".dimmed()),
    }
}

/// Print the dashboard overview
pub async fn show_summary(
    storage: Arc<SeaOrmStorage>,
    business_unit: Option<String>,
    as_of: Option<String>,
) -> Result<(), CliError> {
    let business_unit = parse_business_unit(business_unit)?;
    let today = parse_as_of(as_of)?;

    let service = DashboardService::new(storage);
    let overview = service
        .overview(&MetricFilter::for_business_unit(business_unit), today)
        .await?;

    print_overview(&overview, business_unit);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_business_unit() {
        assert_eq!(
            parse_business_unit(Some("asm".to_string())).unwrap(),
            Some(BusinessUnit::Asm)
        );
        assert_eq!(parse_business_unit(None).unwrap(), None);
        assert!(matches!(
            parse_business_unit(Some("XYZ".to_string())),
            Err(CliError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_as_of() {
        assert_eq!(
            parse_as_of(Some("2024-03-31".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(parse_as_of(Some("31/03/2024".to_string())).is_err());
    }

    #[test]
    fn test_growth_without_baseline_is_not_a_number() {
        let figure = GrowthFigure {
            current: 10,
            previous: 0,
            growth: 0.0,
            has_baseline: false,
        };
        assert!(format_growth(&figure).contains("n/a"));
    }
}
