//! Plain-text rendering for content listings and the summary snapshot.

use std::collections::BTreeSet;

use vca_core::{ContentItem, SummaryStats};

const TITLE_WIDTH: usize = 50;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_owned()
    }
}

/// Prints one row per item plus an engagement/tag line beneath it. Saved
/// items are starred.
pub(crate) fn print_items(items: &[ContentItem], saved: &BTreeSet<String>) {
    if items.is_empty() {
        println!("No content found. Try adjusting your filters or refresh the content.");
        return;
    }

    println!("{:<2}{:<14}{:<9}{:<7}TITLE", "", "ID", "PLATFORM", "SCORE");
    for item in items {
        let marker = if saved.contains(&item.id) { "*" } else { "" };
        println!(
            "{:<2}{:<14}{:<9}{:<7.1}{}",
            marker,
            truncate(&item.id, 12),
            item.platform,
            item.viral_score,
            truncate(&item.title, TITLE_WIDTH)
        );

        let mut detail = item.engagement_metrics.summary(item.platform);
        let tags = item.display_tags();
        if !tags.is_empty() {
            detail.push_str(" | #");
            detail.push_str(&tags.join(" #"));
        }
        println!("{:<32}{detail}", "");
    }
}

pub(crate) fn print_stats(stats: &SummaryStats) {
    println!(
        "{} items | {} analyses | {} briefs",
        stats.total_content, stats.total_analyses, stats.total_briefs
    );
    let distribution: Vec<String> = stats
        .platform_distribution
        .iter()
        .map(|(platform, count)| format!("{platform}: {count}"))
        .collect();
    if !distribution.is_empty() {
        println!("{}", distribution.join(", "));
    }
}
