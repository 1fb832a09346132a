//! Terminal rendering of search results.

use colored::Colorize;
use seeker_core::result::{Competitor, HotKeyBucket, SearchResult};
use seeker_core::session::{SessionOutcome, SessionReport};

pub fn competitor_line(index: usize, competitor: &Competitor) -> String {
    let mut line = format!("{:>2}. {}", index + 1, competitor.name.bold());
    if let Some(score) = competitor.relevance_score {
        line.push_str(&format!(" ({:.0}%)", score));
    }
    if !competitor.slogan.is_empty() {
        line.push_str(&format!(" - {}", competitor.slogan.italic()));
    }
    line
}

fn list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("      {}: {}", label.dimmed(), items.join(", "));
    }
}

fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("      {}: {}", label.dimmed(), value);
    }
}

/// Prints every populated section of `result`.
pub fn print_result(result: &SearchResult) {
    if !result.logic_steps.is_empty() {
        println!("{}", "Analysis".cyan().bold());
        for step in &result.logic_steps {
            println!("  ▸ {}", step.title);
            if !step.description.is_empty() {
                println!("    {}", step.description.dimmed());
            }
        }
    }

    if result.competitor_count() > 0 {
        println!("{}", "Main competitors".cyan().bold());
        for (index, competitor) in result.competitors.iter().enumerate() {
            let Some(competitor) = competitor else {
                continue;
            };
            println!("  {}", competitor_line(index, competitor));
            field("target users", &competitor.target_users);
            field("traffic", &competitor.traffic);
            field("revenue model", &competitor.revenue_model);
            list("key features", &competitor.key_features);
            list("pain points", &competitor.pain_points);
            list("weaknesses", &competitor.weaknesses);
        }
    }

    let buckets = [
        (HotKeyBucket::MostRelevant, "most relevant"),
        (HotKeyBucket::AllInSeeker, "all in seeker"),
        (HotKeyBucket::AllFields, "all fields"),
    ];
    if buckets
        .iter()
        .any(|(bucket, _)| !result.hot_keys_data.bucket(*bucket).is_empty())
    {
        println!("{}", "Hot keys".cyan().bold());
        for (bucket, label) in buckets {
            let keys = result.hot_keys_data.bucket(bucket);
            if keys.is_empty() {
                continue;
            }
            let rendered: Vec<String> = keys
                .iter()
                .map(|key| format!("{} ({}, {})", key.tag, key.search_count, key.trend))
                .collect();
            println!("  {}: {}", label.dimmed(), rendered.join(", "));
        }
    }

    if let Some(card) = &result.requirement_card {
        println!("{}", "Requirement card".cyan().bold());
        field("slogan", &card.slogan);
        field("user story", &card.user_story);
        field("target user", &card.target_user);
        field("pain points", &card.pain_points);
        list("unique selling points", &card.unique_selling_points);
        field("revenue model", &card.revenue_model);
    }

    if !result.function_list.is_empty() {
        println!("{}", "Function list".cyan().bold());
        for entry in &result.function_list {
            println!("  {}", entry.priority_type.to_string().yellow());
            for (module, features) in &entry.content {
                println!("    {}: {}", module, features.join(", "));
            }
        }
    }

    if !result.figures.is_empty() {
        println!(
            "{} {} (use `seeker show <id> --figures <dir>` to export)",
            "Figures:".cyan().bold(),
            result.figures.len()
        );
    }
}

pub fn outcome_label(outcome: &SessionOutcome) -> String {
    match outcome {
        SessionOutcome::Completed => "completed".green().to_string(),
        SessionOutcome::TimedOut => "completed (stream went quiet)".green().to_string(),
        SessionOutcome::Errored { message } => format!("{}: {}", "failed".red(), message),
        SessionOutcome::Aborted => "aborted".yellow().to_string(),
    }
}

pub fn print_summary(report: &SessionReport) {
    println!(
        "{} {} [{}] {} events, {} dropped",
        "Search".bold(),
        report.search_id,
        outcome_label(&report.outcome),
        report.events_processed,
        report.events_dropped
    );
}
