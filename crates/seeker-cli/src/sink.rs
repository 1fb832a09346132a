//! Live terminal view of a streaming session.

use std::collections::HashMap;
use std::sync::Mutex;

use colored::Colorize;
use seeker_core::event::StepTag;
use seeker_core::result::SearchResult;
use seeker_core::session::{LocationMode, Notice, NoticeLevel, SessionReport, SessionSink};

use crate::render;

/// Prints each slice as it arrives.
///
/// Competitor cards are re-announced only when their content changes,
/// since every update hands over the whole aggregate.
#[derive(Default)]
pub struct ConsoleSink {
    printed: Mutex<Printed>,
}

#[derive(Default)]
struct Printed {
    steps: usize,
    competitors: HashMap<usize, String>,
    figures: usize,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSink for ConsoleSink {
    fn on_update(&self, tag: StepTag, result: &SearchResult) {
        let Ok(mut printed) = self.printed.lock() else {
            return;
        };
        match tag {
            StepTag::Step => {
                for step in result.logic_steps.iter().skip(printed.steps) {
                    println!("{} {}", "▸".cyan(), step.title);
                }
                printed.steps = result.logic_steps.len();
            }
            StepTag::MainCompetitors => {
                for (index, competitor) in result.competitors.iter().enumerate() {
                    let Some(competitor) = competitor else {
                        continue;
                    };
                    let line = render::competitor_line(index, competitor);
                    if printed.competitors.get(&index) != Some(&line) {
                        println!("{}", line);
                        printed.competitors.insert(index, line);
                    }
                }
            }
            StepTag::Figure => {
                if result.figures.len() > printed.figures {
                    println!("{} figure {}", "▸".cyan(), result.figures.len());
                    printed.figures = result.figures.len();
                }
            }
            StepTag::HotKeys => println!("{} hot keys updated", "▸".cyan()),
            StepTag::RequirementCard => println!("{} requirement card ready", "▸".cyan()),
            StepTag::FunctionList => println!("{} function list updated", "▸".cyan()),
            StepTag::ChatId | StepTag::Done => {}
        }
    }

    fn notify(&self, notice: Notice) {
        let label = match notice.level {
            NoticeLevel::Info => "info".blue(),
            NoticeLevel::Warning => "warning".yellow(),
            NoticeLevel::Error => "error".red(),
        };
        eprintln!("{}: {}", label.bold(), notice.message);
    }

    fn rewrite_location(&self, search_id: &str, mode: LocationMode) {
        if mode == LocationMode::Final {
            println!("{} {}", "search id:".dimmed(), search_id);
        }
    }

    fn on_finished(&self, report: &SessionReport) {
        render::print_summary(report);
    }
}
