//! Inclusive keyword clustering of free text into themes.
//!
//! A response is credited to every theme whose keyword stems it contains. Responses
//! that match nothing land in the catch-all theme [`CATCH_ALL`].

use std::collections::HashSet;

use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::models::{AnalysisContext, TaskOutcome, TextResponse, Theme, ThemeStat};
use crate::text;

pub const CATCH_ALL: &str = "Annet";
const CATCH_ALL_ID: &str = "annet";
const CATCH_ALL_COLOR: &str = "#A0A0A0";

/// Which themes may cluster a given kind of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePool {
    /// Blocker text: only `BLOCKER` themes.
    Blocker,
    /// Task and general feedback text: every non-`BLOCKER` theme.
    General,
}

pub fn pool(themes: &[Theme], pool: ThemePool) -> Vec<&Theme> {
    themes
        .iter()
        .filter(|theme| {
            let is_blocker = theme.analysis_context == AnalysisContext::Blocker;
            match pool {
                ThemePool::Blocker => is_blocker,
                ThemePool::General => !is_blocker,
            }
        })
        .collect()
}

#[derive(Default)]
struct Tally {
    count: usize,
    examples: Vec<String>,
    rated: usize,
    success: usize,
    partial: usize,
}

impl Tally {
    fn credit(&mut self, response: &TextResponse, max_examples: usize) {
        self.count += 1;
        if self.examples.len() < max_examples && !self.examples.contains(&response.text) {
            self.examples.push(response.text.clone());
        }
        if let Some(outcome) = response.success {
            self.rated += 1;
            match outcome {
                TaskOutcome::Success => self.success += 1,
                TaskOutcome::Partial => self.partial += 1,
                TaskOutcome::Failure => {}
            }
        }
    }

    fn success_rate(&self) -> Option<f64> {
        if self.rated == 0 || self.count == 0 {
            return None;
        }
        Some((self.success as f64 + 0.5 * self.partial as f64) / self.count as f64)
    }

    fn into_stat(self, theme_id: &str, name: &str, color: &str) -> ThemeStat {
        let success_rate = self.success_rate();
        ThemeStat {
            theme_id: theme_id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            count: self.count,
            examples: self.examples,
            success_rate,
        }
    }
}

struct CompiledTheme<'a> {
    theme: &'a Theme,
    /// One entry per keyword; a keyword matches when all of its stems are present.
    keywords: Vec<Vec<String>>,
}

impl<'a> CompiledTheme<'a> {
    fn new(theme: &'a Theme) -> Self {
        let keywords = theme
            .keywords
            .iter()
            .map(|keyword| {
                text::tokenize(keyword)
                    .iter()
                    .map(|token| text::stem_norwegian(token))
                    .collect::<Vec<_>>()
            })
            .filter(|stems| !stems.is_empty())
            .collect();
        Self { theme, keywords }
    }

    fn matches(&self, stems: &HashSet<String>) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword.iter().all(|stem| stems.contains(stem)))
    }
}

/// Clusters `responses` into `themes`. Only themes with at least one match are returned,
/// sorted by count descending and name ascending, with the catch-all always last.
///
/// When responses carry a success signal, each theme also gets
/// `(success + 0.5 * partial) / count`.
pub fn cluster_by_theme(
    responses: &[TextResponse],
    themes: &[&Theme],
    config: &AnalyticsConfig,
) -> Vec<ThemeStat> {
    let compiled: Vec<CompiledTheme> = themes.iter().copied().map(CompiledTheme::new).collect();
    let mut tallies: Vec<Tally> = compiled.iter().map(|_| Tally::default()).collect();
    let mut catch_all = Tally::default();

    for response in responses {
        let stems = text::stem_set(&response.text);
        let mut matched = false;

        for (theme, tally) in compiled.iter().zip(tallies.iter_mut()) {
            if theme.matches(&stems) {
                tally.credit(response, config.theme_examples);
                matched = true;
            }
        }

        if !matched {
            catch_all.credit(response, config.theme_examples);
        }
    }

    let mut stats: Vec<ThemeStat> = compiled
        .iter()
        .zip(tallies)
        .filter(|(_, tally)| tally.count > 0)
        .map(|(entry, tally)| {
            let theme = entry.theme;
            tally.into_stat(&theme.id, &theme.name, &theme.color)
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    debug!(
        responses = responses.len(),
        themes_matched = stats.len(),
        unmatched = catch_all.count,
        "clustered responses by theme"
    );

    if catch_all.count > 0 {
        stats.push(catch_all.into_stat(CATCH_ALL_ID, CATCH_ALL, CATCH_ALL_COLOR));
    }
    stats
}
