use std::collections::{HashMap, HashSet};

use crate::config::AnalyticsConfig;
use crate::models::{SourceResponse, TextResponse, WordCount};
use crate::text;

/// Ranks significant words across `responses`.
///
/// Every occurrence counts towards a word's frequency, but a response is listed at most
/// once among the word's examples.
pub fn word_frequency(responses: &[TextResponse], config: &AnalyticsConfig) -> Vec<WordCount> {
    let mut counts: HashMap<String, WordCount> = HashMap::new();

    for response in responses {
        let mut credited: HashSet<String> = HashSet::new();

        for word in text::extract_words(&response.text) {
            let entry = counts.entry(word.clone()).or_insert_with(|| WordCount {
                word: word.clone(),
                count: 0,
                source_responses: Vec::new(),
            });
            entry.count += 1;

            if entry.source_responses.len() < config.word_examples && credited.insert(word) {
                entry.source_responses.push(SourceResponse {
                    text: response.text.clone(),
                    submitted_at: response.submitted_at,
                });
            }
        }
    }

    let mut words: Vec<WordCount> = counts.into_values().collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(config.word_limit);
    words
}
