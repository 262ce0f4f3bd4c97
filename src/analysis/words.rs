use std::{collections::HashMap, num::NonZeroUsize};

use serde::Serialize;

pub const DEFAULT_WORD_LIMIT: NonZeroUsize = match NonZeroUsize::new(30) {
    Some(v) => v,
    None => unreachable!(),
};

/// Tokens no longer than this are ignored.
const MAX_SHORT_WORD_CHARS: usize = 2;

pub const STOPWORDS: [&str; 64] = [
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "with", "about", "of",
    "by", "is", "was", "were", "am", "are", "been", "being", "be", "i", "you", "he", "she", "it",
    "we", "they", "my", "your", "his", "her", "its", "our", "their", "this", "that", "these",
    "those", "do", "does", "did", "doing", "done", "have", "has", "had", "having", "can", "could",
    "will", "would", "shall", "should", "may", "might", "must", "very", "too", "so", "quite",
    "rather",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedWord {
    pub text: String,
    /// Number of occurrences over all descriptions.
    pub value: usize,
}

/// Keywords of a single text: lowercased, punctuation stripped, short words and stopwords
/// removed.
pub fn keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|token| {
            token
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| word.chars().count() > MAX_SHORT_WORD_CHARS)
        .filter(|word| !STOPWORDS.contains(&word.as_str()))
}

/// Most frequent keywords over all `descriptions`. Equal counts keep the order in which the
/// words first appeared.
pub fn top_words<S: AsRef<str>>(descriptions: &[S], limit: NonZeroUsize) -> Vec<DerivedWord> {
    let mut positions = HashMap::<String, usize>::new();
    let mut words = Vec::<DerivedWord>::new();

    for word in descriptions.iter().flat_map(|v| keywords(v.as_ref())) {
        match positions.get(&word) {
            Some(&i) => words[i].value += 1,
            None => {
                positions.insert(word.clone(), words.len());
                words.push(DerivedWord {
                    text: word,
                    value: 1,
                });
            }
        }
    }

    words.sort_by(|a, b| b.value.cmp(&a.value));
    words.truncate(limit.get());
    words
}
