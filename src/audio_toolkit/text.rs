use natural::phonetics::soundex;
use std::collections::HashMap;
use strsim::levenshtein;

/// Words longer than this are never matched against the custom vocabulary.
const MAX_CORRECTABLE_WORD: usize = 40;

/// Splits a text into normalized tokens.
///
/// Normalization lower-cases the input, replaces every character outside
/// letters/digits/whitespace with a space, splits on whitespace and drops
/// empty tokens. Letters are Unicode-aware (the question corpus mixes
/// Russian and English).
pub fn tokenize(text: &str) -> Vec<String> {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lc in c.to_lowercase() {
                normalized.push(lc);
            }
        } else {
            normalized.push(' ');
        }
    }
    normalized.split_whitespace().map(str::to_owned).collect()
}

/// Sparse count of normalized tokens in a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector(HashMap<String, u64>);

impl TermVector {
    pub fn from_text(text: &str) -> Self {
        let mut counts = HashMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        TermVector(counts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cosine similarity against another term vector.
    ///
    /// Accumulates the dot product and squared norms in exact integer
    /// arithmetic and takes a single square root at the end, so identical
    /// token multisets score exactly 1.0 and the result is exactly
    /// symmetric. Returns 0.0 when either vector is empty.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let mut dot: u64 = 0;
        let mut norm_a: u64 = 0;
        let mut norm_b: u64 = 0;

        for (term, &count) in &self.0 {
            norm_a += count * count;
            if let Some(&other_count) = other.0.get(term) {
                dot += count * other_count;
            }
        }
        for &count in other.0.values() {
            norm_b += count * count;
        }

        if norm_a == 0 || norm_b == 0 {
            return 0.0;
        }
        ((dot as f64 * dot as f64) / (norm_a as f64 * norm_b as f64)).sqrt()
    }
}

/// Lexical similarity of two texts in `[0.0, 1.0]`.
///
/// Deterministic and pure: tokenizes both sides per [`tokenize`] and
/// computes the cosine similarity of their term vectors. Either side
/// contributing no tokens yields exactly 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    TermVector::from_text(a).cosine(&TermVector::from_text(b))
}

/// Corrects recognized words against a custom vocabulary using fuzzy matching.
///
/// Best-effort transcripts tend to mangle technical interview vocabulary.
/// Each word of `text` is compared to every vocabulary entry by normalized
/// Levenshtein distance, with a phonetic (Soundex) boost for ASCII words,
/// and replaced by the best match scoring under `threshold`. The original
/// case pattern and surrounding punctuation are preserved.
///
/// # Arguments
/// * `text` - The transcript to correct
/// * `vocabulary` - Custom words to match against; empty is a strict no-op
/// * `threshold` - Maximum combined score to accept (0.0 = exact only)
pub fn correct_vocabulary(text: &str, vocabulary: &[String], threshold: f64) -> String {
    if vocabulary.is_empty() {
        return text.to_string();
    }

    let vocabulary_lower: Vec<String> = vocabulary.iter().map(|w| w.to_lowercase()).collect();

    let mut corrected: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let (prefix, core, suffix) = split_affixes(word);
        let core_lower = core.to_lowercase();

        if core_lower.is_empty() || core_lower.chars().count() > MAX_CORRECTABLE_WORD {
            corrected.push(word.to_string());
            continue;
        }

        match best_vocabulary_match(&core_lower, vocabulary, &vocabulary_lower, threshold) {
            Some(replacement) => {
                let recased = match_case(core, replacement);
                corrected.push(format!("{}{}{}", prefix, recased, suffix));
            }
            None => corrected.push(word.to_string()),
        }
    }

    corrected.join(" ")
}

/// Finds the vocabulary entry closest to `word`, if any scores under `threshold`.
fn best_vocabulary_match<'a>(
    word: &str,
    vocabulary: &'a [String],
    vocabulary_lower: &[String],
    threshold: f64,
) -> Option<&'a String> {
    let word_len = word.chars().count();
    let mut best: Option<&String> = None;
    let mut best_score = f64::MAX;

    for (i, candidate) in vocabulary_lower.iter().enumerate() {
        let candidate_len = candidate.chars().count();
        if word_len.abs_diff(candidate_len) > 4 {
            continue;
        }

        let max_len = word_len.max(candidate_len);
        if max_len == 0 {
            continue;
        }
        let edit_score = levenshtein(word, candidate) as f64 / max_len as f64;

        // Soundex is ASCII-only; Cyrillic words fall back to plain edit distance.
        let score = if word.is_ascii() && candidate.is_ascii() && soundex(word, candidate) {
            edit_score * 0.3
        } else {
            edit_score
        };

        if score < threshold && score < best_score {
            best = Some(&vocabulary[i]);
            best_score = score;
        }
    }

    best
}

/// Splits a word into (leading punctuation, core, trailing punctuation).
fn split_affixes(word: &str) -> (&str, &str, &str) {
    let Some(start) = word
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, _)| i)
    else {
        return (word, "", "");
    };
    let end = word
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(word.len());
    (&word[..start], &word[start..end], &word[end..])
}

/// Applies the case pattern of `original` to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    let has_letters = original.chars().any(char::is_alphabetic);
    if has_letters && original.chars().all(|c| !c.is_lowercase()) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_is_symmetric() {
        let pairs = [
            ("recursion calls itself", "a function calling itself"),
            ("hello world", "world"),
            ("", "nonempty"),
            ("стек и куча", "куча"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn identical_texts_score_exactly_one() {
        assert_eq!(similarity("a", "a"), 1.0);
        assert_eq!(
            similarity("recursion calls itself", "recursion calls itself"),
            1.0
        );
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("anything", ""), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        // Punctuation-only input contributes no tokens.
        assert_eq!(similarity("?!...", "anything"), 0.0);
    }

    #[test]
    fn tokenization_is_case_insensitive() {
        assert_eq!(similarity("Hello World", "hello world"), 1.0);
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(similarity("hello, world!", "hello world"), 1.0);
        assert_eq!(tokenize("don't"), vec!["don", "t"]);
    }

    #[test]
    fn proportional_repetition_keeps_score() {
        assert_eq!(similarity("a a b b", "a b"), 1.0);
    }

    #[test]
    fn cyrillic_tokens_survive_normalization() {
        assert_eq!(
            tokenize("Рекурсия вызывает себя"),
            vec!["рекурсия", "вызывает", "себя"]
        );
        assert_eq!(similarity("Рекурсия", "рекурсия!"), 1.0);
    }

    #[test]
    fn disjoint_texts_score_zero() {
        assert_eq!(similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let score = similarity("recursion calls itself", "recursion");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn empty_vocabulary_is_noop() {
        assert_eq!(correct_vocabulary("helo wrold", &[], 0.5), "helo wrold");
    }

    #[test]
    fn exact_vocabulary_match_takes_canonical_casing() {
        let vocab = vec!["Kubernetes".to_string()];
        assert_eq!(
            correct_vocabulary("kubernetes is neat", &vocab, 0.5),
            "Kubernetes is neat"
        );
    }

    #[test]
    fn fuzzy_vocabulary_match() {
        let vocab = vec!["recursion".to_string(), "iterator".to_string()];
        assert_eq!(
            correct_vocabulary("recursian calls itself", &vocab, 0.5),
            "recursion calls itself"
        );
    }

    #[test]
    fn vocabulary_match_preserves_case_and_punctuation() {
        let vocab = vec!["recursion".to_string()];
        assert_eq!(
            correct_vocabulary("Recursian, obviously.", &vocab, 0.5),
            "Recursion, obviously."
        );
    }

    #[test]
    fn split_affixes_handles_edges() {
        assert_eq!(split_affixes("hello"), ("", "hello", ""));
        assert_eq!(split_affixes("!hello?"), ("!", "hello", "?"));
        assert_eq!(split_affixes("..."), ("...", "", ""));
    }
}
