/// Request-scoped TF-IDF vector space
///
/// The vocabulary is fitted over one request's candidate documents and
/// discarded afterwards; nothing is cached between requests.
///
/// - Tokens: lowercase runs of two or more word characters, English stop
///   words removed. Fit and transform share the same tokenizer.
/// - IDF: smooth, `ln((1 + n) / (1 + df)) + 1`
/// - Vectors: raw term counts × idf, L2-normalised
mod stop_words;

pub use stop_words::{is_stop_word, ENGLISH_STOP_WORDS};

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Token regex pattern is valid"));

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Sparse vector keyed by vocabulary index; ordered so sums are reproducible
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: BTreeMap<usize, f64>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.weights.values().all(|w| *w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(idx, w)| large.weights.get(idx).map(|o| w * o))
            .sum()
    }
}

/// Cosine similarity of non-negative vectors, in [0, 1].
/// A zero vector is orthogonal to everything.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let n_docs = documents.len() as f64;
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for doc in documents {
            let mut tokens = tokenize(doc.as_ref());
            tokens.sort_unstable();
            tokens.dedup();
            for token in tokens {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                doc_freq[idx] += 1;
            }
        }

        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Embed `text` in the fitted space; unknown terms are ignored
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *weights.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in weights.iter_mut() {
            *weight *= self.idf[*idx];
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in weights.values_mut() {
                *weight /= norm;
            }
        }
        SparseVector { weights }
    }
}

/// Fit a space over `documents` and score `query` against each of them.
///
/// Returns one similarity per document, all zero when the query or the
/// documents carry no usable terms.
pub fn score_against<S: AsRef<str>>(query: &str, documents: &[S]) -> Vec<f64> {
    if documents.is_empty() {
        return Vec::new();
    }
    let vectorizer = TfidfVectorizer::fit(documents);
    if vectorizer.is_empty() {
        return vec![0.0; documents.len()];
    }
    let query_vec = vectorizer.transform(query);
    if query_vec.is_zero() {
        return vec![0.0; documents.len()];
    }
    documents
        .iter()
        .map(|doc| cosine_similarity(&query_vec, &vectorizer.transform(doc.as_ref())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_stop_words() {
        assert_eq!(
            tokenize("North Indian, Chinese and Fast Food"),
            vec!["north", "indian", "chinese", "fast", "food"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("B & Q Pizza"), vec!["pizza"]);
    }

    #[test]
    fn test_idf_smoothing() {
        let vectorizer = TfidfVectorizer::fit(&["italian pizza", "italian pasta"]);
        assert_eq!(vectorizer.vocabulary_size(), 3);

        let italian = vectorizer.vocabulary["italian"];
        let pizza = vectorizer.vocabulary["pizza"];
        // df = n -> idf = 1
        assert!((vectorizer.idf[italian] - 1.0).abs() < 1e-12);
        // df = 1, n = 2 -> ln(3/2) + 1
        assert!((vectorizer.idf[pizza] - ((1.5f64).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_unit_length() {
        let vectorizer = TfidfVectorizer::fit(&["italian pizza", "chinese noodles"]);
        let v = vectorizer.transform("italian pizza pizza");
        assert!((v.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let vectorizer = TfidfVectorizer::fit(&["italian"]);
        assert!(vectorizer.transform("mexican").is_zero());
    }

    #[test]
    fn test_score_against_exact_match_first() {
        let scores = score_against("Italian", &["Italian", "Vegan, Salads"]);
        assert!((scores[0] - 1.0).abs() < 1e-9);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let docs = [
            "North Indian, Mughlai",
            "Chinese, Thai",
            "Italian, Pizza, Cafe",
            "North Indian, Chinese",
        ];
        for score in score_against("North Indian Chinese Pizza", &docs) {
            assert!((0.0..=1.0).contains(&score), "score {}", score);
        }
    }

    #[test]
    fn test_empty_inputs_short_circuit() {
        let empty: [&str; 0] = [];
        assert!(score_against("Italian", &empty).is_empty());
        assert_eq!(score_against("the and", &["Italian", "Cafe"]), vec![0.0, 0.0]);
        assert_eq!(score_against("Italian", &["the", "and"]), vec![0.0, 0.0]);
    }
}
