// TF-IDF term vectors over a two-document corpus, compared by cosine.
//
// Weighting follows the usual smoothed form:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1,   weight = count(t) * idf(t)
//
// with n = 2. A term present in both reports gets idf 1.0; a term unique to
// one report gets 1 + ln(1.5), so distinctive vocabulary pulls the vectors
// apart. Vectors are keyed in sorted term order, which makes the dot product
// independent of which report is passed first.
//
// A side with no surviving terms has zero norm. `cosine` reports that as
// `ZeroNorm` rather than scoring 0.0, and the text scorer falls back to
// sequence matching on the raw text.

use std::collections::BTreeMap;

use crate::error::VectorizeError;

/// Sparse term -> weight vector.
pub type TermVector = BTreeMap<String, f64>;

/// Raw term counts for one token stream.
pub fn term_counts(tokens: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Build TF-IDF vectors for exactly two token streams.
///
/// Fails when the shared vocabulary is empty (nothing survived
/// tokenization), which callers treat as a signal to fall back.
pub fn vectorize_pair(
    tokens_a: &[String],
    tokens_b: &[String],
) -> Result<(TermVector, TermVector), VectorizeError> {
    let counts_a = term_counts(tokens_a);
    let counts_b = term_counts(tokens_b);

    if counts_a.is_empty() && counts_b.is_empty() {
        return Err(VectorizeError::EmptyVocabulary);
    }

    let n_docs = 2.0_f64;
    let idf = |term: &str| {
        let df = counts_a.contains_key(term) as u8 + counts_b.contains_key(term) as u8;
        ((1.0 + n_docs) / (1.0 + f64::from(df))).ln() + 1.0
    };

    let weigh = |counts: &BTreeMap<String, usize>| -> TermVector {
        counts
            .iter()
            .map(|(term, &count)| (term.clone(), count as f64 * idf(term)))
            .collect()
    };

    Ok((weigh(&counts_a), weigh(&counts_b)))
}

/// Cosine similarity of two sparse vectors, clamped to [0, 1].
pub fn cosine(a: &TermVector, b: &TermVector) -> Result<f64, VectorizeError> {
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a < f64::EPSILON || norm_b < f64::EPSILON {
        return Err(VectorizeError::ZeroNorm);
    }

    // Walk the smaller map; BTreeMap iteration is in term order.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, wa)| large.get(term).map(|wb| wa * wb))
        .sum();

    let (lo, hi) = if norm_a <= norm_b { (norm_a, norm_b) } else { (norm_b, norm_a) };
    Ok((dot / (lo * hi)).clamp(0.0, 1.0))
}
