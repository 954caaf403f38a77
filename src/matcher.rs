//! Approximate ingredient matching by Levenshtein edit distance.

/// Inputs shorter than this (in characters) never produce suggestions
pub const MIN_QUERY_CHARS: usize = 2;

/// Largest edit distance still considered a likely typo
pub const MAX_DISTANCE: usize = 3;

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 3;

/// Minimum number of single-character insertions, deletions or substitutions
/// turning `a` into `b`, computed over Unicode scalar values.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // grid[i][j] is the distance between the first i chars of a and the first j chars of b
    let mut grid = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in grid.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in grid[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            grid[i][j] = (grid[i - 1][j] + 1)
                .min(grid[i][j - 1] + 1)
                .min(grid[i - 1][j - 1] + substitution);
        }
    }

    grid[a.len()][b.len()]
}

/// Vocabulary entries within a few edits of `query`, closest first.
///
/// Exact matches are excluded; callers handle those as direct matches before
/// falling back to this. Ties keep vocabulary order.
pub fn find_similar_ingredients<S: AsRef<str>>(query: &str, vocabulary: &[S]) -> Vec<String> {
    let query = query.to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut candidates: Vec<(usize, &str)> = vocabulary
        .iter()
        .map(|entry| entry.as_ref())
        .map(|entry| (levenshtein_distance(&query, &entry.to_lowercase()), entry))
        .filter(|(distance, _)| *distance > 0 && *distance <= MAX_DISTANCE)
        .collect();

    // sort_by_key is stable, so equal distances stay in vocabulary order
    candidates.sort_by_key(|(distance, _)| *distance);

    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, entry)| entry.to_string())
        .collect()
}
