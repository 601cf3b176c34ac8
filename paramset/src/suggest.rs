//! Close-name suggestions for unknown parameters.

const MAX_SUGGESTIONS: usize = 3;

/// Levenshtein distance between two strings, by characters.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Names from `candidates` close to `name`, closest first.
pub(crate) fn close_names<'a>(name: &str, candidates: impl Iterator<Item = &'a String>) -> Vec<String> {
    let limit = (name.chars().count() / 3).max(1);
    let mut scored: Vec<(usize, &String)> = candidates
        .map(|c| (edit_distance(name, c), c))
        .filter(|(d, _)| *d <= limit)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("abc", "abd"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "xyz"), 3);
    }

    #[test]
    fn test_close_names_ordered_and_limited() {
        let names: Vec<String> = ["verbose", "version", "verbosity", "quiet"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let found = close_names("verbos", names.iter());
        assert_eq!(found, vec!["verbose".to_string(), "version".to_string()]);
        assert!(close_names("zzzz", names.iter()).is_empty());
    }
}
