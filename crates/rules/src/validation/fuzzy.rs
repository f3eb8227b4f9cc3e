//! Identifier helpers for validation: kebab-case ids and "did you mean"
//! suggestions for mistyped rule kinds.

/// Suggest the closest candidate by edit distance, or `None` when nothing is
/// within half the length of the longer string.
pub(crate) fn closest<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .iter()
        .map(|&c| (c, edit_distance(&needle, &c.to_lowercase())))
        .min_by_key(|(_, d)| *d)
        .filter(|(c, d)| *d <= input.len().max(c.len()) / 2)
        .map(|(c, _)| c)
}

/// Levenshtein distance over chars with a single rolling row.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != *cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[b.len()]
}

/// Lowercase alphanumerics separated by single hyphens.
pub(crate) fn is_kebab_case(s: &str) -> bool {
    !s.is_empty()
        && s.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn closest_finds_typo() {
        let kinds = ["FatigueConfig", "Playbook", "ClusterConfig"];
        assert_eq!(closest("FatigeConfig", &kinds), Some("FatigueConfig"));
        assert_eq!(closest("playbok", &kinds), Some("Playbook"));
        assert_eq!(closest("zzzzzzzzzz", &kinds), None);
    }

    #[test]
    fn kebab_case_rules() {
        assert!(is_kebab_case("fatigue-default"));
        assert!(is_kebab_case("playbook-2"));
        assert!(!is_kebab_case("Fatigue"));
        assert!(!is_kebab_case("-lead"));
        assert!(!is_kebab_case("double--hyphen"));
        assert!(!is_kebab_case("trail-"));
        assert!(!is_kebab_case(""));
    }
}
