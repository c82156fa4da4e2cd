use crate::state::NameEntry;

#[derive(Debug, PartialEq)]
pub enum SearchResult<'a> {
    /// Blank query: the list falls back to paginated browsing.
    Browse,
    Matches(Vec<&'a NameEntry>),
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_search(raw: &str) -> bool {
    !raw.trim().is_empty()
}

/// Case-insensitive substring filter over the name index. Matches keep the
/// index order; there is no ranking.
pub fn filter<'a>(index: &'a [NameEntry], raw: &str) -> SearchResult<'a> {
    let query = normalize(raw);
    if query.is_empty() {
        return SearchResult::Browse;
    }
    SearchResult::Matches(
        index
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&query))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> Vec<NameEntry> {
        ["bulbasaur", "pikachu", "raichu", "Pichu", "charmander", "pikachu-rock-star"]
            .iter()
            .enumerate()
            .map(|(idx, name)| NameEntry {
                name: name.to_string(),
                id: idx as u32 + 1,
            })
            .collect()
    }

    fn names<'a>(result: &SearchResult<'a>) -> Vec<&'a str> {
        match result {
            SearchResult::Browse => Vec::new(),
            SearchResult::Matches(entries) => {
                entries.iter().map(|entry| entry.name.as_str()).collect()
            }
        }
    }

    #[test]
    fn test_blank_query_browses() {
        let index = index();
        assert_eq!(filter(&index, ""), SearchResult::Browse);
        assert_eq!(filter(&index, "   \t"), SearchResult::Browse);
        assert!(!is_search("  "));
    }

    #[test]
    fn test_matches_keep_index_order() {
        let index = index();
        let result = filter(&index, "chu");
        assert_eq!(
            names(&result),
            vec!["pikachu", "raichu", "Pichu", "pikachu-rock-star"]
        );
    }

    #[test]
    fn test_query_is_trimmed_and_case_insensitive() {
        let index = index();
        assert_eq!(names(&filter(&index, "  PIKA ")), vec!["pikachu", "pikachu-rock-star"]);
        assert_eq!(names(&filter(&index, "pichu")), vec!["Pichu"]);
    }

    #[test]
    fn test_no_match_is_empty_search_not_browse() {
        let index = index();
        assert_eq!(filter(&index, "missingno"), SearchResult::Matches(Vec::new()));
    }

    #[test]
    fn test_result_is_exact_subset() {
        let index = index();
        for query in ["a", "u", "pi", "CHAR", "-", "z"] {
            let SearchResult::Matches(matches) = filter(&index, query) else {
                panic!("expected matches for {query:?}");
            };
            let expected: Vec<&NameEntry> = index
                .iter()
                .filter(|entry| {
                    entry
                        .name
                        .to_lowercase()
                        .contains(&query.trim().to_lowercase())
                })
                .collect();
            assert_eq!(matches, expected, "query {query:?}");
        }
    }
}
