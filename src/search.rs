//! Player-name search.
//!
//! Ranks names that start with the query ahead of names that merely
//! contain it, keeping dataset order inside each group.

use std::collections::HashSet;

use crate::dataset::{Dataset, PlayerRecord};

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Upper bound on returned matches.
pub const MAX_RESULTS: usize = 20;

/// Search `records` by name.
///
/// `name_of` extracts a record's display name; records without one are
/// skipped. With `dedupe`, only the first record per lower-cased name is kept.
pub fn search<'a, T, F>(query: &str, records: &'a [T], name_of: F, dedupe: bool) -> Vec<&'a T>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let query = query.to_lowercase();

    let mut starts_with = Vec::new();
    let mut contains = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        let Some(name) = name_of(record) else {
            continue;
        };
        let name = name.to_lowercase();
        if dedupe && seen.contains(&name) {
            continue;
        }

        if name.starts_with(&query) {
            starts_with.push(record);
        } else if name.contains(&query) {
            contains.push(record);
        } else {
            continue;
        }

        if dedupe {
            seen.insert(name);
        }
        if starts_with.len() + contains.len() >= MAX_RESULTS {
            break;
        }
    }

    starts_with.extend(contains);
    starts_with.truncate(MAX_RESULTS);
    starts_with
}

/// Search a dataset using its league's name field and dedup rule.
pub fn search_dataset<'a>(query: &str, dataset: &'a Dataset) -> Vec<&'a PlayerRecord> {
    search(
        query,
        dataset.records(),
        |record| dataset.name_of(record),
        dataset.league().dedupes_names(),
    )
}

/// NBA search: full records.
pub fn search_nba(query: &str, dataset: &Dataset) -> Vec<PlayerRecord> {
    search_dataset(query, dataset).into_iter().cloned().collect()
}

/// NFL search: distinct player names only.
pub fn search_nfl(query: &str, dataset: &Dataset) -> Vec<String> {
    search_dataset(query, dataset)
        .into_iter()
        .filter_map(|record| dataset.name_of(record))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::League;
    use serde_json::json;

    fn nba(names: &[&str]) -> Dataset {
        let records = names
            .iter()
            .map(|n| json!({ "player": n }).as_object().unwrap().clone())
            .collect();
        Dataset::new(League::Nba, records)
    }

    fn nfl(names: &[&str]) -> Dataset {
        let records = names
            .iter()
            .enumerate()
            .map(|(week, n)| {
                json!({ "player_name": n, "week": week + 1 })
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect();
        Dataset::new(League::Nfl, records)
    }

    fn names(records: &[PlayerRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r["player"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_short_queries_return_nothing() {
        let dataset = nba(&["Al Horford", "A", "AJ Green"]);
        for query in ["", " ", "a", " a ", "\t\n"] {
            assert!(search_nba(query, &dataset).is_empty(), "{query:?}");
        }
    }

    #[test]
    fn test_starts_with_ranked_first() {
        let dataset = nba(&["LeBron James", "LeBron Jr.", "Bron Merritt"]);
        let results = search_nba("lebron", &dataset);
        assert_eq!(names(&results), vec!["LeBron James", "LeBron Jr."]);
    }

    #[test]
    fn test_contains_only_keeps_dataset_order() {
        let dataset = nba(&["LeBron James", "LeBron Jr.", "Bron Merritt"]);
        // "bron merritt" starts with "bron"; the LeBrons only contain it.
        let results = search_nba("bron", &dataset);
        assert_eq!(
            names(&results),
            vec!["Bron Merritt", "LeBron James", "LeBron Jr."]
        );

        let results = search_nba("ron", &dataset);
        assert_eq!(
            names(&results),
            vec!["LeBron James", "LeBron Jr.", "Bron Merritt"]
        );
    }

    #[test]
    fn test_mixed_buckets_ordering() {
        let dataset = nba(&["Kevin Love", "Love Jones", "Clovis Hart", "Lovell Ray"]);
        let results = search_nba("lov", &dataset);
        assert_eq!(
            names(&results),
            vec!["Love Jones", "Lovell Ray", "Kevin Love", "Clovis Hart"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let dataset = nba(&["LeBron James", "Bronny James"]);
        assert_eq!(search_nba("lebron", &dataset), search_nba("LeBron", &dataset));
        assert_eq!(search_nba("LEBRON", &dataset).len(), 1);
    }

    #[test]
    fn test_query_is_trimmed() {
        let dataset = nba(&["Stephen Curry", "Seth Curry"]);
        assert_eq!(search_nba("  curry ", &dataset).len(), 2);
    }

    #[test]
    fn test_result_capped_at_twenty() {
        let many: Vec<String> = (0..50).map(|i| format!("Player {i}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let dataset = nba(&refs);

        let results = search_nba("player", &dataset);
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0]["player"], "Player 0");
        assert_eq!(results[19]["player"], "Player 19");
    }

    #[test]
    fn test_early_exit_keeps_contains_bucket() {
        // Early exit fires at 20 total matches, so a later starts-with match
        // never displaces an earlier contains match.
        let mut names_list: Vec<String> = (0..20).map(|i| format!("X Smith {i}")).collect();
        names_list.push("Smith Late".to_string());
        let refs: Vec<&str> = names_list.iter().map(String::as_str).collect();
        let dataset = nba(&refs);

        let results = search_nba("smith", &dataset);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|r| r["player"] != "Smith Late"));
    }

    #[test]
    fn test_records_without_name_are_skipped() {
        let records = vec![
            json!({ "team": "LAL" }).as_object().unwrap().clone(),
            json!({ "player": null }).as_object().unwrap().clone(),
            json!({ "player": "" }).as_object().unwrap().clone(),
            json!({ "player": "Anthony Davis" }).as_object().unwrap().clone(),
        ];
        let dataset = Dataset::new(League::Nba, records);
        let results = search_nba("an", &dataset);
        assert_eq!(names(&results), vec!["Anthony Davis"]);
    }

    #[test]
    fn test_nba_keeps_duplicates() {
        let dataset = nba(&["Jalen Williams", "Jalen Williams"]);
        assert_eq!(search_nba("jalen", &dataset).len(), 2);
    }

    #[test]
    fn test_nfl_dedupes_by_lowercased_name() {
        let dataset = nfl(&["J.Allen", "J.Allen", "j.allen", "K.Allen", "J.Allen"]);
        let results = search_nfl("allen", &dataset);
        assert_eq!(results, vec!["J.Allen", "K.Allen"]);
    }

    #[test]
    fn test_nfl_dedup_applies_before_cap() {
        let mut rows = Vec::new();
        for i in 0..25 {
            // Every player appears three times (three weeks).
            for _ in 0..3 {
                rows.push(format!("P.Mahomes{i}"));
            }
        }
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let dataset = nfl(&refs);

        let results = search_nfl("mahomes", &dataset);
        assert_eq!(results.len(), MAX_RESULTS);
        let unique: HashSet<_> = results.iter().map(|n| n.to_lowercase()).collect();
        assert_eq!(unique.len(), results.len());
    }

    #[test]
    fn test_every_result_contains_query() {
        let dataset = nfl(&["T.Kelce", "T.Hill", "C.Kupp", "K.Hill", "D.Henry"]);
        for query in ["hill", "ke", ".k", "en"] {
            for name in search_nfl(query, &dataset) {
                assert!(name.to_lowercase().contains(query), "{name} / {query}");
            }
        }
    }

    #[test]
    fn test_empty_dataset() {
        assert!(search_nfl("allen", &Dataset::empty(League::Nfl)).is_empty());
        assert!(search_nba("james", &Dataset::empty(League::Nba)).is_empty());
    }

    #[test]
    fn test_generic_search_over_plain_strings() {
        let names = vec!["Alpha", "Beta", "alphabet"];
        let results = search("alp", &names, |n| Some(*n), false);
        assert_eq!(results, vec![&"Alpha", &"alphabet"]);
    }
}
