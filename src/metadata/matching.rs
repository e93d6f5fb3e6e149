//! Candidate selection and query narrowing.

use serde::{Deserialize, Serialize};

use super::provider::Candidate;

/// Index of the candidate closest to `query` by Levenshtein distance.
///
/// Comparison ignores case. Ties go to the earliest candidate, so the result
/// is a pure function of the inputs. Returns `None` for an empty list.
///
/// ```
/// use kourai::metadata::matching::best_match_index;
///
/// let titles = ["Foobar 2", "Foobar", "foobar"];
/// assert_eq!(best_match_index("Foobar", &titles), Some(1));
/// ```
pub fn best_match_index<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<usize> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, strsim::levenshtein(&query, &c.as_ref().to_lowercase())))
        .min_by(|(ia, da), (ib, db)| da.cmp(db).then(ia.cmp(ib)))
        .map(|(i, _)| i)
}

/// Candidates released in `year` or the year after.
pub fn filter_by_year(candidates: &[Candidate], year: u16) -> Vec<&Candidate> {
    candidates
        .iter()
        .filter(|c| matches!(c.year, Some(y) if y == year || y == year.saturating_add(1)))
        .collect()
}

/// Pick one candidate for a query.
///
/// A single candidate is taken as is. Otherwise, when `year` is known,
/// candidates within the year tolerance are preferred; the closest title by
/// edit distance breaks any remaining tie.
pub fn select<'a>(
    query: &str,
    year: Option<u16>,
    candidates: &'a [Candidate],
) -> Option<&'a Candidate> {
    if candidates.len() <= 1 {
        return candidates.first();
    }

    let pool: Vec<&Candidate> = match year.map(|y| filter_by_year(candidates, y)) {
        Some(filtered) if !filtered.is_empty() => filtered,
        _ => candidates.iter().collect(),
    };
    if pool.len() == 1 {
        return pool.first().copied();
    }

    let titles: Vec<&str> = pool.iter().map(|c| c.title.as_str()).collect();
    best_match_index(query, &titles).map(|i| pool[i])
}

/// How a title is shortened when the catalog finds nothing for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Narrowing {
    /// Drop up to half the words (rounded up) from the end, one at a time.
    #[default]
    TrimTrailing,
    /// Drop the last word, with one retry per three words of the original
    /// title.
    DropLastWord,
}

impl Narrowing {
    /// Queries to try for `title`, most specific first.
    ///
    /// The full title always comes first and no query is ever empty.
    ///
    /// ```
    /// use kourai::metadata::matching::Narrowing;
    ///
    /// assert_eq!(
    ///     Narrowing::TrimTrailing.queries("The Foo Bar Baz"),
    ///     vec!["The Foo Bar Baz", "The Foo Bar", "The Foo"]
    /// );
    /// assert_eq!(
    ///     Narrowing::DropLastWord.queries("The Foo Bar Baz"),
    ///     vec!["The Foo Bar Baz", "The Foo Bar"]
    /// );
    /// ```
    pub fn queries(&self, title: &str) -> Vec<String> {
        let words: Vec<&str> = title.split_whitespace().collect();
        let n = words.len();
        if n == 0 {
            return Vec::new();
        }

        let max_dropped = match self {
            Narrowing::TrimTrailing => n.div_ceil(2),
            Narrowing::DropLastWord => n / 3,
        }
        .min(n - 1);

        (0..=max_dropped).map(|k| words[..n - k].join(" ")).collect()
    }
}

impl std::fmt::Display for Narrowing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Narrowing::TrimTrailing => write!(f, "trim_trailing"),
            Narrowing::DropLastWord => write!(f, "drop_last_word"),
        }
    }
}
