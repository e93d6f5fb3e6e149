//! Movie extraction.

use super::markers::{earliest_boundary, Markers, YearMarker};
use super::title;
use crate::config::ClassifierConfig;
use crate::lexer::Lexer;

/// Title and year pulled from one candidate string (file stem or directory name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MovieParts {
    pub title: Option<String>,
    pub year: Option<u16>,
}

impl MovieParts {
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.year.is_some()
    }

    /// Fill missing fields from `other`.
    pub fn or(self, other: MovieParts) -> MovieParts {
        MovieParts {
            title: self.title.or(other.title),
            year: self.year.or(other.year),
        }
    }
}

/// Extract a movie title and year from `input`.
///
/// The year is the last plausible year marker that does not open the string
/// and precedes the first sentinel; failing that, the first plausible year
/// marker. The title ends at the chosen year or the first sentinel.
pub(crate) fn extract(input: &str, config: &ClassifierConfig) -> MovieParts {
    let lexer = Lexer::new(input);
    let markers = Markers::scan(&lexer);

    let year = choose_year(&markers, config);
    let end = earliest_boundary(
        0,
        input.len(),
        [year.map(|y| y.span.start), markers.sentinel_from(1)],
    );

    MovieParts {
        title: title::extract(input, 0, end, config.title_case),
        year: year.map(|y| y.year),
    }
}

fn choose_year(markers: &Markers<'_>, config: &ClassifierConfig) -> Option<YearMarker> {
    let first_sentinel = markers.sentinel_from(1).unwrap_or(usize::MAX);
    let mut plausible = markers
        .years
        .iter()
        .copied()
        .filter(|y| config.is_movie_year(y.year));

    let first = plausible.clone().next();
    plausible
        .filter(|y| y.span.start > 0 && y.span.start < first_sentinel)
        .last()
        .or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(input: &str) -> MovieParts {
        extract(input, &ClassifierConfig::default())
    }

    #[test]
    fn test_title_and_year() {
        let p = parts("Foobar.1999.2160p.WEB-DL");
        assert_eq!(p.title.as_deref(), Some("Foobar"));
        assert_eq!(p.year, Some(1999));
    }

    #[test]
    fn test_parenthesized_year() {
        let p = parts("The Day of The Baz (1979)");
        assert_eq!(p.title.as_deref(), Some("The Day Of The Baz"));
        assert_eq!(p.year, Some(1979));
    }

    #[test]
    fn test_year_in_title() {
        let p = parts("1917.2019.1080p");
        assert_eq!(p.title.as_deref(), Some("1917"));
        assert_eq!(p.year, Some(2019));

        let p = parts("Blade.Runner.2049.2017.720p");
        assert_eq!(p.title.as_deref(), Some("Blade Runner 2049"));
        assert_eq!(p.year, Some(2017));
    }

    #[test]
    fn test_year_after_sentinel_is_fallback() {
        let p = parts("Some.Film.1080p.2004");
        assert_eq!(p.title.as_deref(), Some("Some Film"));
        assert_eq!(p.year, Some(2004));
    }

    #[test]
    fn test_implausible_year_ignored() {
        let p = parts("Trek.1701");
        assert_eq!(p.year, None);
        assert_eq!(p.title.as_deref(), Some("Trek 1701"));
    }

    #[test]
    fn test_no_year() {
        let p = parts("no-match");
        assert_eq!(p.title.as_deref(), Some("No-Match"));
        assert_eq!(p.year, None);
        assert!(!p.is_complete());
    }

    #[test]
    fn test_merge() {
        let stem = MovieParts {
            title: Some("A".into()),
            year: None,
        };
        let dir = MovieParts {
            title: Some("B".into()),
            year: Some(2000),
        };
        assert_eq!(
            stem.or(dir),
            MovieParts {
                title: Some("A".into()),
                year: Some(2000)
            }
        );
    }
}
