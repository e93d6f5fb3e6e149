//! Episode extraction.

use std::path::Path;

use super::markers::{earliest_boundary, Markers};
use super::title;
use crate::config::ClassifierConfig;
use crate::lexer::Span;
use crate::model::Episode;

/// Lowest year accepted as a series year.
const MIN_SERIES_YEAR: u16 = 1900;

/// Build an episode from a file stem that carries an episode marker.
///
/// The series title runs from the start of the stem to the first of the
/// episode marker, a preceding year marker, or a preceding sentinel. The
/// episode title runs from the marker to the next year or sentinel.
pub(crate) fn extract(
    path: &Path,
    stem: &str,
    markers: &Markers<'_>,
    id: &str,
    marker: Span,
    config: &ClassifierConfig,
) -> Episode {
    let before_marker = |pos: &usize| *pos < marker.start;

    let series_year = markers
        .years
        .iter()
        .find(|y| y.span.start < marker.start && y.year >= MIN_SERIES_YEAR);

    let series_end = earliest_boundary(
        0,
        marker.start,
        [
            series_year.map(|y| y.span.start),
            markers.sentinel_from(0).filter(before_marker),
        ],
    );
    let series = title::extract(stem, 0, series_end, config.title_case).unwrap_or_default();

    let title_end = earliest_boundary(
        marker.end,
        stem.len(),
        [markers.year_from(marker.end), markers.sentinel_from(marker.end)],
    );
    let episode_title = if title_end > marker.end {
        title::extract(stem, marker.end, title_end, config.title_case)
    } else {
        None
    };

    let (season, episodes) = parse_id(id);

    let mut episode = Episode::new(path, series, id, season, episodes);
    episode.title = episode_title;
    episode.year = series_year.map(|y| y.year);
    episode
}

/// Split an identifier such as `s01e02e03` or `S01E01-E03` into its season
/// and episode numbers.
///
/// A number that fails to parse is logged and recorded as 0.
pub(crate) fn parse_id(id: &str) -> (u32, Vec<u32>) {
    let lower = id.to_ascii_lowercase();
    let body = lower.strip_prefix('s').unwrap_or(&lower);
    let mut parts = body.split('e').map(|p| p.trim_matches('-'));

    let season = parts.next().map(|s| parse_number(id, s)).unwrap_or_default();
    let episodes: Vec<u32> = parts
        .filter(|p| !p.is_empty())
        .map(|p| parse_number(id, p))
        .collect();

    (season, episodes)
}

fn parse_number(id: &str, digits: &str) -> u32 {
    match digits.parse() {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(id, digits, error = %e, "failed to parse episode identifier number");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn episode(stem: &str) -> Episode {
        let lexer = Lexer::new(stem);
        let markers = Markers::scan(&lexer);
        let (id, span) = markers.episode.expect("marker");
        extract(
            Path::new("/tv/x.mkv"),
            stem,
            &markers,
            id,
            span,
            &ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("s01e02"), (1, vec![2]));
        assert_eq!(parse_id("S00E10E11E12"), (0, vec![10, 11, 12]));
        assert_eq!(parse_id("S01E01-E03"), (1, vec![1, 3]));
        assert_eq!(parse_id("s2e5"), (2, vec![5]));
    }

    #[test]
    fn test_series_and_episode_title() {
        let ep = episode("clobberin.time.s01e01.lets.go");
        assert_eq!(ep.series, "Clobberin Time");
        assert_eq!(ep.title.as_deref(), Some("Lets Go"));
        assert_eq!(ep.id, "s01e01");
        assert_eq!((ep.season, ep.episode), (1, 1));
        assert_eq!(ep.year, None);
    }

    #[test]
    fn test_series_year_bounds_series() {
        let ep = episode("BEASTMODE (2001) - S00E10E11E12");
        assert_eq!(ep.series, "BEASTMODE");
        assert_eq!(ep.year, Some(2001));
        assert_eq!(ep.season, 0);
        assert_eq!(ep.episodes, vec![10, 11, 12]);
        assert_eq!(ep.title, None);
    }

    #[test]
    fn test_episode_title_stops_at_sentinel() {
        let ep = episode("Show.Name.S02E03.The.Title.720p.WEB-DL");
        assert_eq!(ep.series, "Show Name");
        assert_eq!(ep.title.as_deref(), Some("The Title"));
    }

    #[test]
    fn test_sentinel_right_after_marker_means_no_title() {
        let ep = episode("Show.S02E03.1080p");
        assert_eq!(ep.title, None);
    }

    #[test]
    fn test_later_date_is_not_series_year() {
        let ep = episode("Daily Show S10E05 2010-05-01");
        assert_eq!(ep.series, "Daily Show");
        assert_eq!(ep.year, None);
        assert_eq!(ep.title, None);
    }

    #[test]
    fn test_marker_at_start_leaves_empty_series() {
        let ep = episode("S01E02 Pilot");
        assert_eq!(ep.series, "");
        assert_eq!(ep.title.as_deref(), Some("Pilot"));
    }
}
