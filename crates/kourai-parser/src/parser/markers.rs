//! Marker detection over the token stream.
//!
//! Markers are the positional anchors the classifier slices titles with:
//! the episode identifier, year/date markers and release-tag sentinels.

use std::ops::Range;

use crate::lexer::{Lexer, Span, Token};

/// A year found in the input, with the span of its year or date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YearMarker {
    pub year: u16,
    pub span: Span,
}

/// Every marker located in one input string.
#[derive(Debug, Clone, Default)]
pub(crate) struct Markers<'src> {
    /// The first season/episode identifier and its span.
    pub episode: Option<(&'src str, Span)>,
    /// Year and date markers in input order.
    pub years: Vec<YearMarker>,
    /// Sentinel spans in input order.
    pub sentinels: Vec<Span>,
}

impl<'src> Markers<'src> {
    /// Locate all markers in the lexer's token stream.
    pub fn scan(lexer: &Lexer<'src>) -> Self {
        let mut markers = Markers::default();
        for (token, span) in lexer.tokens() {
            match token {
                Token::SeasonEpisode(text) if markers.episode.is_none() => {
                    markers.episode = Some((*text, *span));
                }
                Token::Year(_) | Token::Date(_) => {
                    if let Some(year) = token.year() {
                        markers.years.push(YearMarker { year, span: *span });
                    }
                }
                t if t.is_sentinel() => markers.sentinels.push(*span),
                _ => {}
            }
        }
        if markers.episode.is_none() {
            markers.episode = lexer.tokens().iter().find_map(|(token, span)| match *token {
                Token::Word(text) => embedded_episode(text).map(|range| {
                    let marker = Span::new(span.start + range.start, span.start + range.end);
                    (&text[range], marker)
                }),
                _ => None,
            });
        }
        markers
    }

    /// Start of the first sentinel that begins at or after `pos`.
    pub fn sentinel_from(&self, pos: usize) -> Option<usize> {
        self.sentinels
            .iter()
            .map(|s| s.start)
            .find(|&start| start >= pos)
    }

    /// Start of the first year marker that begins at or after `pos`.
    pub fn year_from(&self, pos: usize) -> Option<usize> {
        self.years
            .iter()
            .map(|y| y.span.start)
            .find(|&start| start >= pos)
    }
}

/// Byte range of an episode identifier glued to letters inside one word,
/// as in `ShowS01E02` or `S01E02Title`.
fn embedded_episode(word: &str) -> Option<Range<usize>> {
    let bytes = word.as_bytes();
    (0..bytes.len()).find_map(|start| {
        if !bytes[start].eq_ignore_ascii_case(&b's') {
            return None;
        }
        let season_end = digit_run(bytes, start + 1)?;
        if !bytes.get(season_end)?.eq_ignore_ascii_case(&b'e') {
            return None;
        }
        let mut end = digit_run(bytes, season_end + 1)?;
        while let Some(next) = bytes
            .get(end)
            .filter(|b| b.eq_ignore_ascii_case(&b'e'))
            .and_then(|_| digit_run(bytes, end + 1))
        {
            end = next;
        }
        Some(start..end)
    })
}

/// End of a run of one to four ASCII digits starting at `from`.
fn digit_run(bytes: &[u8], from: usize) -> Option<usize> {
    let len = bytes
        .get(from..)?
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    (1..=4).contains(&len).then_some(from + len)
}

/// Smallest boundary that still leaves a non-empty span from `start`.
///
/// Boundaries at or before `start` would yield a zero-length title and are
/// ignored; `default` is returned when nothing qualifies.
pub(crate) fn earliest_boundary(
    start: usize,
    default: usize,
    candidates: impl IntoIterator<Item = Option<usize>>,
) -> usize {
    candidates
        .into_iter()
        .flatten()
        .filter(|&pos| pos > start)
        .fold(default, usize::min)
}
