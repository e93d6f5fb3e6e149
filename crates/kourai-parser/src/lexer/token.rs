//! Token types for the Logos-based lexer.

use logos::Logos;

/// Token types recognized by the lexer.
///
/// Longest match wins, so a marker only fires when it covers a whole word:
/// `Pal` is a sentinel, `Palace` is a [`Token::Word`]. Priorities break ties
/// between equally long matches.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token<'src> {
    /// Season and episode identifier (e.g. S01E05, s1e1, S01E01E02, S01E01-E03)
    #[regex(r"(?i)S[0-9]{1,4}E[0-9]{1,4}(?:-?E[0-9]{1,4})*", priority = 10)]
    SeasonEpisode(&'src str),

    /// Full date; only the year is kept (e.g. 2010-05-01)
    #[regex(r"(18|19|20)[0-9]{2}-[0-9]{1,2}-[0-9]{1,2}", priority = 9)]
    Date(&'src str),

    /// Four digit year (1800-2099)
    #[regex(r"(18|19|20)[0-9]{2}", priority = 8)]
    Year(&'src str),

    /// Video resolution (e.g. 2160p, 1080i, 720p)
    #[regex(r"(?i)[0-9]{3,4}[ip]", priority = 7)]
    Resolution(&'src str),

    /// Release source
    #[regex(r"(?i)(WEB-DL|WEBRip|BluRay|DVDRip)", priority = 6)]
    Source(&'src str),

    /// Encoding and re-release tags
    #[regex(r"(?i)(10bit|PAL|ReRip|Repack)", priority = 6)]
    Encoding(&'src str),

    /// Edition tags
    #[regex(r"(?i)(Limited|Unrated)", priority = 6)]
    Edition(&'src str),

    /// "Also known as"; everything after it is an alternate title
    #[regex(r"(?i)(a\.k\.a\.?|aka)", priority = 6)]
    Aka(&'src str),

    /// Dot delimiter
    #[token(".")]
    Dot,

    /// Hyphen delimiter
    #[token("-")]
    Hyphen,

    /// Underscore delimiter
    #[token("_")]
    Underscore,

    /// Opening square bracket
    #[token("[")]
    BracketOpen,

    /// Closing square bracket
    #[token("]")]
    BracketClose,

    /// Opening parenthesis
    #[token("(")]
    ParenOpen,

    /// Closing parenthesis
    #[token(")")]
    ParenClose,

    /// Generic word token (lower priority than specific patterns)
    #[regex(r"[a-zA-Z][a-zA-Z0-9'&]*", priority = 1)]
    Word(&'src str),

    /// Numeric token
    #[regex(r"[0-9]+", priority = 2)]
    Number(&'src str),
}

impl Token<'_> {
    /// Release tags that end the meaningful title region.
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            Token::Resolution(_)
                | Token::Source(_)
                | Token::Encoding(_)
                | Token::Edition(_)
                | Token::Aka(_)
        )
    }

    /// The year carried by a [`Token::Year`] or [`Token::Date`].
    pub fn year(&self) -> Option<u16> {
        match self {
            Token::Year(text) => text.parse().ok(),
            Token::Date(text) => text.get(..4).and_then(|y| y.parse().ok()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token<'_>> {
        Token::lexer(input).filter_map(Result::ok).collect()
    }

    #[test]
    fn season_episode_beats_word() {
        assert_eq!(lex("S01E02"), vec![Token::SeasonEpisode("S01E02")]);
        assert_eq!(lex("s00e10e11e12"), vec![Token::SeasonEpisode("s00e10e11e12")]);
        assert_eq!(lex("S01E01-E03"), vec![Token::SeasonEpisode("S01E01-E03")]);
    }

    #[test]
    fn sentinels_need_whole_words() {
        assert_eq!(lex("PAL"), vec![Token::Encoding("PAL")]);
        assert_eq!(lex("Palace"), vec![Token::Word("Palace")]);
        assert_eq!(lex("aka"), vec![Token::Aka("aka")]);
        assert_eq!(lex("a.k.a."), vec![Token::Aka("a.k.a.")]);
        assert_eq!(lex("WEB-DL"), vec![Token::Source("WEB-DL")]);
        assert_eq!(lex("2160p"), vec![Token::Resolution("2160p")]);
    }

    #[test]
    fn years_and_dates() {
        assert_eq!(lex("1999"), vec![Token::Year("1999")]);
        assert_eq!(lex("2010-05-01"), vec![Token::Date("2010-05-01")]);
        assert_eq!(lex("19999"), vec![Token::Number("19999")]);
        assert_eq!(Token::Date("2010-05-01").year(), Some(2010));
        assert_eq!(Token::Year("1968").year(), Some(1968));
        assert_eq!(Token::Word("x").year(), None);
    }

    #[test]
    fn sentinel_classification() {
        assert!(Token::Resolution("720p").is_sentinel());
        assert!(Token::Edition("UNRATED").is_sentinel());
        assert!(!Token::Year("1999").is_sentinel());
        assert!(!Token::Word("limitless").is_sentinel());
    }
}
