//! Plex library naming.

use std::path::{Path, PathBuf};

use super::LayoutFormat;
use crate::model::{Episode, MediaEntity, Movie};

/// Plex naming conventions.
///
/// - Movies: `movies/<Title> (<Year>)/<original file name>`
/// - Episodes: `tv/<Series> (<Year>)/Season <N>/<Series> (<Year>) - S01E02 - <Title>.<ext>`
///
/// The year suffix is left out when no year is known, season 0 goes to
/// `Specials`, and the episode title is left out when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlexLayout;

impl LayoutFormat for PlexLayout {
    fn target(&self, entity: &MediaEntity) -> PathBuf {
        match entity {
            MediaEntity::Movie(movie) => movie_target(movie),
            MediaEntity::Episode(episode) => episode_target(episode),
        }
    }
}

fn movie_target(movie: &Movie) -> PathBuf {
    let folder = with_year(&movie.title, movie.year);
    let mut target = PathBuf::from("movies");
    target.push(sanitize(&folder));
    if let Some(name) = movie.path().file_name() {
        target.push(name);
    }
    target
}

fn episode_target(episode: &Episode) -> PathBuf {
    let series = sanitize(&with_year(&episode.series, episode.year));
    let season = if episode.season == 0 {
        "Specials".to_string()
    } else {
        format!("Season {}", episode.season)
    };

    let mut file = format!("{} - {}", series, episode_label(&episode.id));
    if let Some(title) = &episode.title {
        file.push_str(" - ");
        file.push_str(&sanitize(title));
    }
    if let Some(ext) = episode.path().extension().and_then(|e| e.to_str()) {
        file.push('.');
        file.push_str(ext);
    }

    Path::new("tv").join(&series).join(season).join(file)
}

/// Render a raw episode identifier for file names.
///
/// The identifier is upper-cased; a file holding several episodes is shown
/// as the first and last episode, keeping their zero padding.
///
/// ```
/// use kourai_parser::output::episode_label;
///
/// assert_eq!(episode_label("s01e02"), "S01E02");
/// assert_eq!(episode_label("S00E10E11E12"), "S00E10-E12");
/// ```
pub fn episode_label(id: &str) -> String {
    let lower = id.to_ascii_lowercase();
    let parts: Vec<&str> = lower.split('e').collect();
    if parts.len() > 2 {
        let season = parts[0];
        let first = parts[1].trim_matches('-');
        let last = parts[parts.len() - 1].trim_matches('-');
        format!("{season}e{first}-e{last}").to_ascii_uppercase()
    } else {
        id.to_ascii_uppercase()
    }
}

fn with_year(title: &str, year: Option<u16>) -> String {
    match year {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    }
}

/// Titles from the catalog may contain path separators.
fn sanitize(component: &str) -> String {
    component.replace(['/', '\\'], "-")
}
