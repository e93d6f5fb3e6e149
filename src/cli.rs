use clap::{Args, Parser, Subcommand};
use kourai::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kourai")]
#[command(author, version, about = "Hardlink movies and TV episodes into a Plex-style library")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link media files from the source directories into the library
    Link(LinkArgs),

    /// Classify files and show where they would be linked
    Classify {
        /// Files to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Don't alter title case
        #[arg(short, long)]
        keep_title_case: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the catalog for a title
    Search {
        /// Title to search for
        #[arg(required = true)]
        title: String,

        /// Release (or first air) year
        #[arg(short, long)]
        year: Option<u16>,

        /// Search TV series instead of movies
        #[arg(long)]
        tv: bool,

        /// TMDB API key
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Directories to consider (default: ./)
    pub sources: Vec<PathBuf>,

    /// Destination directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Print planned links without touching the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't alter title case
    #[arg(short, long)]
    pub keep_title_case: bool,

    /// Exclude TV files and results
    #[arg(long)]
    pub no_tv: bool,

    /// Exclude movie files and results
    #[arg(long)]
    pub no_movies: bool,

    /// Patterns to exclude (regex, or `glob:` followed by a shell glob)
    #[arg(short = 'x', long = "exclude")]
    pub excludes: Vec<String>,

    /// Origin countries to exclude
    #[arg(long, value_delimiter = ',')]
    pub exclude_countries: Vec<String>,

    /// File extensions to consider (case-insensitive)
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only consider files modified after the given date
    #[arg(long)]
    pub after: Option<String>,

    /// Only consider files modified before the given date
    #[arg(long)]
    pub before: Option<String>,

    /// TMDB API key
    #[arg(long)]
    pub api_key: Option<String>,
}

impl LinkArgs {
    /// Overlay command-line options on the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        let library = &mut config.library;
        if !self.sources.is_empty() {
            library.sources = self.sources.clone();
        }
        if let Some(dest) = &self.dest {
            library.destination = Some(dest.clone());
        }
        if !self.extensions.is_empty() {
            library.extensions = self.extensions.clone();
        }
        library.exclude.extend(self.excludes.iter().cloned());
        library
            .exclude_countries
            .extend(self.exclude_countries.iter().cloned());
        if self.after.is_some() {
            library.modified_after = self.after.clone();
        }
        if self.before.is_some() {
            library.modified_before = self.before.clone();
        }
        library.keep_title_case |= self.keep_title_case;
        library.exclude_tv |= self.no_tv;
        library.exclude_movies |= self.no_movies;

        if self.api_key.is_some() {
            config.tmdb.api_key = self.api_key.clone();
        }
    }
}
