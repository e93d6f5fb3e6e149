mod cli;

use kourai::config;
use kourai::link::Link;
use kourai::metadata::MetadataProvider;
use kourai::pipeline::Orchestrator;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, LinkArgs};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "kourai=trace,kourai_parser=debug,kourai_common=debug".to_string()
        } else {
            "kourai=info".to_string()
        }
    });

    // Logs go to stderr so planned links on stdout stay machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Link(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(link(args, cli.config.as_deref()))
        }
        Commands::Classify {
            paths,
            keep_title_case,
            json,
        } => classify(&paths, cli.config.as_deref(), keep_title_case, json),
        Commands::Search {
            title,
            year,
            tv,
            api_key,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search(&title, year, tv, api_key, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("kourai {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn link(args: LinkArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    args.apply(&mut config);
    config::validate_config(&config)?;

    let options = config.link_options()?;
    let resolver = config.resolver()?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight files");
            on_signal.cancel();
        }
    });

    let mut run = Orchestrator::new(options, resolver).run(cancel);
    let mut failures = 0usize;
    while let Some(link) = run.next().await {
        if args.dry_run {
            println!("{link}");
            continue;
        }
        match create_link(link.clone()).await {
            Ok(outcome) => println!("{outcome}\t{}", link.target.display()),
            Err(e) => {
                tracing::warn!(source = %link.source.display(), error = %e, "Failed to create link");
                failures += 1;
            }
        }
    }

    let summary = run.finish().await?;
    eprintln!("{summary}");
    if failures > 0 {
        eprintln!("{failures} links could not be created");
    }
    Ok(())
}

async fn create_link(link: Link) -> Result<kourai::link::LinkOutcome> {
    let outcome = tokio::task::spawn_blocking(move || link.create()).await??;
    Ok(outcome)
}

fn classify(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    keep_title_case: bool,
    json: bool,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    config.library.keep_title_case |= keep_title_case;
    let classifier = config.classifier();

    let mut failed = 0usize;
    for path in paths {
        match classifier.classify(path) {
            Ok(entity) => {
                let target = entity.target_relative_path();
                if json {
                    let value = serde_json::json!({ "entity": entity, "target": target });
                    println!("{}", serde_json::to_string(&value)?);
                } else {
                    println!("{}\t{}\t{}", entity.kind(), entity.title(), target.display());
                }
            }
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} paths could not be classified", paths.len());
    }
    Ok(())
}

async fn search(
    title: &str,
    year: Option<u16>,
    tv: bool,
    api_key: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if api_key.is_some() {
        config.tmdb.api_key = api_key;
    }
    let provider = config.provider()?;

    let candidates = if tv {
        provider.search_tv(title, year).await?
    } else {
        provider.search_movies(title, year).await?
    };

    for candidate in candidates {
        let year = candidate
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}", candidate.id, year, candidate.title);
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let library = &config.library;
    match &library.destination {
        Some(dest) => println!("  Destination: {}", dest.display()),
        None => println!("  Destination: (not set)"),
    }
    println!("  Sources: {}", library.sources.len());
    println!("  Extensions: {}", library.extensions.join(", "));
    println!("  Exclude patterns: {}", library.exclude.len());
    println!("  TMDB key: {}", if config.api_key().is_some() { "set" } else { "not set" });
    println!(
        "  Rate limit: {}/s (burst {})",
        config.tmdb.requests_per_second, config.tmdb.burst
    );
    println!("  Narrowing: {}", config.pipeline.narrowing);

    Ok(())
}
