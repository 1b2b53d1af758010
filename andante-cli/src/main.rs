//! andante CLI
//!
//! Command-line front end: resolve a catalog entity, walk its tracks
//! through the browser-driven download flow one at a time, and tag each
//! finished file from the catalog record.

use std::collections::VecDeque;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use andante_catalog::{CatalogClient, Entity, EntityRef};
use andante_downloader::{
    AudioFormat, DownloadTask, Orchestrator, Pacer, PlaylistContext, RunReport, SiteSession,
};
use andante_tagger::{CachingSource, HttpArtworkSource, Tagger};

mod config;
mod error;
mod interactive;

use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "andante")]
#[command(about = "Paced music downloader with catalog tagging", long_about = None)]
struct Cli {
    /// Format and optional bitrate: mp3-128, mp3-320 or flac.
    /// Omit both positionals for interactive mode.
    format: Option<String>,

    /// Catalog URL (track, album, playlist or artist)
    url: Option<String>,

    /// Destination root for finished downloads
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scratch directory the browser downloads into
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// WebDriver endpoint (a running geckodriver)
    #[arg(long)]
    webdriver: Option<String>,

    /// Skip writing the run report file
    #[arg(long)]
    no_report: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    if let Err(e) = run(cli, config) {
        log::error!("{} {e}", "\u{2718}".if_supports_color(Stdout, |t| t.red()));
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    // Reject bad requests before any network or browser work begins.
    let requested = match (&cli.format, &cli.url) {
        (Some(format), Some(url)) => {
            let format = format.parse::<AudioFormat>()?;
            let entity_ref = EntityRef::parse(url)
                .map_err(|e| CliError::invalid_input(e.to_string()))?;
            Some((format, entity_ref))
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(CliError::invalid_input(
                "non-interactive mode needs both FORMAT and URL",
            ));
        }
        (None, None) => None,
    };

    let download_root = config.download_root(cli.output.clone());
    let scratch_dir = config.scratch_dir(cli.scratch.clone(), &download_root);
    std::fs::create_dir_all(&download_root)?;
    std::fs::create_dir_all(&scratch_dir)?;

    let client = CatalogClient::new(config.api_base())?;

    let session = SiteSession::launch(
        &config.webdriver_url(cli.webdriver.clone()),
        &config.site_base(),
        scratch_dir.clone(),
        None,
    )?;
    let pacer = Pacer::new(config.pacing_config());
    let mut orchestrator =
        Orchestrator::new(session, pacer, scratch_dir, download_root.clone());

    let mut tagger = Tagger::new(CachingSource::new(
        HttpArtworkSource::new()?,
        andante_tagger::DEFAULT_CAPACITY,
    ));

    let mut report = RunReport::new();
    match requested {
        // Non-interactive: one batch, then exit.
        Some((format, entity_ref)) => {
            let entity = resolve_entity(&client, entity_ref)?;
            let batch = orchestrator.run_batch(tasks_for(entity, format), |path, track| {
                tagger.tag(path, track).map_err(Into::into)
            });
            report.merge(batch);
        }
        None => loop {
            let Some(format) = interactive::prompt_format() else {
                break;
            };
            let Some(entity) = interactive::prompt_entity(&client) else {
                break;
            };
            log::info!("Queued {}", entity.describe());
            let batch = orchestrator.run_batch(tasks_for(entity, format), |path, track| {
                tagger.tag(path, track).map_err(Into::into)
            });
            report.merge(batch);
            if !interactive::confirm_continue() {
                break;
            }
        },
    }

    print_summary(&report);
    if !cli.no_report {
        let report_path = download_root.join("andante-report.txt");
        report.write_to_file(&report_path)?;
        log::info!("Report written to {}", report_path.display());
    }
    Ok(())
}

/// Resolve a catalog reference with a spinner while the API round-trips run.
fn resolve_entity(client: &CatalogClient, entity_ref: EntityRef) -> Result<Entity, CliError> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message("Resolving catalog entity...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = client.resolve(entity_ref);
    pb.finish_and_clear();

    let entity = result?;
    log::info!("Resolved {}", entity.describe());
    Ok(entity)
}

/// Expand an entity into the owned task queue the orchestrator drains.
fn tasks_for(entity: Entity, format: AudioFormat) -> VecDeque<DownloadTask> {
    let playlist = entity.playlist_title().map(str::to_string);
    entity
        .into_tracks()
        .into_iter()
        .enumerate()
        .map(|(index, track)| DownloadTask {
            track,
            format,
            playlist: playlist.as_ref().map(|name| PlaylistContext {
                name: name.clone(),
                position: (index + 1) as u32,
            }),
        })
        .collect()
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();
    println!();
    println!(
        "{} {} downloaded, {} already present, {} tag failures, {} failed",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.completed,
        summary.already_present,
        summary.tag_failures,
        summary.failures
    );
}
