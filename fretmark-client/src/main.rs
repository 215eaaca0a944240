//! fretmark - tab analysis client
//!
//! Command-line driver over the analysis backend: probe a tab file for
//! its track list, submit tracks for analysis, fetch per-track results
//! (key, scale, interval histogram), and delete stored songs.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use fretmark_client::{AnalysisClient, Session};
use fretmark_common::api::TrackAnalysis;
use fretmark_common::config::ServerConfig;
use fretmark_common::music;
use fretmark_overlay::chart::{chart_from_stats, histogram_from_intervals, ChartSlice};

#[derive(Parser)]
#[command(name = "fretmark", version, about = "Guitar tab analysis client")]
struct Cli {
    /// Analysis server URL (overrides FRETMARK_SERVER and config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect a tab file and list its tracks
    Probe {
        /// Tab file (Guitar Pro or alphaTex)
        file: PathBuf,
    },
    /// Upload a tab and analyze the selected tracks
    Analyze {
        file: PathBuf,
        /// Comma-separated track ids, as reported by probe
        #[arg(long, value_delimiter = ',', required = true)]
        tracks: Vec<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
    },
    /// Fetch the stored analysis for one track
    Track { id: u64 },
    /// Delete a stored song and its tracks
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting fretmark v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ServerConfig::resolve(cli.server.as_deref());
    info!("Analysis server: {}", config.base_url);

    let client = AnalysisClient::new(&config.base_url)?;

    match cli.command {
        Command::Probe { file } => {
            let mut session = Session::new();
            session.begin_probe()?;
            let info = match client.probe_tab(&file).await {
                Ok(info) => {
                    session.probe_succeeded(info.clone())?;
                    info
                }
                Err(e) => {
                    session.probe_failed();
                    return Err(e.into());
                }
            };
            if let Some(title) = &info.title {
                println!("Title:  {}", title);
            }
            if let Some(artist) = &info.artist {
                println!("Artist: {}", artist);
            }
            println!("Tracks:");
            for (id, name) in &info.tracks {
                println!("  {:>4}  {}", id, name);
            }
        }
        Command::Analyze {
            file,
            tracks,
            title,
            artist,
        } => {
            let mut session = Session::new();
            session.begin_probe()?;
            let info = match client.probe_tab(&file).await {
                Ok(info) => {
                    session.probe_succeeded(info.clone())?;
                    info
                }
                Err(e) => {
                    session.probe_failed();
                    return Err(e.into());
                }
            };
            for id in &tracks {
                session.select_track(id)?;
            }
            let selected = session.begin_analyze()?;
            let title = title.or_else(|| info.title.clone());
            let artist = artist.or_else(|| info.artist.clone());
            let result = client
                .analyze_tab(&file, &selected, title.as_deref(), artist.as_deref())
                .await;
            match result {
                Ok(()) => {
                    session.analyze_finished();
                    println!("Analyzed {} track(s)", selected.len());
                }
                Err(e) => {
                    session.analyze_failed();
                    return Err(e.into());
                }
            }
        }
        Command::Track { id } => {
            let analysis = client.track_analysis(id).await?;
            print_analysis(id, &analysis);
        }
        Command::Delete { id } => {
            client.delete_song(id).await?;
            println!("Deleted song {}", id);
        }
    }

    Ok(())
}

fn print_analysis(id: u64, analysis: &TrackAnalysis) {
    println!("Track {}", id);
    if let Some(key) = analysis.key {
        let quality = match analysis.is_major {
            Some(true) => " major",
            Some(false) => " minor",
            None => "",
        };
        println!("Key:   {}{}", music::note_name(key), quality);
    }
    if let Some(scale) = &analysis.scale {
        println!("Scale: {} (root {})", scale.name, music::note_name(scale.key));
    }

    let slices = if let Some(stats) = &analysis.note_stats {
        chart_from_stats(stats)
    } else if let Some(intervals) = &analysis.intervals {
        histogram_from_intervals(intervals.iter().copied())
    } else {
        Vec::new()
    };
    if !slices.is_empty() {
        println!("Intervals:");
        print_histogram(&slices);
    }
    if !analysis.measures.is_empty() {
        let matched: usize = analysis.measures.values().map(|m| m.len()).sum();
        println!(
            "Forms: {} match(es) across {} measure(s)",
            matched,
            analysis.measures.len()
        );
    }
}

fn print_histogram(slices: &[ChartSlice]) {
    const BAR_WIDTH: usize = 40;
    for slice in slices {
        let filled = (slice.fraction * BAR_WIDTH as f64).round() as usize;
        println!(
            "  {:>3}  {:<width$}  {}",
            slice.label,
            "#".repeat(filled.min(BAR_WIDTH)),
            slice.count,
            width = BAR_WIDTH
        );
    }
}
