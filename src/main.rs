use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use resonance::model::{TrackSearchResponse, TrackSummary};
use resonance::remote::{DEFAULT_SERVER_URL, RemoteClient};

#[derive(Parser)]
#[command(name = "resonance")]
#[command(about = "Resonance catalog search", long_about = None)]
struct Cli {
    /// Base URL of a running resonance-server
    #[arg(long, global = true, env = "RESONANCE_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search catalog tracks
    Search {
        query: String,
        /// Maximum number of tracks (1-50, server default 10)
        #[arg(long)]
        limit: Option<u32>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the catalog entry for a setlist song
    Match {
        song: String,
        /// Artist name (repeatable)
        #[arg(long = "artist")]
        artists: Vec<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = RemoteClient::new(cli.server)?;

    match cli.command {
        Commands::Search { query, limit, json } => {
            if json {
                let raw = client.search_raw(&query, limit)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&raw).context("serialize search json")?
                );
            } else {
                let found = client.search_tracks(&query, limit)?;
                print_tracks(&found);
            }
        }
        Commands::Match {
            song,
            artists,
            json,
        } => {
            let found = client.match_track(&song, &artists)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&found).context("serialize match json")?
                );
            } else {
                match found {
                    Some(summary) => print_summary(&summary),
                    None => println!("no match"),
                }
            }
        }
    }

    Ok(())
}

fn print_tracks(found: &TrackSearchResponse) {
    if found.tracks.items.is_empty() {
        println!("(no tracks)");
        return;
    }
    for track in &found.tracks.items {
        println!("{}", track_line(&track.summary()));
    }
}

fn print_summary(summary: &TrackSummary) {
    println!("{}", track_line(summary));
    println!("id: {}", summary.id);
    if let Some(url) = &summary.spotify_url {
        println!("url: {}", url);
    }
    if let Some(image) = &summary.image_url {
        println!("image: {}", image);
    }
}

fn track_line(summary: &TrackSummary) -> String {
    let mut line = summary.name.clone();
    if !summary.artists.is_empty() {
        line.push_str(" - ");
        line.push_str(&summary.artists.join(", "));
    }
    if let Some(album) = &summary.album_name {
        line.push_str(&format!(" ({})", album));
    }
    line
}
