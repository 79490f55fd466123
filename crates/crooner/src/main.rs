use anyhow::{bail, Context, Result};
use clap::Parser;
use croonconf::CroonConfig;
use crooner::{OpenAiClient, Orchestrator, Role, Sink, TerminalSink, Transcript};
use jukebox::{Authenticator, MusicClient, TrackRecord};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Crooner - chat with an assistant about music
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a config file (overrides ./crooner.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = CroonConfig::load_from(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level)),
        )
        .init();

    if args.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        bail!(
            "Missing required credentials:\n  {}",
            missing.join("\n  ")
        );
    }

    info!("Crooner starting");
    info!("  model: {}", config.openai.model);
    info!("  market: {}", config.spotify.market);

    let handle = Authenticator::new(config.spotify.clone())
        .acquire()
        .await
        .context("Music service authorization failed")?;
    let gateway = MusicClient::new(handle, &config.spotify);
    let backend = OpenAiClient::new(&config.openai);
    let orchestrator = Orchestrator::new(backend, gateway);

    let mut sink = TerminalSink::new(args.no_color)?;
    let mut transcript = Transcript::new();
    let mut last_tracks: Vec<TrackRecord> = Vec::new();

    println!("{}", "🎵 Crooner".bright_cyan().bold());
    println!("{}", "━".repeat(50).bright_black());
    println!("Chat about music! Ask about songs, artists, or get recommendations.");
    println!("Type '/help' for commands, '/quit' to leave\n");

    loop {
        let Some(line) = sink.prompt_for_input() else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" | "quit" | "exit" => break,
            "/help" | "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        if let Some(arg) = line.strip_prefix("/similar") {
            similar_command(orchestrator.gateway(), &mut sink, &last_tracks, arg.trim()).await;
            continue;
        }
        if let Some(arg) = line.strip_prefix("/playlist") {
            playlist_command(orchestrator.gateway(), &mut sink, &last_tracks, arg.trim()).await;
            continue;
        }

        match orchestrator
            .handle_turn(&mut transcript, &mut sink, line)
            .await
        {
            Ok(Some(tracks)) => last_tracks = tracks,
            Ok(None) => {}
            Err(e) => sink.render_error(&format!("Completion request failed: {e}")),
        }
    }

    println!("Goodbye! 👋");
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  /similar <n>      Find songs similar to track n of the last results");
    println!("  /playlist <name>  Save the last track results as a playlist");
    println!("  /help             Show this help");
    println!("  /quit             Leave");
    println!("Anything else is sent to the assistant.");
}

/// Best-effort enrichment: a failed lookup logs and shows nothing,
/// matching the silent-degrade policy for recommendations.
async fn similar_command(
    gateway: &MusicClient,
    sink: &mut TerminalSink,
    last_tracks: &[TrackRecord],
    arg: &str,
) {
    let Ok(index) = arg.parse::<usize>() else {
        sink.render_error("Usage: /similar <result number>");
        return;
    };
    let Some(track) = index.checked_sub(1).and_then(|i| last_tracks.get(i)) else {
        sink.render_error("No such track in the last results");
        return;
    };

    match gateway.similar_tracks(&track.id, 5).await {
        Ok(similar) if !similar.is_empty() => {
            println!("Similar Songs:");
            for item in &similar {
                let artist = item
                    .artists
                    .first()
                    .map(|a| a.name.as_str())
                    .unwrap_or("unknown");
                println!("- {} by {} ({})", item.name, artist, item.external_urls.spotify);
            }
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "similar tracks lookup failed");
        }
    }
}

async fn playlist_command(
    gateway: &MusicClient,
    sink: &mut TerminalSink,
    last_tracks: &[TrackRecord],
    arg: &str,
) {
    if last_tracks.is_empty() {
        sink.render_error("Search for some tracks first");
        return;
    }
    let name = if arg.is_empty() { "Crooner Picks" } else { arg };
    let message = gateway
        .create_recommendation_playlist(last_tracks, name)
        .await;
    sink.render_message(Role::Assistant, &message);
}
