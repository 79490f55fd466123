//! Presentation sink: the orchestrator renders through this trait and
//! never assumes a specific output technology.

use crate::transcript::Role;
use jukebox::records::{format_duration_ms, format_release_date};
use jukebox::{ArtistRecord, TrackRecord};
use owo_colors::OwoColorize;
use prettytable::{format, Cell, Row, Table};

pub trait Sink {
    fn render_message(&mut self, role: Role, text: &str);
    fn render_track_list(&mut self, tracks: &[TrackRecord]);
    fn render_artist_list(&mut self, artists: &[ArtistRecord]);
    fn render_error(&mut self, text: &str);
    fn prompt_for_input(&mut self) -> Option<String>;
}

/// Terminal sink: colored transcript, rich track panels, plain artist
/// lines, line-edited input.
pub struct TerminalSink {
    no_color: bool,
    editor: rustyline::DefaultEditor,
}

impl TerminalSink {
    pub fn new(no_color: bool) -> anyhow::Result<Self> {
        Ok(Self {
            no_color,
            editor: rustyline::DefaultEditor::new()?,
        })
    }
}

impl Sink for TerminalSink {
    fn render_message(&mut self, role: Role, text: &str) {
        if self.no_color {
            println!("[{}] {}", role.as_str(), text);
            return;
        }
        match role {
            Role::User => println!("{} {}", "[you]".bright_yellow(), text),
            Role::Assistant => println!("{} {}", "[assistant]".bright_green(), text),
            Role::System => println!("{} {}", "[system]".dimmed(), text.dimmed()),
        }
    }

    fn render_track_list(&mut self, tracks: &[TrackRecord]) {
        for track in tracks {
            println!();
            if self.no_color {
                println!("{}", track.name);
            } else {
                println!("{}", track.name.bright_green().bold());
            }
            println!("  🎤 Artist: {}", track.artist);
            println!("  💿 Album: {}", track.album);
            println!(
                "  📅 Release Date: {}",
                format_release_date(&track.release_date)
            );
            println!("  ⭐ Popularity: {}/100", track.popularity);
            println!("  ⏱  Length: {}", format_duration_ms(track.duration_ms));

            if let Some(features) = &track.features {
                println!("  📊 Track Features:");
                let mut table = Table::new();
                table.set_format(*format::consts::FORMAT_CLEAN);
                let header = if self.no_color {
                    Row::new(vec![Cell::new("Feature"), Cell::new("Value")])
                } else {
                    Row::new(vec![
                        Cell::new("Feature").style_spec("Fb"),
                        Cell::new("Value").style_spec("Fb"),
                    ])
                };
                table.add_row(header);
                for (name, value) in features.rows() {
                    table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
                }
                table.printstd();
            }

            if let Some(preview) = &track.preview_url {
                println!("  🎵 Preview: {preview}");
            }
            if self.no_color {
                println!("  Open in Spotify: {}", track.spotify_url);
                println!("{}", "━".repeat(50));
            } else {
                println!("  Open in Spotify: {}", track.spotify_url.bright_blue());
                println!("{}", "━".repeat(50).bright_black());
            }
        }
    }

    // Deliberately plain next to the track panels; see DESIGN.md.
    fn render_artist_list(&mut self, artists: &[ArtistRecord]) {
        for artist in artists {
            println!("{}", artist.name);
            println!("  👥 Followers: {}", artist.followers);
            println!("  ⭐ Popularity: {}/100", artist.popularity);
            if !artist.genres.is_empty() {
                println!("  🎵 Genres: {}", artist.genres.join(", "));
            }
            if !artist.top_tracks.is_empty() {
                println!("  🎶 Top Tracks: {}", artist.top_tracks.join(", "));
            }
            println!("  {}", artist.spotify_url);
        }
    }

    fn render_error(&mut self, text: &str) {
        if self.no_color {
            eprintln!("✗ {text}");
        } else {
            eprintln!("{} {}", "✗".bright_red(), text.bright_red());
        }
    }

    fn prompt_for_input(&mut self) -> Option<String> {
        match self.editor.readline("crooner> ") {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Some(line)
            }
            Err(_) => None,
        }
    }
}
