//! Conversation orchestration: transcript upkeep, completion calls, and
//! action dispatch to the music gateway.

use crate::action::Action;
use crate::completion::{CompletionBackend, CompletionError};
use crate::render::Sink;
use crate::transcript::{ChatMessage, Role, Transcript};
use jukebox::{MusicClient, SearchKind, SearchOutcome, TrackRecord, NO_RESULTS};

/// Persona plus the action convention. Kept narrowed to the two action
/// kinds the dispatcher implements so the model never requests a lookup
/// that silently goes nowhere.
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable music assistant that helps users \
discover and learn about music. You can search for songs, provide information about artists, \
and make recommendations. Keep responses concise and music-focused. If you need to look up \
specific music information, indicate it with ACTION_REQUIRED: followed by SEARCH_TRACK or \
SEARCH_ARTIST and the search terms.";

/// Search results requested per action.
const RESULT_LIMIT: u32 = 5;

pub struct Orchestrator<B> {
    backend: B,
    gateway: MusicClient,
}

impl<B: CompletionBackend> Orchestrator<B> {
    pub fn new(backend: B, gateway: MusicClient) -> Self {
        Self { backend, gateway }
    }

    pub fn gateway(&self) -> &MusicClient {
        &self.gateway
    }

    /// One completion call over the system instruction plus the full
    /// transcript. Errors are terminal for the turn; nothing retries.
    pub async fn respond(&self, transcript: &Transcript) -> Result<String, CompletionError> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend_from_slice(transcript.messages());
        self.backend.complete(&messages).await
    }

    /// Run one full turn: append the user message, obtain the reply,
    /// dispatch any embedded action, append the raw reply (marker text
    /// unstripped), render the transcript.
    ///
    /// Returns the track records rendered this turn, if any, so the
    /// caller can offer follow-up operations on them.
    pub async fn handle_turn(
        &self,
        transcript: &mut Transcript,
        sink: &mut dyn Sink,
        user_text: &str,
    ) -> Result<Option<Vec<TrackRecord>>, CompletionError> {
        transcript.push(Role::User, user_text);
        let reply = self.respond(transcript).await?;

        let mut rendered_tracks = None;
        if let Some(action) = Action::parse(&reply) {
            rendered_tracks = self.dispatch(sink, action).await;
        }

        transcript.push(Role::Assistant, &reply);
        for message in transcript.messages() {
            sink.render_message(message.role, &message.content);
        }
        Ok(rendered_tracks)
    }

    /// Failure policy lives here: searches surface an error message,
    /// enrichment failures inside processing degrade silently.
    async fn dispatch(&self, sink: &mut dyn Sink, action: Action) -> Option<Vec<TrackRecord>> {
        match action {
            Action::SearchTrack(query) => {
                let payload = match self
                    .gateway
                    .search(&query, SearchKind::Track, RESULT_LIMIT)
                    .await
                {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        sink.render_error(&format!("Error searching the music service: {e}"));
                        None
                    }
                };
                match self.gateway.process_tracks(payload).await {
                    SearchOutcome::Records(tracks) => {
                        sink.render_track_list(&tracks);
                        Some(tracks)
                    }
                    SearchOutcome::NoResults => {
                        sink.render_message(Role::Assistant, NO_RESULTS);
                        None
                    }
                }
            }
            Action::SearchArtist(query) => {
                let payload = match self
                    .gateway
                    .search(&query, SearchKind::Artist, RESULT_LIMIT)
                    .await
                {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        sink.render_error(&format!("Error searching the music service: {e}"));
                        None
                    }
                };
                match self.gateway.process_artists(payload).await {
                    SearchOutcome::Records(artists) => sink.render_artist_list(&artists),
                    SearchOutcome::NoResults => sink.render_message(Role::Assistant, NO_RESULTS),
                }
                None
            }
        }
    }
}
