//! The action convention between the language model and the dispatcher.
//!
//! The model is instructed to embed `ACTION_REQUIRED:` in a reply when it
//! wants a lookup performed. Grammar, applied to everything after the
//! first occurrence of the marker: the first whitespace-delimited token
//! names the action kind, the remaining tokens joined by single spaces
//! are the query. Unrecognized kinds parse to nothing, so the reply is
//! still shown but no lookup happens.

/// Literal marker the model embeds in replies requesting a lookup.
pub const ACTION_MARKER: &str = "ACTION_REQUIRED:";

/// A recognized, parsed action directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SearchTrack(String),
    SearchArtist(String),
}

impl Action {
    /// Scan a completion reply for the marker and parse the directive.
    ///
    /// `None` means either no marker or an unrecognized action kind;
    /// both are handled identically (render the reply, do nothing else).
    pub fn parse(reply: &str) -> Option<Action> {
        let (_, rest) = reply.split_once(ACTION_MARKER)?;
        let mut tokens = rest.split_whitespace();
        let kind = tokens.next()?;
        let query = tokens.collect::<Vec<_>>().join(" ");
        match kind {
            "SEARCH_TRACK" => Some(Action::SearchTrack(query)),
            "SEARCH_ARTIST" => Some(Action::SearchArtist(query)),
            _ => None,
        }
    }
}
