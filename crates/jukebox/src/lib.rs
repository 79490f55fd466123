//! Music provider gateway for Crooner.
//!
//! Two concerns live here:
//!
//! - [`auth`]: the credential provider. Runs the authorization-code flow
//!   against the provider's accounts service, caches the resulting token
//!   in a local file, and refreshes it silently when it expires.
//! - [`client`] / [`records`]: the capability gateway. Wraps the
//!   provider's remote calls (search, audio features, top tracks,
//!   recommendations, playlist create/add) and translates raw payloads
//!   into display-ready records.
//!
//! The gateway never decides how failures are presented; every operation
//! returns a [`RemoteCallError`] and the caller applies its own
//! degrade-or-surface policy.

pub mod auth;
pub mod client;
pub mod error;
pub mod payload;
pub mod records;

pub use auth::{Authenticator, ClientHandle};
pub use client::{MusicClient, SearchKind};
pub use error::{AuthError, RemoteCallError};
pub use payload::{AudioFeatures, SearchPayload, TrackItem};
pub use records::{ArtistRecord, SearchOutcome, TrackRecord, NO_RESULTS};
