//! Last.fm tool definitions, one file per tool.
//!
//! Each tool groups the related Last.fm API methods behind an `operation`
//! discriminator, so clients see a small number of coherent tools instead
//! of one tool per API method.

mod album;
mod artist;
mod auth;
mod chart;
mod common;
mod library;
mod scrobble;
mod tag;
mod track;
mod user;

pub use album::{LastfmAlbumParams, LastfmAlbumTool};
pub use artist::{LastfmArtistParams, LastfmArtistTool};
pub use auth::{LastfmAuthParams, LastfmAuthTool};
pub use chart::{LastfmChartParams, LastfmChartTool};
pub use library::{LastfmLibraryParams, LastfmLibraryTool};
pub use scrobble::{LastfmScrobbleParams, LastfmScrobbleTool};
pub use tag::{LastfmTagParams, LastfmTagTool};
pub use track::{LastfmTrackParams, LastfmTrackTool};
pub use user::{LastfmUserParams, LastfmUserTool};
