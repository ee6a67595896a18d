//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod lastfm;

pub use lastfm::{
    LastfmAlbumTool, LastfmArtistTool, LastfmAuthTool, LastfmChartTool, LastfmLibraryTool,
    LastfmScrobbleTool, LastfmTagTool, LastfmTrackTool, LastfmUserTool,
};
