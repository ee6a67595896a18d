//! Static operation table: public operation names mapped to Last.fm API
//! methods with their verb, signing, and session requirements.
//!
//! Routing goes through this table rather than ad-hoc string dispatch so the
//! full catalog can be checked exhaustively by tests. Only parameters listed
//! here are forwarded to the provider, which keeps the signed parameter set
//! deterministic for a given invocation.

use super::request::HttpVerb;

/// One entry in the operation table: everything needed to turn a public
/// operation name into a provider API call, before signing.
#[derive(Debug, Clone, Copy)]
pub struct OperationDef {
    /// Public operation name used by the tool layer.
    pub name: &'static str,
    /// Last.fm API method, e.g. `artist.getinfo`.
    pub method: &'static str,
    pub verb: HttpVerb,
    /// Whether the request carries an `api_sig`.
    pub signed: bool,
    /// Whether the request requires an authenticated session (`sk`).
    pub requires_session: bool,
    /// Parameters that must all be present.
    pub required: &'static [&'static str],
    /// Parameters of which at least one must be present.
    pub any_of: &'static [&'static str],
    /// Parameters forwarded when present.
    pub optional: &'static [&'static str],
}

macro_rules! read_op {
    ($name:literal, $method:literal, req: [$($req:literal),*], any: [$($any:literal),*], opt: [$($opt:literal),*]) => {
        OperationDef {
            name: $name,
            method: $method,
            verb: HttpVerb::Get,
            signed: false,
            requires_session: false,
            required: &[$($req),*],
            any_of: &[$($any),*],
            optional: &[$($opt),*],
        }
    };
}

macro_rules! write_op {
    ($name:literal, $method:literal, req: [$($req:literal),*], opt: [$($opt:literal),*]) => {
        OperationDef {
            name: $name,
            method: $method,
            verb: HttpVerb::Post,
            signed: true,
            requires_session: true,
            required: &[$($req),*],
            any_of: &[],
            optional: &[$($opt),*],
        }
    };
}

/// The complete operation catalog.
pub const OPERATIONS: &[OperationDef] = &[
    // ---- artist reads ----
    read_op!("search_artists", "artist.search",
        req: ["artist"], any: [], opt: ["limit", "page"]),
    read_op!("get_artist_info", "artist.getinfo",
        req: [], any: ["artist", "mbid"], opt: ["lang", "autocorrect", "username"]),
    read_op!("get_artist_top_albums", "artist.gettopalbums",
        req: [], any: ["artist", "mbid"], opt: ["autocorrect", "limit", "page"]),
    read_op!("get_artist_top_tracks", "artist.gettoptracks",
        req: [], any: ["artist", "mbid"], opt: ["autocorrect", "limit", "page"]),
    // ---- album reads ----
    read_op!("search_albums", "album.search",
        req: ["album"], any: [], opt: ["limit", "page"]),
    read_op!("get_album_info", "album.getinfo",
        req: [], any: ["album", "mbid"], opt: ["artist", "autocorrect", "username", "lang"]),
    read_op!("get_album_top_tags", "album.gettoptags",
        req: [], any: ["album", "mbid"], opt: ["artist", "autocorrect"]),
    // ---- track reads ----
    read_op!("search_tracks", "track.search",
        req: ["track"], any: [], opt: ["artist", "limit", "page"]),
    read_op!("get_track_info", "track.getinfo",
        req: [], any: ["track", "mbid"], opt: ["artist", "autocorrect", "username"]),
    read_op!("get_similar_tracks", "track.getsimilar",
        req: [], any: ["track", "mbid"], opt: ["artist", "autocorrect", "limit"]),
    read_op!("get_track_top_tags", "track.gettoptags",
        req: [], any: ["track", "mbid"], opt: ["artist", "autocorrect"]),
    // ---- user reads ----
    read_op!("get_user_info", "user.getinfo",
        req: ["user"], any: [], opt: []),
    read_op!("get_user_recent_tracks", "user.getrecenttracks",
        req: ["user"], any: [], opt: ["limit", "page", "from", "to", "extended"]),
    read_op!("get_user_top_artists", "user.gettopartists",
        req: ["user"], any: [], opt: ["period", "limit", "page"]),
    read_op!("get_user_top_albums", "user.gettopalbums",
        req: ["user"], any: [], opt: ["period", "limit", "page"]),
    read_op!("get_user_top_tracks", "user.gettoptracks",
        req: ["user"], any: [], opt: ["period", "limit", "page"]),
    read_op!("get_user_loved_tracks", "user.getlovedtracks",
        req: ["user"], any: [], opt: ["limit", "page"]),
    // ---- tag reads ----
    read_op!("get_tag_info", "tag.getinfo",
        req: ["tag"], any: [], opt: ["lang"]),
    read_op!("get_tag_top_artists", "tag.gettopartists",
        req: ["tag"], any: [], opt: ["limit", "page"]),
    read_op!("get_tag_top_albums", "tag.gettopalbums",
        req: ["tag"], any: [], opt: ["limit", "page"]),
    read_op!("get_tag_top_tracks", "tag.gettoptracks",
        req: ["tag"], any: [], opt: ["limit", "page"]),
    read_op!("get_tag_weekly_chart_list", "tag.getweeklychartlist",
        req: ["tag"], any: [], opt: []),
    // ---- chart reads ----
    read_op!("get_chart_top_artists", "chart.gettopartists",
        req: [], any: [], opt: ["limit", "page"]),
    read_op!("get_chart_top_tracks", "chart.gettoptracks",
        req: [], any: [], opt: ["limit", "page"]),
    read_op!("get_chart_top_tags", "chart.gettoptags",
        req: [], any: [], opt: ["limit", "page"]),
    // ---- authenticated writes ----
    write_op!("scrobble_track", "track.scrobble",
        req: ["artist", "track", "timestamp"],
        opt: ["album", "albumArtist", "duration", "streamId", "chosenByUser",
              "context", "trackNumber", "mbid"]),
    write_op!("update_now_playing", "track.updateNowPlaying",
        req: ["artist", "track"],
        opt: ["album", "albumArtist", "duration", "trackNumber", "mbid", "context"]),
    write_op!("love_track", "track.love", req: ["artist", "track"], opt: []),
    write_op!("unlove_track", "track.unlove", req: ["artist", "track"], opt: []),
    write_op!("add_track_tags", "track.addTags", req: ["artist", "track", "tags"], opt: []),
    write_op!("remove_track_tag", "track.removeTag", req: ["artist", "track", "tag"], opt: []),
    // ---- auth handshake (signed, no session yet) ----
    OperationDef {
        name: "get_auth_token",
        method: "auth.getToken",
        verb: HttpVerb::Get,
        signed: true,
        requires_session: false,
        required: &[],
        any_of: &[],
        optional: &[],
    },
    OperationDef {
        name: "get_auth_session",
        method: "auth.getSession",
        verb: HttpVerb::Post,
        signed: true,
        requires_session: false,
        required: &[],
        any_of: &[],
        // falls back to the pending token stored by get_auth_token
        optional: &["token"],
    },
    OperationDef {
        name: "get_mobile_session",
        method: "auth.getMobileSession",
        verb: HttpVerb::Post,
        signed: true,
        requires_session: false,
        required: &["username", "password"],
        any_of: &[],
        optional: &[],
    },
];

/// Look up an operation by its public name.
pub fn find(name: &str) -> Option<&'static OperationDef> {
    OPERATIONS.iter().find(|op| op.name == name)
}
