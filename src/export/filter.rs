//! Track filters applied at export time
//!
//! A filter restricts both the Tracks dictionary and every playlist's
//! item array.

use crate::model::Track;

/// Decides whether a track is written to the library file
pub trait TrackFilter {
    fn accepts(&self, track: &Track) -> bool;
}

impl<F> TrackFilter for F
where
    F: Fn(&Track) -> bool,
{
    fn accepts(&self, track: &Track) -> bool {
        self(track)
    }
}

/// Accepts every track
#[derive(Debug, Clone, Copy, Default)]
pub struct AllTracks;

impl TrackFilter for AllTracks {
    fn accepts(&self, _track: &Track) -> bool {
        true
    }
}

/// Accepts tracks rated at least `min_rating`
///
/// Computed ratings are inherited from the album rather than set on the
/// track; they are rejected unless `include_computed` is set.
#[derive(Debug, Clone, Copy)]
pub struct RatingFilter {
    pub min_rating: i64,
    pub include_computed: bool,
}

impl TrackFilter for RatingFilter {
    fn accepts(&self, track: &Track) -> bool {
        if track.rating_computed && !self.include_computed {
            return false;
        }
        track.rating >= self.min_rating
    }
}
