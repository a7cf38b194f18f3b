use glam::{Quat, Vec3};

use crate::animation::action::LoopMode;
use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

/// Which prefab node a track drives.
#[derive(Debug, Clone)]
pub struct TrackMeta {
    /// Index into `Prefab::nodes`.
    pub node_index: usize,
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    pub fn last_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.last_time(),
            TrackData::Quaternion(track) => track.last_time(),
        }
    }
}

/// A full track: target metadata plus keyframe data
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub loop_mode: LoopMode,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Duration is the last keyframe time over all tracks.
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.last_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            loop_mode: LoopMode::Loop,
            tracks,
        }
    }

    /// Extends the duration to at least `length`.
    #[must_use]
    pub fn with_min_duration(mut self, length: f32) -> Self {
        self.duration = self.duration.max(length);
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Tracks driving the node at `node_index`.
    pub fn tracks_for_node(&self, node_index: usize) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.meta.node_index == node_index)
    }
}
