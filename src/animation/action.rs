use std::sync::Arc;

use crate::animation::{
    binding::TargetPath,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};
use crate::assets::prefab::Prefab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Playback state for one clip.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        let loop_mode = clip.loop_mode;
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode,
            paused: false,
            enabled: true,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    /// Advances playback time by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                // Stop at either end
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
            }
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }

    /// Writes every track's current value into the matching prefab node.
    ///
    /// Tracks whose node index is out of range, or whose value type does not
    /// fit the target property, are ignored.
    pub fn apply_to(&mut self, prefab: &mut Prefab) {
        if !self.enabled {
            return;
        }

        for track_index in 0..self.clip.tracks.len() {
            let meta = &self.clip.tracks[track_index].meta;
            let (node_index, target) = (meta.node_index, meta.target);

            let Some(value) = self.sample_track(track_index) else {
                continue;
            };
            let Some(node) = prefab.nodes.get_mut(node_index) else {
                continue;
            };

            match (target, value) {
                (TargetPath::Translation, TrackValue::Vector3(v)) => node.transform.position = v,
                (TargetPath::Scale, TrackValue::Vector3(v)) => node.transform.scale = v,
                (TargetPath::Rotation, TrackValue::Quaternion(q)) => node.transform.rotation = q,
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(glam::Vec3),
    Quaternion(glam::Quat),
}
