use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::animation::action::LoopMode;
use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::prefab::Prefab;
use crate::math::quat_from_euler_degrees;
use crate::scene::transform::Transform;

use super::document::{AnimationDesc, DataPoint, Document, KeyframeDesc};

const CHANNELS: [(&str, TargetPath); 3] = [
    ("position", TargetPath::Translation),
    ("rotation", TargetPath::Rotation),
    ("scale", TargetPath::Scale),
];

/// One clip per animation in the document, bound through `groups`
/// (group uuid -> node index in `prefab`).
pub fn convert_animations(doc: &Document, prefab: &Prefab, groups: &FxHashMap<String, usize>) -> Vec<AnimationClip> {
    doc.animations
        .iter()
        .map(|desc| convert_animation(desc, prefab, groups))
        .collect()
}

/// Converts one animation. Animators whose uuid has no node are dropped.
pub fn convert_animation(desc: &AnimationDesc, prefab: &Prefab, groups: &FxHashMap<String, usize>) -> AnimationClip {
    let mut tracks = Vec::new();

    for (uuid, animator) in &desc.animators {
        if animator.kind != "bone" {
            log::debug!("Ignoring {} animator '{}'", animator.kind, animator.name);
            continue;
        }
        let Some(&node_index) = groups.get(uuid) else {
            continue;
        };
        let Some(node) = prefab.nodes.get(node_index) else {
            continue;
        };

        for (channel, target) in CHANNELS {
            let mut keyframes: Vec<&KeyframeDesc> =
                animator.keyframes.iter().filter(|k| k.channel == channel).collect();
            if keyframes.is_empty() {
                continue;
            }
            keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));

            tracks.push(Track {
                meta: TrackMeta {
                    node_index,
                    node_name: node.name.clone(),
                    target,
                },
                data: build_track(&keyframes, target, &node.transform),
            });
        }
    }

    AnimationClip::new(desc.name.clone(), tracks)
        .with_min_duration(desc.length)
        .with_loop_mode(loop_mode(&desc.loop_mode))
}

fn build_track(keyframes: &[&KeyframeDesc], target: TargetPath, rest: &Transform) -> TrackData {
    let times = keyframes.iter().map(|k| k.time).collect();
    let interpolation = interpolation_mode(keyframes);
    let neutral = if target == TargetPath::Scale { 1.0 } else { 0.0 };
    let values = keyframes.iter().map(|k| keyframe_value(k, neutral));

    match target {
        TargetPath::Translation => TrackData::Vector3(KeyframeTrack::new(
            times,
            values.map(|v| rest.position + v).collect(),
            interpolation,
        )),
        TargetPath::Rotation => TrackData::Quaternion(KeyframeTrack::new(
            times,
            values
                .map(|v| (rest.rotation * quat_from_euler_degrees(v)).normalize())
                .collect::<Vec<Quat>>(),
            interpolation,
        )),
        TargetPath::Scale => TrackData::Vector3(KeyframeTrack::new(times, values.collect(), interpolation)),
    }
}

/// `Step` only when every keyframe steps; any Catmull-Rom key smooths the
/// whole channel.
fn interpolation_mode(keyframes: &[&KeyframeDesc]) -> InterpolationMode {
    if keyframes.iter().all(|k| k.interpolation == "step") {
        InterpolationMode::Step
    } else if keyframes.iter().any(|k| k.interpolation == "catmullrom") {
        InterpolationMode::CatmullRom
    } else {
        InterpolationMode::Linear
    }
}

fn loop_mode(name: &str) -> LoopMode {
    match name {
        "loop" => LoopMode::Loop,
        "once" | "hold" => LoopMode::Once,
        other => {
            log::debug!("Unknown loop mode {other:?}, playing once");
            LoopMode::Once
        }
    }
}

fn keyframe_value(keyframe: &KeyframeDesc, neutral: f32) -> Vec3 {
    let Some(point) = keyframe.data_points.first() else {
        return Vec3::splat(neutral);
    };
    data_point_vec3(point, neutral)
}

fn data_point_vec3(point: &DataPoint, neutral: f32) -> Vec3 {
    Vec3::new(
        component(&point.x, neutral),
        component(&point.y, neutral),
        component(&point.z, neutral),
    )
}

/// A data-point component: a number or a numeric string. Expressions are not
/// evaluated and fall back to `neutral`.
fn component(value: &Value, neutral: f32) -> f32 {
    match value {
        Value::Number(n) => n.as_f64().map_or(neutral, |v| v as f32),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return neutral;
            }
            trimmed.parse::<f32>().unwrap_or_else(|_| {
                log::debug!("Keyframe expression {s:?} is not a number, using {neutral}");
                neutral
            })
        }
        Value::Null => neutral,
        other => {
            log::debug!("Unexpected keyframe component {other}, using {neutral}");
            neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_accept_numbers_and_numeric_strings() {
        assert_eq!(component(&Value::from(2.5), 0.0), 2.5);
        assert_eq!(component(&Value::from(" -3 "), 0.0), -3.0);
        assert_eq!(component(&Value::from("math.sin(q.anim_time)"), 1.0), 1.0);
        assert_eq!(component(&Value::from(""), 1.0), 1.0);
        assert_eq!(component(&Value::Bool(true), 0.0), 0.0);
    }

    #[test]
    fn loop_names_map_to_modes() {
        assert_eq!(loop_mode("loop"), LoopMode::Loop);
        assert_eq!(loop_mode("once"), LoopMode::Once);
        assert_eq!(loop_mode("hold"), LoopMode::Once);
        assert_eq!(loop_mode(""), LoopMode::Once);
    }
}
