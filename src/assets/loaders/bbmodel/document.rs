//! In-memory view of a `.bbmodel` document.
//!
//! Parsing happens in two steps: the document envelope is deserialized with
//! `serde`, then every element, outliner entry and animation is converted on
//! its own so that one malformed entry is logged and skipped instead of
//! failing the whole import.

use std::path::Path;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::errors::{ImportError, Result};

// ============================================================================
// 1. Raw envelope
// ============================================================================

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    model_identifier: Option<String>,
    #[serde(default)]
    resolution: Resolution,
    #[serde(default)]
    textures: Vec<TextureDesc>,
    #[serde(default)]
    elements: Vec<Value>,
    #[serde(default)]
    outliner: Vec<Value>,
    #[serde(default)]
    animations: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Resolution {
    #[serde(default = "default_resolution")]
    width: f32,
    #[serde(default = "default_resolution")]
    height: f32,
}

fn default_resolution() -> f32 {
    16.0
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: default_resolution(),
            height: default_resolution(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// 2. Textures
// ============================================================================

/// One entry of the document's texture list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextureDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    /// Embedded image, normally `data:image/png;base64,...`.
    #[serde(default)]
    pub source: Option<String>,
    /// UV resolution of this texture, independent of its pixel size.
    #[serde(default)]
    pub uv_width: Option<f32>,
    #[serde(default)]
    pub uv_height: Option<f32>,
}

impl TextureDesc {
    /// Declared UV resolution, when both axes are present.
    pub fn uv_resolution(&self) -> Option<Vec2> {
        Some(Vec2::new(self.uv_width?, self.uv_height?))
    }
}

// ============================================================================
// 3. Elements
// ============================================================================

/// Fields every element kind shares.
#[derive(Deserialize)]
struct ElementHeader {
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    visibility: bool,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    origin: Option<[f32; 3]>,
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 3]>,
}

/// Side of a cube, in the order faces are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFaceSide {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl CubeFaceSide {
    pub const ALL: [CubeFaceSide; 6] = [
        CubeFaceSide::North,
        CubeFaceSide::East,
        CubeFaceSide::South,
        CubeFaceSide::West,
        CubeFaceSide::Up,
        CubeFaceSide::Down,
    ];
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CubeFace {
    /// `[u1, v1, u2, v2]` in pixel space.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    #[serde(default)]
    texture: Option<Value>,
    /// Clockwise UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: f32,
}

impl CubeFace {
    /// Material index, `None` when the face has no texture assigned.
    pub fn material_index(&self) -> Option<usize> {
        self.texture
            .as_ref()
            .and_then(Value::as_u64)
            .map(|i| i as usize)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CubeFaces {
    #[serde(default)]
    pub north: Option<CubeFace>,
    #[serde(default)]
    pub east: Option<CubeFace>,
    #[serde(default)]
    pub south: Option<CubeFace>,
    #[serde(default)]
    pub west: Option<CubeFace>,
    #[serde(default)]
    pub up: Option<CubeFace>,
    #[serde(default)]
    pub down: Option<CubeFace>,
}

impl CubeFaces {
    pub fn get(&self, side: CubeFaceSide) -> Option<&CubeFace> {
        match side {
            CubeFaceSide::North => self.north.as_ref(),
            CubeFaceSide::East => self.east.as_ref(),
            CubeFaceSide::South => self.south.as_ref(),
            CubeFaceSide::West => self.west.as_ref(),
            CubeFaceSide::Up => self.up.as_ref(),
            CubeFaceSide::Down => self.down.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CubeShape {
    pub from: [f32; 3],
    pub to: [f32; 3],
    #[serde(default)]
    pub inflate: f32,
    #[serde(default)]
    pub faces: CubeFaces,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshFace {
    /// Vertex names in declaration order.
    pub vertices: SmallVec<[String; 4]>,
    #[serde(default)]
    pub uv: FxHashMap<String, [f32; 2]>,
    /// Material index; absent means the first texture.
    #[serde(default)]
    pub texture: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MeshShape {
    pub vertices: FxHashMap<String, Vec3>,
    /// Faces keyed by their name, in declaration order.
    pub faces: Vec<(String, MeshFace)>,
}

#[derive(Deserialize)]
struct RawMeshShape {
    #[serde(default)]
    vertices: FxHashMap<String, [f32; 3]>,
    #[serde(default)]
    faces: serde_json::Map<String, Value>,
}

impl MeshShape {
    fn from_value(value: &Value) -> std::result::Result<Self, serde_json::Error> {
        let raw = RawMeshShape::deserialize(value)?;
        let faces = raw
            .faces
            .iter()
            .map(|(key, face)| Ok((key.clone(), MeshFace::deserialize(face)?)))
            .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?;
        Ok(Self {
            vertices: raw
                .vertices
                .into_iter()
                .map(|(name, p)| (name, Vec3::from(p)))
                .collect(),
            faces,
        })
    }
}

/// Element shape, decided once at parse time.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Cube(CubeShape),
    Mesh(MeshShape),
    Locator,
    /// Any other `type`, kept so the outliner can report it.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub uuid: String,
    pub name: String,
    pub visible: bool,
    /// Pivot in source space. A locator's pivot is its `position`.
    pub origin: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub kind: ElementKind,
}

impl Element {
    /// Converts one entry of the `elements` array.
    pub fn from_value(value: &Value) -> Result<Self> {
        let header = ElementHeader::deserialize(value)?;
        let uuid = header.uuid;
        let malformed = |err: serde_json::Error| ImportError::malformed(uuid.clone(), err.to_string());

        let kind = match header.kind.as_deref() {
            None | Some("cube") => ElementKind::Cube(CubeShape::deserialize(value).map_err(malformed)?),
            Some("mesh") => ElementKind::Mesh(MeshShape::from_value(value).map_err(malformed)?),
            Some("locator") => ElementKind::Locator,
            Some(other) => ElementKind::Unsupported(other.to_string()),
        };

        let origin = match kind {
            ElementKind::Locator => header.position.or(header.origin),
            _ => header.origin,
        };

        Ok(Self {
            uuid,
            name: header.name,
            visible: header.visibility,
            origin: origin.map(Vec3::from).unwrap_or_default(),
            rotation: header.rotation.map(Vec3::from).unwrap_or_default(),
            kind,
        })
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn has_geometry(&self) -> bool {
        matches!(self.kind, ElementKind::Cube(_) | ElementKind::Mesh(_))
    }
}

// ============================================================================
// 4. Outliner
// ============================================================================

#[derive(Debug, Clone)]
pub struct Group {
    pub uuid: String,
    pub name: String,
    pub origin: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub children: Vec<OutlinerNode>,
}

#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    origin: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 3]>,
    #[serde(default)]
    children: Vec<Value>,
}

#[derive(Debug, Clone)]
pub enum OutlinerNode {
    /// Reference to an element by uuid.
    Element(String),
    Group(Group),
    /// Anything else; carries a short description for the log.
    Unsupported(String),
}

impl OutlinerNode {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(uuid) => OutlinerNode::Element(uuid.clone()),
            Value::Object(_) => match RawGroup::deserialize(value) {
                Ok(raw) => OutlinerNode::Group(Group {
                    uuid: raw.uuid,
                    name: raw.name,
                    origin: raw.origin.map(Vec3::from).unwrap_or_default(),
                    rotation: raw.rotation.map(Vec3::from).unwrap_or_default(),
                    children: raw.children.iter().map(OutlinerNode::from_value).collect(),
                }),
                Err(err) => OutlinerNode::Unsupported(format!("malformed group ({err})")),
            },
            other => OutlinerNode::Unsupported(json_type_name(other).to_string()),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// 5. Animations
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub x: Value,
    #[serde(default)]
    pub y: Value,
    #[serde(default)]
    pub z: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyframeDesc {
    pub channel: String,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
    #[serde(default)]
    pub time: f32,
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
}

fn default_interpolation() -> String {
    "linear".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimatorDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_animator_type", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub keyframes: Vec<KeyframeDesc>,
}

fn default_animator_type() -> String {
    "bone".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationDesc {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    /// `loop`, `once` or `hold`.
    #[serde(default, rename = "loop")]
    pub loop_mode: String,
    #[serde(default)]
    pub length: f32,
    /// Animators keyed by the uuid of the group they drive, in file order.
    #[serde(default, deserialize_with = "ordered_animators")]
    pub animators: Vec<(String, AnimatorDesc)>,
}

fn ordered_animators<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, AnimatorDesc)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
    let mut animators = Vec::with_capacity(map.len());
    for (uuid, value) in map {
        match AnimatorDesc::deserialize(&value) {
            Ok(animator) => animators.push((uuid, animator)),
            Err(err) => log::warn!("Skipping malformed animator {uuid}: {err}"),
        }
    }
    Ok(animators)
}

// ============================================================================
// 6. Document
// ============================================================================

/// A parsed `.bbmodel` file. Read-only input of one import pass.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub name: String,
    pub model_identifier: Option<String>,
    /// Global UV resolution.
    pub resolution: Vec2,
    pub textures: Vec<TextureDesc>,
    pub elements: Vec<Element>,
    pub outliner: Vec<OutlinerNode>,
    pub animations: Vec<AnimationDesc>,

    element_lookup: FxHashMap<String, usize>,
}

impl Document {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;

        let mut elements = Vec::with_capacity(raw.elements.len());
        for value in &raw.elements {
            match Element::from_value(value) {
                Ok(element) => elements.push(element),
                Err(err) => log::warn!("Skipping element: {err}"),
            }
        }

        let animations = raw
            .animations
            .iter()
            .filter_map(|value| match AnimationDesc::deserialize(value) {
                Ok(anim) => Some(anim),
                Err(err) => {
                    log::warn!("Skipping malformed animation: {err}");
                    None
                }
            })
            .collect();

        let mut doc = Self {
            name: raw.name,
            model_identifier: raw.model_identifier.filter(|id| !id.is_empty()),
            resolution: Vec2::new(raw.resolution.width, raw.resolution.height),
            textures: raw.textures,
            elements: Vec::new(),
            outliner: raw.outliner.iter().map(OutlinerNode::from_value).collect(),
            animations,
            element_lookup: FxHashMap::default(),
        };
        doc.set_elements(elements);
        Ok(doc)
    }

    /// Replaces the element list and rebuilds the uuid lookup.
    ///
    /// On duplicate uuids the first declared element wins.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        let mut lookup = FxHashMap::default();
        lookup.reserve(elements.len());
        for (i, element) in elements.iter().enumerate() {
            if lookup.contains_key(&element.uuid) {
                log::warn!("Duplicate element uuid {}, keeping the first one", element.uuid);
                continue;
            }
            lookup.insert(element.uuid.clone(), i);
        }
        self.element_lookup = lookup;
        self.elements = elements;
    }

    pub fn element(&self, uuid: &str) -> Option<&Element> {
        self.element_lookup.get(uuid).map(|&i| &self.elements[i])
    }

    /// Key of the root prefab: the model identifier, else the name.
    pub fn root_identifier(&self) -> &str {
        self.model_identifier.as_deref().unwrap_or(&self.name)
    }
}
