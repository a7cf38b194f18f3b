use crate::assets::TextureHandle;
use crate::settings::{MaterialTemplate, Shading};

/// Material instantiated from the import's [`MaterialTemplate`].
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub shading: Shading,
    /// Base colour map; `None` renders untextured.
    pub map: Option<TextureHandle>,
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    #[must_use]
    pub fn from_template(name: impl Into<String>, template: &MaterialTemplate) -> Self {
        Self {
            name: name.into(),
            shading: template.shading,
            map: None,
            metallic: template.metallic,
            roughness: template.roughness,
        }
    }

    #[must_use]
    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }
}
