use std::path::Path;

use serde::Deserialize;

use arena::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Box,
    Cylinder,
}

/// One placed building. Coordinates are world units, `position` is the
/// centre of the footprint on the ground.
#[derive(Clone, Debug, Deserialize)]
pub struct BuildingSpec {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default = "default_size")]
    pub size: [f32; 3],
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub roof: bool,
}

fn default_size() -> [f32; 3] {
    [4.0, 3.0, 4.0]
}

fn default_color() -> [f32; 3] {
    [0.7, 0.65, 0.55]
}

impl BuildingSpec {
    fn is_valid(&self) -> bool {
        let finite = self
            .position
            .iter()
            .chain(self.size.iter())
            .all(|v| v.is_finite())
            && self.rotation_y.is_finite();
        finite && self.size.iter().all(|&s| s > 0.0)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TownLayout {
    #[serde(default)]
    pub player_start: [f32; 2],
    #[serde(default = "default_ground")]
    pub ground_size: f32,
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
}

fn default_ground() -> f32 {
    120.0
}

impl Default for TownLayout {
    fn default() -> Self {
        Self {
            player_start: [0.0, 0.0],
            ground_size: default_ground(),
            buildings: Vec::new(),
        }
    }
}

impl TownLayout {
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut layout: TownLayout = serde_json::from_str(text).map_err(|source| Error::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        layout.buildings.retain(|b| {
            let ok = b.is_valid();
            if !ok {
                log::warn!("skipping building {:?}: bad position or size", b.name);
            }
            ok
        });
        Ok(layout)
    }

    /// A missing file gives an empty town.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("no town layout at {}, ground only", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_entries_are_skipped() {
        let text = r#"{
            "buildings": [
                { "name": "Tavern", "position": [15, 0, 15] },
                { "name": "Flat", "position": [0, 0, 0], "size": [4, 0, 4] }
            ]
        }"#;
        let layout = TownLayout::parse(text, Path::new("inline")).unwrap();
        assert_eq!(layout.buildings.len(), 1);
        assert_eq!(layout.buildings[0].size, [4.0, 3.0, 4.0]);
        assert_eq!(layout.buildings[0].shape, Shape::Box);
    }

    #[test]
    fn shipped_layout_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/town_layout.json");
        let layout = TownLayout::load(&path).unwrap();
        assert_eq!(layout.buildings.len(), 25);
        assert!(layout.buildings.iter().any(|b| b.shape == Shape::Cylinder));
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(matches!(
            TownLayout::parse("{ nope", Path::new("inline")),
            Err(Error::Json { .. })
        ));
    }
}
