//! Biome catalog
//!
//! Ordered, fixed set of environments. Textures and colors are passed through
//! to the renderer untouched; only the obstacle multiplier and the adjacency
//! rule matter to the simulation.

use serde::{Deserialize, Serialize};

/// Environment identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BiomeKind {
    City,
    Forest,
    Desert,
    /// The snow biome
    Winter,
    Highway,
}

/// A biome definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biome {
    pub kind: BiomeKind,
    pub name: &'static str,
    pub texture_prefix: &'static str,
    /// Background color (RGBA)
    pub color: [f32; 4],
    /// Multiplier applied to offset-driven obstacle speed
    pub obstacle_speed: f32,
    /// Ambient music file
    pub music: &'static str,
}

/// Biomes in catalog order
pub const BIOMES: [Biome; 5] = [
    Biome {
        kind: BiomeKind::City,
        name: "CITY",
        texture_prefix: "city_road",
        color: [0.2, 0.2, 0.3, 1.0],
        obstacle_speed: 1.0,
        music: "city.mp3",
    },
    Biome {
        kind: BiomeKind::Forest,
        name: "FOREST",
        texture_prefix: "forest_road",
        color: [0.1, 0.3, 0.1, 1.0],
        obstacle_speed: 1.0,
        music: "forest.mp3",
    },
    Biome {
        kind: BiomeKind::Desert,
        name: "DESERT",
        texture_prefix: "desert_road",
        color: [0.8, 0.7, 0.4, 1.0],
        obstacle_speed: 1.0,
        music: "desert.mp3",
    },
    Biome {
        kind: BiomeKind::Winter,
        name: "WINTER",
        texture_prefix: "winter_road",
        color: [0.9, 0.9, 1.0, 1.0],
        obstacle_speed: 1.0,
        music: "winter.mp3",
    },
    Biome {
        kind: BiomeKind::Highway,
        name: "HIGHWAY",
        texture_prefix: "highway_road",
        color: [0.1, 0.1, 0.2, 1.0],
        obstacle_speed: 1.0,
        music: "highway.mp3",
    },
];

/// Look up a biome by catalog index (clamped)
pub fn biome(index: usize) -> &'static Biome {
    &BIOMES[index.min(BIOMES.len() - 1)]
}

/// Catalog index of a biome kind
pub fn index_of(kind: BiomeKind) -> usize {
    BIOMES.iter().position(|b| b.kind == kind).unwrap_or(0)
}

/// Whether two biomes may never directly follow one another (either order)
pub fn incompatible(a: BiomeKind, b: BiomeKind) -> bool {
    matches!(
        (a, b),
        (BiomeKind::Desert, BiomeKind::Winter) | (BiomeKind::Winter, BiomeKind::Desert)
    )
}

/// Texture identifier for a road segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadTexture {
    Plain(BiomeKind),
    Crossfade { from: BiomeKind, to: BiomeKind },
}

impl RoadTexture {
    pub fn name(&self) -> String {
        match *self {
            RoadTexture::Plain(kind) => biome(index_of(kind)).texture_prefix.to_string(),
            RoadTexture::Crossfade { from, to } => format!(
                "{}_to_{}",
                biome(index_of(from)).texture_prefix,
                biome(index_of(to)).texture_prefix
            ),
        }
    }
}

impl Biome {
    pub fn road_texture(&self) -> RoadTexture {
        RoadTexture::Plain(self.kind)
    }

    /// Cross-fade texture into `next`, if one exists for the ordered pair
    pub fn transition_texture(&self, next: &Biome) -> Option<RoadTexture> {
        if incompatible(self.kind, next.kind) || self.kind == next.kind {
            return None;
        }
        Some(RoadTexture::Crossfade {
            from: self.kind,
            to: next.kind,
        })
    }
}
