//! # Tile Alphabet
//!
//! Every grid cell holds one `TileKind`. Each kind has a fixed character used
//! by the string-per-row layer encoding and a fixed name used by the grouped
//! tile format. Both must stay stable for existing documents to load.

use serde::{Deserialize, Serialize};

/// Tile kinds that can occupy a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Nothing here (outside a dungeon, or no feature on a layer).
    #[default]
    #[serde(rename = "Nothing")]
    Empty = 0,
    /// Primary grass.
    Grass = 1,
    /// Water.
    Water = 2,
    /// Sand / beach.
    #[serde(rename = "Desert")]
    Sand = 3,
    /// Room and corridor floor.
    #[serde(rename = "RockPlates")]
    Pavement = 4,
    /// Dungeon wall.
    Wall = 5,
    /// Grass with red flowers.
    GrassFlowersRed = 6,
    /// Grass with yellow flowers.
    GrassFlowersYellow = 7,
    /// Grass with blue flowers.
    GrassFlowersBlue = 8,
    /// Grass with purple flowers.
    GrassFlowersPurple = 9,
}

impl TileKind {
    /// Every tile kind, in discriminant order.
    pub const ALL: [Self; 10] = [
        Self::Empty,
        Self::Grass,
        Self::Water,
        Self::Sand,
        Self::Pavement,
        Self::Wall,
        Self::GrassFlowersRed,
        Self::GrassFlowersYellow,
        Self::GrassFlowersBlue,
        Self::GrassFlowersPurple,
    ];

    /// Primary grass followed by its flower variants.
    pub const GRASS_KINDS: [Self; 5] = [
        Self::Grass,
        Self::GrassFlowersRed,
        Self::GrassFlowersYellow,
        Self::GrassFlowersBlue,
        Self::GrassFlowersPurple,
    ];

    /// Returns the layer character for this kind.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Empty => '0',
            Self::Grass => '1',
            Self::Water => '2',
            Self::Sand => '4',
            Self::Pavement => 'B',
            Self::Wall => 'H',
            Self::GrassFlowersRed => 'C',
            Self::GrassFlowersYellow => 'D',
            Self::GrassFlowersBlue => 'E',
            Self::GrassFlowersPurple => 'F',
        }
    }

    /// Parses a layer character. Unknown characters return `None`.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Empty),
            '1' => Some(Self::Grass),
            '2' => Some(Self::Water),
            '4' => Some(Self::Sand),
            'B' => Some(Self::Pavement),
            'H' => Some(Self::Wall),
            'C' => Some(Self::GrassFlowersRed),
            'D' => Some(Self::GrassFlowersYellow),
            'E' => Some(Self::GrassFlowersBlue),
            'F' => Some(Self::GrassFlowersPurple),
            _ => None,
        }
    }

    /// Returns the name used by the grouped tile format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Nothing",
            Self::Grass => "Grass",
            Self::Water => "Water",
            Self::Sand => "Desert",
            Self::Pavement => "RockPlates",
            Self::Wall => "Wall",
            Self::GrassFlowersRed => "GrassFlowersRed",
            Self::GrassFlowersYellow => "GrassFlowersYellow",
            Self::GrassFlowersBlue => "GrassFlowersBlue",
            Self::GrassFlowersPurple => "GrassFlowersPurple",
        }
    }

    /// Parses a grouped-format name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Converts from the compact archive representation.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Grass),
            2 => Some(Self::Water),
            3 => Some(Self::Sand),
            4 => Some(Self::Pavement),
            5 => Some(Self::Wall),
            6 => Some(Self::GrassFlowersRed),
            7 => Some(Self::GrassFlowersYellow),
            8 => Some(Self::GrassFlowersBlue),
            9 => Some(Self::GrassFlowersPurple),
            _ => None,
        }
    }

    /// Returns true for primary grass and every flower variant.
    #[must_use]
    pub const fn is_grass(self) -> bool {
        matches!(
            self,
            Self::Grass
                | Self::GrassFlowersRed
                | Self::GrassFlowersYellow
                | Self::GrassFlowersBlue
                | Self::GrassFlowersPurple
        )
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
