//! The world object model seen by the sensor.
//!
//! A [`WorldObject`] is the sensor's read-only view of one loaded host
//! entity. Its [`ObjectKind`] is a closed set: each variant carries
//! exactly the extra state the descriptor builder can report for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::id::ObjectId;

/// One object currently loaded by the host world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldObject {
    /// Host-assigned identifier.
    pub id: ObjectId,
    /// Display name as reported by the host.
    pub name: String,
    /// Public (authoritative) position.
    pub position: Vec3,
    /// Heading in degrees.
    pub yaw: f64,
    /// Elevation in degrees.
    pub pitch: f64,
    /// Kind-specific payload.
    pub kind: ObjectKind,
}

impl WorldObject {
    /// A [`ObjectKind::Generic`] object with zero orientation.
    pub fn generic(id: impl Into<ObjectId>, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            yaw: 0.0,
            pitch: 0.0,
            kind: ObjectKind::Generic,
        }
    }

    /// Set the orientation, consuming and returning `self`.
    pub fn with_orientation(mut self, yaw: f64, pitch: f64) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Replace the kind, consuming and returning `self`.
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Closed set of object kinds the sensor distinguishes.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// Any object described by its public transform alone.
    Generic,
    /// Another agent whose smoothed transform lives behind the host's
    /// [`interpolated_transform`](crate::WorldView::interpolated_transform)
    /// capability rather than on the object itself.
    RemoteObserver,
    /// A dropped item carrying an item stack.
    DroppedItem(ItemStack),
}

/// The payload carried by a dropped item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Raw registry identifier of the item (e.g. `"minecraft:wool"`).
    pub item: String,
    /// Damage / metadata value used to distinguish sub-types.
    #[serde(default)]
    pub damage: i32,
    /// Stack size.
    pub count: i32,
}

impl ItemStack {
    /// Construct a stack with zero damage value.
    pub fn new(item: impl Into<String>, count: i32) -> Self {
        Self {
            item: item.into(),
            damage: 0,
            count,
        }
    }

    /// Set the damage value, consuming and returning `self`.
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }
}

/// Smoothed (interpolated) transform of a remote observer.
///
/// The host may be unable to supply any individual component, so
/// each one is optional; absent components are left out of the
/// emitted record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterpolatedTransform {
    /// Interpolated x position.
    pub x: Option<f64>,
    /// Interpolated y position.
    pub y: Option<f64>,
    /// Interpolated z position.
    pub z: Option<f64>,
    /// Interpolated yaw.
    pub yaw: Option<f64>,
    /// Interpolated pitch.
    pub pitch: Option<f64>,
}

impl InterpolatedTransform {
    /// A transform with every component present.
    pub fn complete(position: Vec3, yaw: f64, pitch: f64) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            z: Some(position.z),
            yaw: Some(yaw),
            pitch: Some(pitch),
        }
    }
}

/// Catalog resolution of an [`ItemStack`] into a domain item type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawItem {
    /// Domain item type name; replaces the object's display name.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Colour, for coloured item families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    /// Variant, for item families with sub-types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl DrawItem {
    /// A resolution carrying only the item type.
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            colour: None,
            variant: None,
        }
    }

    /// Set the colour, consuming and returning `self`.
    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Set the variant, consuming and returning `self`.
    pub fn with_variant(mut self, variant: impl Into<Variant>) -> Self {
        self.variant = Some(variant.into());
        self
    }
}

/// The sixteen dye colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Colour {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    Silver,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl Colour {
    /// All colours in dye-metadata order.
    pub const ALL: [Colour; 16] = [
        Self::White,
        Self::Orange,
        Self::Magenta,
        Self::LightBlue,
        Self::Yellow,
        Self::Lime,
        Self::Pink,
        Self::Gray,
        Self::Silver,
        Self::Cyan,
        Self::Purple,
        Self::Blue,
        Self::Brown,
        Self::Green,
        Self::Red,
        Self::Black,
    ];

    /// Colour for a wool/dye metadata value, if in range.
    pub fn from_metadata(meta: i32) -> Option<Colour> {
        usize::try_from(meta)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Wire value, as emitted in the `colour` attribute.
    pub fn value(self) -> &'static str {
        match self {
            Self::White => "WHITE",
            Self::Orange => "ORANGE",
            Self::Magenta => "MAGENTA",
            Self::LightBlue => "LIGHT_BLUE",
            Self::Yellow => "YELLOW",
            Self::Lime => "LIME",
            Self::Pink => "PINK",
            Self::Gray => "GRAY",
            Self::Silver => "SILVER",
            Self::Cyan => "CYAN",
            Self::Purple => "PURPLE",
            Self::Blue => "BLUE",
            Self::Brown => "BROWN",
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::Black => "BLACK",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Item sub-type (e.g. `"granite"`, `"birch"`).
///
/// Open set: the catalog owns the vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(pub String);

impl Variant {
    /// Wire value, as emitted in the `variation` attribute.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
