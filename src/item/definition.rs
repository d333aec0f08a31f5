use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use std::fmt;
use super::properties::{EquipSlot, NamedVariants, Rarity};
use crate::codec::{Column, Schema};

/// Opaque reference to an icon resource
///
/// The core never loads the image itself; it only carries the name the
/// resource resolver handed back so it can be written out again on export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconHandle(String);

impl IconHandle {
    pub fn new(name: impl Into<String>) -> Self {
        IconHandle(name.into())
    }

    /// Name the icon was resolved from
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The record kinds the database tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
}

impl ItemKind {
    /// File stem used for this kind's persisted database
    pub fn file_stem(self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapons",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potions",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potion",
        };
        f.write_str(name)
    }
}

/// Fields every item kind shares
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemBase {
    /// Display name, unique within its repository
    pub name: String,

    pub icon: Option<IconHandle>,

    pub description: String,

    /// Shop value before modifiers
    pub base_value: f32,

    pub required_level: u32,

    pub rarity: Rarity,

    pub equip_slot: EquipSlot,
}

impl ItemBase {
    pub fn named(name: impl Into<String>) -> Self {
        ItemBase {
            name: name.into(),
            ..ItemBase::default()
        }
    }
}

pub(super) fn set_rarity<R: Item>(record: &mut R, raw: &str) -> bool {
    match Rarity::from_name(raw) {
        Some(rarity) => {
            record.base_mut().rarity = rarity;
            true
        }
        None => false,
    }
}

fn set_equip_slot<R: Item>(record: &mut R, raw: &str) -> bool {
    match EquipSlot::from_name(raw) {
        Some(slot) => {
            record.base_mut().equip_slot = slot;
            true
        }
        None => false,
    }
}

/// Columns for the shared fields other than the name
fn base_columns<R: Item>() -> Vec<Column<R>> {
    vec![
        Column::text(
            "Description",
            |r: &R| r.base().description.clone(),
            |r: &mut R, v| r.base_mut().description = v,
        ),
        Column::icon(
            "Icon",
            |r: &R| r.base().icon.as_ref().map(|icon| icon.name().to_string()),
            |r: &mut R, v| r.base_mut().icon = v,
        ),
        Column::float(
            "Base Value",
            |r: &R| r.base().base_value,
            |r: &mut R, v| r.base_mut().base_value = v,
        ),
        Column::int(
            "Required Level",
            |r: &R| r.base().required_level,
            |r: &mut R, v| r.base_mut().required_level = v,
        ),
        Column::choice("Rarity", |r: &R| r.base().rarity.name().to_string(), set_rarity::<R>),
        Column::choice("Equip Slot", |r: &R| r.base().equip_slot.name().to_string(), set_equip_slot::<R>),
    ]
}

/// Capabilities the database needs from one record kind
///
/// Each kind supplies its CSV schema, how it answers the type filter,
/// and which of its numeric fields must stay non-negative. The controller
/// and repository are generic over this trait instead of being subclassed
/// per kind.
pub trait Item: Clone + Default + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    /// Value the list's type filter is set to
    type TypeTag: Copy + PartialEq + fmt::Debug + 'static;

    const KIND: ItemKind;

    fn base(&self) -> &ItemBase;

    fn base_mut(&mut self) -> &mut ItemBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    /// Column layout used for CSV import/export
    fn schema() -> Schema<Self>;

    /// Fields only editable by hand, not carried in CSV
    fn extra_fields() -> Vec<Column<Self>> {
        Vec::new()
    }

    /// Every editable field: the CSV columns, then the shared base fields,
    /// then the kind's extra fields. A label already taken is not repeated.
    fn fields() -> Schema<Self> {
        let mut columns = Self::schema().columns;
        for column in base_columns::<Self>().into_iter().chain(Self::extra_fields()) {
            if columns.iter().all(|existing| existing.header != column.header) {
                columns.push(column);
            }
        }
        Schema::new(columns)
    }

    /// Whether this record passes the given type filter
    fn matches_type(&self, tag: &Self::TypeTag) -> bool;

    /// Parses a filter value typed by the user
    fn parse_type_tag(raw: &str) -> Option<Self::TypeTag>;

    /// Float fields as `(label, value)`, checked to be finite and non-negative
    fn numeric_fields(&self) -> Vec<(&'static str, f32)> {
        vec![("Base Value", self.base().base_value)]
    }
}
