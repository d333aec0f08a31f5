use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::BitOr;

/// Enums whose members are written to CSV by their declared name
///
/// Lookup is exact and case-sensitive: "Sword" matches, "sword" does not.
pub trait NamedVariants: Sized + Copy + PartialEq + 'static {
    /// Every member paired with its declared name, in declaration order
    const VARIANTS: &'static [(&'static str, Self)];

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(variant_name, _)| *variant_name == name)
            .map(|(_, value)| *value)
    }

    /// Declared name of this member
    fn name(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

/// How rare an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl NamedVariants for Rarity {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Common", Rarity::Common),
        ("Uncommon", Rarity::Uncommon),
        ("Rare", Rarity::Rare),
        ("Epic", Rarity::Epic),
        ("Legendary", Rarity::Legendary),
    ];
}

/// Where an item is worn or held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EquipSlot {
    /// Consumables and materials
    #[default]
    NotEquippable,
    Head,
    Chest,
    Legs,
    Feet,
    Hands,
    MainHand,   // Weapon
    OffHand,    // Shield
    Accessory,
}

impl NamedVariants for EquipSlot {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("NotEquippable", EquipSlot::NotEquippable),
        ("Head", EquipSlot::Head),
        ("Chest", EquipSlot::Chest),
        ("Legs", EquipSlot::Legs),
        ("Feet", EquipSlot::Feet),
        ("Hands", EquipSlot::Hands),
        ("MainHand", EquipSlot::MainHand),
        ("OffHand", EquipSlot::OffHand),
        ("Accessory", EquipSlot::Accessory),
    ];
}

/// Weapon families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Sword,
    Axe,
    Mace,
    Dagger,
    Spear,
    Bow,
    Crossbow,
    Staff,
    Wand,
}

impl NamedVariants for WeaponType {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Sword", WeaponType::Sword),
        ("Axe", WeaponType::Axe),
        ("Mace", WeaponType::Mace),
        ("Dagger", WeaponType::Dagger),
        ("Spear", WeaponType::Spear),
        ("Bow", WeaponType::Bow),
        ("Crossbow", WeaponType::Crossbow),
        ("Staff", WeaponType::Staff),
        ("Wand", WeaponType::Wand),
    ];
}

/// Set of body regions an armor piece covers
///
/// A single piece may cover several regions (a full suit is
/// `HEAD | CHEST | LEGS`). Text form joins member names with `|`,
/// and the empty set is written as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmorType(u8);

impl ArmorType {
    pub const NONE: ArmorType = ArmorType(0);
    pub const HEAD: ArmorType = ArmorType(1 << 0);
    pub const CHEST: ArmorType = ArmorType(1 << 1);
    pub const LEGS: ArmorType = ArmorType(1 << 2);
    pub const FEET: ArmorType = ArmorType(1 << 3);
    pub const HANDS: ArmorType = ArmorType(1 << 4);
    pub const SHIELD: ArmorType = ArmorType(1 << 5);

    /// Written in place of an empty set
    pub const EMPTY_NAME: &'static str = "None";

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set here
    ///
    /// An empty `other` is contained in every set.
    pub fn contains(self, other: ArmorType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ArmorType) {
        self.0 |= other.0;
    }

    /// Individual flags set, in declaration order
    pub fn iter(self) -> impl Iterator<Item = ArmorType> {
        Self::VARIANTS
            .iter()
            .map(|(_, flag)| *flag)
            .filter(move |flag| self.contains(*flag))
    }

    /// Parses `Head|Chest` style text
    ///
    /// Every segment must exactly match a member name.
    pub fn parse(text: &str) -> Option<ArmorType> {
        if text == Self::EMPTY_NAME {
            return Some(ArmorType::NONE);
        }

        let mut flags = ArmorType::NONE;
        for segment in text.split('|') {
            flags.insert(ArmorType::from_name(segment.trim())?);
        }
        Some(flags)
    }
}

impl NamedVariants for ArmorType {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Head", ArmorType::HEAD),
        ("Chest", ArmorType::CHEST),
        ("Legs", ArmorType::LEGS),
        ("Feet", ArmorType::FEET),
        ("Hands", ArmorType::HANDS),
        ("Shield", ArmorType::SHIELD),
    ];
}

impl BitOr for ArmorType {
    type Output = ArmorType;

    fn bitor(self, rhs: ArmorType) -> ArmorType {
        ArmorType(self.0 | rhs.0)
    }
}

impl fmt::Display for ArmorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(Self::EMPTY_NAME);
        }

        let names: Vec<&str> = Self::VARIANTS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join("|"))
    }
}
