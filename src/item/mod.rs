// Item records
//
// This module holds the plain data records the databases edit:
// - Shared base fields and the per-kind capability trait
// - Weapon, armor and potion records with their CSV column layouts
// - Rarity, slot and type enums

pub mod armor;
pub mod definition;
pub mod potion;
pub mod properties;
pub mod weapon;

// Re-export main types for convenient access
pub use armor::ArmorRecord;
pub use definition::{IconHandle, Item, ItemBase, ItemKind};
pub use potion::PotionRecord;
pub use properties::{ArmorType, EquipSlot, NamedVariants, Rarity, WeaponType};
pub use weapon::WeaponRecord;
