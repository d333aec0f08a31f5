use serde::{Serialize, Deserialize};
use super::definition::{Item, ItemBase, ItemKind};
use super::properties::{NamedVariants, WeaponType};
use crate::codec::{Column, Schema};

type WeaponColumn = Column<WeaponRecord>;

/// A weapon entry in the weapon database
///
/// Carries both the authoring stats (attack power, speed, ...) and the
/// columns of the weapon sheet that is exchanged as CSV. `range` is
/// shared by both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponRecord {
    pub base: ItemBase,

    pub weapon_type: WeaponType,
    pub attack_power: f32,
    pub attack_speed: f32,
    pub durability: f32,
    pub range: f32,
    pub critical_hit_chance: f32,

    /// Damage per hit as listed on the weapon sheet
    pub damage: u32,

    /// Shots or swings per second
    pub fire_rate: f32,

    /// 0 for melee weapons
    pub ammo_capacity: u32,
}

impl WeaponRecord {
    pub fn named(name: impl Into<String>) -> Self {
        WeaponRecord {
            base: ItemBase::named(name),
            ..WeaponRecord::default()
        }
    }
}

fn set_weapon_type(weapon: &mut WeaponRecord, raw: &str) -> bool {
    match WeaponType::from_name(raw) {
        Some(weapon_type) => {
            weapon.weapon_type = weapon_type;
            true
        }
        None => false,
    }
}

impl Item for WeaponRecord {
    type TypeTag = WeaponType;

    const KIND: ItemKind = ItemKind::Weapon;

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn schema() -> Schema<Self> {
        Schema::new(vec![
            WeaponColumn::text("Name", |w| w.base.name.clone(), |w, v| w.base.name = v),
            WeaponColumn::int("Damage", |w| w.damage, |w, v| w.damage = v),
            WeaponColumn::float("Range", |w| w.range, |w, v| w.range = v),
            WeaponColumn::float("Fire Rate", |w| w.fire_rate, |w, v| w.fire_rate = v),
            WeaponColumn::int("Ammo Capacity", |w| w.ammo_capacity, |w, v| w.ammo_capacity = v),
        ])
    }

    fn extra_fields() -> Vec<WeaponColumn> {
        vec![
            WeaponColumn::choice("Weapon Type", |w| w.weapon_type.name().to_string(), set_weapon_type),
            WeaponColumn::float("Attack Power", |w| w.attack_power, |w, v| w.attack_power = v),
            WeaponColumn::float("Attack Speed", |w| w.attack_speed, |w, v| w.attack_speed = v),
            WeaponColumn::float("Durability", |w| w.durability, |w, v| w.durability = v),
            WeaponColumn::float(
                "Critical Hit Chance",
                |w| w.critical_hit_chance,
                |w, v| w.critical_hit_chance = v,
            ),
        ]
    }

    fn matches_type(&self, tag: &WeaponType) -> bool {
        self.weapon_type == *tag
    }

    fn parse_type_tag(raw: &str) -> Option<WeaponType> {
        WeaponType::from_name(raw)
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("Base Value", self.base.base_value),
            ("Attack Power", self.attack_power),
            ("Attack Speed", self.attack_speed),
            ("Durability", self.durability),
            ("Range", self.range),
            ("Critical Hit Chance", self.critical_hit_chance),
            ("Fire Rate", self.fire_rate),
        ]
    }
}
