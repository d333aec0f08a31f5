use serde::{Serialize, Deserialize};
use super::definition::{IconHandle, Item, ItemBase, ItemKind};
use super::properties::ArmorType;
use crate::codec::{Column, Schema};

type ArmorColumn = Column<ArmorRecord>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmorRecord {
    pub base: ItemBase,

    /// Body regions covered, may hold several flags
    pub armor_type: ArmorType,
}

impl ArmorRecord {
    pub fn named(name: impl Into<String>) -> Self {
        ArmorRecord {
            base: ItemBase::named(name),
            ..ArmorRecord::default()
        }
    }
}

fn set_armor_type(armor: &mut ArmorRecord, raw: &str) -> bool {
    match ArmorType::parse(raw) {
        Some(flags) => {
            armor.armor_type = flags;
            true
        }
        None => false,
    }
}

impl Item for ArmorRecord {
    type TypeTag = ArmorType;

    const KIND: ItemKind = ItemKind::Armor;

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn schema() -> Schema<Self> {
        Schema::new(vec![
            ArmorColumn::text("Item Name", |a| a.base.name.clone(), |a, v| a.base.name = v),
            ArmorColumn::choice("Armor Type", |a| a.armor_type.to_string(), set_armor_type),
            ArmorColumn::icon(
                "Icon",
                |a| a.base.icon.as_ref().map(|icon| icon.name().to_string()),
                |a, v: Option<IconHandle>| a.base.icon = v,
            ),
        ])
    }

    /// Passes when every flag of the filter is set on this piece
    fn matches_type(&self, tag: &ArmorType) -> bool {
        self.armor_type.contains(*tag)
    }

    fn parse_type_tag(raw: &str) -> Option<ArmorType> {
        ArmorType::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_matches_any_covering_piece() {
        let mut suit = ArmorRecord::named("Plate Suit");
        suit.armor_type = ArmorType::HEAD | ArmorType::CHEST;

        assert!(suit.matches_type(&ArmorType::CHEST));
        assert!(suit.matches_type(&ArmorType::HEAD));
        assert!(!suit.matches_type(&ArmorType::SHIELD));
    }

    #[test]
    fn test_parse_type_tag() {
        assert_eq!(ArmorRecord::parse_type_tag("Shield"), Some(ArmorType::SHIELD));
        assert_eq!(ArmorRecord::parse_type_tag("Cape"), None);
    }
}
