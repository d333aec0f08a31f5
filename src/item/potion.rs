use serde::{Serialize, Deserialize};
use std::convert::Infallible;
use super::definition::{set_rarity, Item, ItemBase, ItemKind};
use super::properties::NamedVariants;
use crate::codec::{Column, Schema};

type PotionColumn = Column<PotionRecord>;

/// A potion entry; potions have no fields beyond the shared base
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PotionRecord {
    pub base: ItemBase,
}

impl PotionRecord {
    pub fn named(name: impl Into<String>) -> Self {
        PotionRecord {
            base: ItemBase::named(name),
        }
    }
}

impl Item for PotionRecord {
    // Potions have no type field, so no filter value can exist
    type TypeTag = Infallible;

    const KIND: ItemKind = ItemKind::Potion;

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn schema() -> Schema<Self> {
        Schema::new(vec![
            PotionColumn::text("Name", |p| p.base.name.clone(), |p, v| p.base.name = v),
            PotionColumn::text("Description", |p| p.base.description.clone(), |p, v| p.base.description = v),
            PotionColumn::float("Base Value", |p| p.base.base_value, |p, v| p.base.base_value = v),
            PotionColumn::choice("Rarity", |p| p.base.rarity.name().to_string(), set_rarity::<PotionRecord>),
        ])
    }

    fn matches_type(&self, tag: &Infallible) -> bool {
        match *tag {}
    }

    fn parse_type_tag(_raw: &str) -> Option<Infallible> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode, NoIcons};
    use crate::item::Rarity;

    #[test]
    fn test_potion_csv_round_trip() {
        let mut tonic = PotionRecord::named("Healing Tonic");
        tonic.base.description = "Restores a little health".to_string();
        tonic.base.base_value = 12.5;
        tonic.base.rarity = Rarity::Uncommon;

        let schema = PotionRecord::schema();
        let text = encode(&[tonic.clone()], &schema);
        assert_eq!(
            text,
            "Name,Description,Base Value,Rarity\nHealing Tonic,Restores a little health,12.5,Uncommon\n"
        );

        let report = decode(&text, &schema, &NoIcons);
        assert_eq!(report.records, vec![tonic]);
    }

    #[test]
    fn test_fields_extend_csv_columns() {
        let headers: Vec<&str> = PotionRecord::fields().columns.iter().map(|c| c.header).collect();
        assert_eq!(
            headers,
            vec!["Name", "Description", "Base Value", "Rarity", "Icon", "Required Level", "Equip Slot"]
        );
    }

    #[test]
    fn test_potions_have_no_type_filter() {
        assert_eq!(PotionRecord::parse_type_tag("Common"), None);
    }
}
