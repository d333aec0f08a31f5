// CSV import/export
//
// Records are written one per line with fields joined by commas. Nothing
// is quoted or escaped, so a comma or newline inside a text field (a
// description, say) splits that field on the way back in.

pub mod error;
pub mod resolver;
pub mod schema;

pub use error::{CodecError, RowError};
pub use resolver::{IconDirectory, NoIcons, ResourceResolver};
pub use schema::{Accessor, Column, FieldType, Schema};

use tracing::{debug, warn};

/// Outcome of decoding a CSV document
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport<R> {
    /// Successfully built records, in file order
    pub records: Vec<R>,

    /// Rows dropped because a field failed to parse
    pub rejected: Vec<RowError>,

    /// Line numbers of rows skipped for having too few columns
    pub short_rows: Vec<usize>,
}

/// Encodes records as CSV text
///
/// The first line holds the column headers. Every line, including the
/// last, ends with `\n`.
pub fn encode<'a, R: 'a>(records: impl IntoIterator<Item = &'a R>, schema: &Schema<R>) -> String {
    let mut out = schema.header_line();
    out.push('\n');

    for record in records {
        let fields: Vec<String> = schema
            .columns
            .iter()
            .map(|column| column.read(record))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Decodes CSV text into records
///
/// The first line is always treated as a header and discarded. Blank
/// lines are ignored, short rows are skipped, and a row with any field
/// that fails to parse is dropped entirely. Decoding never fails as a
/// whole. Decoded names are not validated.
pub fn decode<R: Default>(
    text: &str,
    schema: &Schema<R>,
    resolver: &dyn ResourceResolver,
) -> DecodeReport<R> {
    let mut report = DecodeReport {
        records: Vec::new(),
        rejected: Vec::new(),
        short_rows: Vec::new(),
    };

    for (index, row) in text.split('\n').enumerate().skip(1) {
        let line = index + 1;
        if row.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < schema.min_columns {
            debug!(line, columns = fields.len(), "skipping short row");
            report.short_rows.push(line);
            continue;
        }

        match decode_row(&fields, schema, resolver) {
            Ok(record) => report.records.push(record),
            Err(error) => {
                warn!(line, %error, "dropping row");
                report.rejected.push(RowError { line, error });
            }
        }
    }

    report
}

fn decode_row<R: Default>(
    fields: &[&str],
    schema: &Schema<R>,
    resolver: &dyn ResourceResolver,
) -> Result<R, CodecError> {
    let mut record = R::default();
    for (column, &raw) in schema.columns.iter().zip(fields) {
        // Text is kept as written so names like "Axe " survive a round trip
        let raw = match column.field_type() {
            FieldType::Text => raw.strip_suffix('\r').unwrap_or(raw),
            _ => raw.trim(),
        };
        column.write(&mut record, raw, resolver)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ArmorRecord, ArmorType, IconHandle, Item, WeaponRecord};

    fn axe() -> WeaponRecord {
        let mut axe = WeaponRecord::named("Axe");
        axe.damage = 10;
        axe.range = 1.5;
        axe.fire_rate = 0.5;
        axe.ammo_capacity = 0;
        axe
    }

    #[test]
    fn test_encode_weapons() {
        let text = encode(&[axe()], &WeaponRecord::schema());
        assert_eq!(text, "Name,Damage,Range,Fire Rate,Ammo Capacity\nAxe,10,1.5,0.5,0\n");
    }

    #[test]
    fn test_encode_empty_is_header_only() {
        let text = encode(&Vec::<WeaponRecord>::new(), &WeaponRecord::schema());
        assert_eq!(text, "Name,Damage,Range,Fire Rate,Ammo Capacity\n");
    }

    #[test]
    fn test_weapon_round_trip() {
        let mut bow = WeaponRecord::named("Long Bow");
        bow.damage = 7;
        bow.range = 30.25;
        bow.fire_rate = 1.2;
        bow.ammo_capacity = 20;
        let originals = vec![axe(), bow];

        let schema = WeaponRecord::schema();
        let report = decode(&encode(&originals, &schema), &schema, &NoIcons);

        assert_eq!(report.records, originals);
        assert!(report.rejected.is_empty());
        assert!(report.short_rows.is_empty());
    }

    #[test]
    fn test_header_is_discarded_whatever_it_says() {
        let text = "Axe,1,1,1,1\nSword,2,2,2,2\n";
        let report = decode(text, &WeaponRecord::schema(), &NoIcons);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name(), "Sword");
    }

    #[test]
    fn test_short_row_is_skipped_silently() {
        let text = "Name,Damage,Range,Fire Rate,Ammo Capacity\nAxe,10,1.5\nSword,12,1,1,0\n";
        let report = decode(text, &WeaponRecord::schema(), &NoIcons);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name(), "Sword");
        assert_eq!(report.short_rows, vec![2]);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_unparsable_number_drops_only_that_row() {
        let text = "Name,Damage,Range,Fire Rate,Ammo Capacity\n\
                    Axe,ten,1.5,0.5,0\n\
                    Sword,12,1,1,0\n\
                    Club,3,-1,1,0\n";
        let report = decode(text, &WeaponRecord::schema(), &NoIcons);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name(), "Sword");
        assert_eq!(report.records[0].damage, 12);
        assert_eq!(
            report.rejected[0],
            RowError {
                line: 2,
                error: CodecError::Parse {
                    field: "Damage".to_string(),
                    raw_value: "ten".to_string(),
                },
            }
        );
        assert_eq!(report.rejected[1].line, 4);
    }

    #[test]
    fn test_values_are_trimmed_and_crlf_tolerated() {
        let text = "Name,Damage,Range,Fire Rate,Ammo Capacity\r\nAxe, 10 ,1.5,0.5,0\r\n";
        let report = decode(text, &WeaponRecord::schema(), &NoIcons);
        assert_eq!(report.records, vec![axe()]);
    }

    #[test]
    fn test_text_keeps_surrounding_spaces() {
        let mut axe = axe();
        axe.base.name = "Axe ".to_string();

        let schema = WeaponRecord::schema();
        let report = decode(&encode(&[axe.clone()], &schema), &schema, &NoIcons);
        assert_eq!(report.records, vec![axe]);

        let text = "Name,Description,Base Value,Rarity\r\n Tonic , sweet ,2, Rare\r\n";
        let report = decode(text, &crate::item::PotionRecord::schema(), &NoIcons);
        assert_eq!(report.records[0].base.name, " Tonic ");
        assert_eq!(report.records[0].base.description, " sweet ");
        assert_eq!(report.records[0].base.rarity, crate::item::Rarity::Rare);
    }

    #[test]
    fn test_decoded_names_are_not_validated() {
        let text = "Name,Damage,Range,Fire Rate,Ammo Capacity\nAxe!,1,1,1,1\nAxe!,1,1,1,1\n";
        let report = decode(text, &WeaponRecord::schema(), &NoIcons);
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_armor_round_trip_with_icons() {
        let mut helm = ArmorRecord::named("Iron Helm");
        helm.armor_type = ArmorType::HEAD;
        helm.base.icon = Some(IconHandle::new("iron_helm"));
        let mut suit = ArmorRecord::named("Plate Suit");
        suit.armor_type = ArmorType::HEAD | ArmorType::CHEST | ArmorType::LEGS;

        let schema = ArmorRecord::schema();
        let text = encode(&[helm.clone(), suit.clone()], &schema);
        assert_eq!(
            text,
            "Item Name,Armor Type,Icon\nIron Helm,Head,iron_helm\nPlate Suit,Head|Chest|Legs,\n"
        );

        let resolver = |name: &str| (name == "iron_helm").then(|| IconHandle::new(name));
        let report = decode(&text, &schema, &resolver);
        assert_eq!(report.records, vec![helm, suit]);
    }

    #[test]
    fn test_unresolved_icon_is_none() {
        let text = "Item Name,Armor Type,Icon\nBoots,Feet,missing\n";
        let report = decode(text, &ArmorRecord::schema(), &NoIcons);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].base.icon, None);
    }

    #[test]
    fn test_unknown_enum_member_drops_row() {
        let text = "Item Name,Armor Type,Icon\nBoots,feet,\nGloves,Hands,\n";
        let report = decode(text, &ArmorRecord::schema(), &NoIcons);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name(), "Gloves");
        assert_eq!(
            report.rejected[0].error,
            CodecError::UnknownEnumValue {
                field: "Armor Type".to_string(),
                raw_value: "feet".to_string(),
            }
        );
    }

    #[test]
    fn test_embedded_comma_does_not_round_trip() {
        let mut sword = WeaponRecord::named("Sword, Rusty");
        sword.damage = 1;
        let schema = WeaponRecord::schema();
        let report = decode(&encode(&[sword], &schema), &schema, &NoIcons);

        assert!(report.records.is_empty());
        assert_eq!(report.rejected.len(), 1);
    }
}
