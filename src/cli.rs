//! Command-line front end
//!
//! Each invocation opens one kind's database, performs one action through
//! the controller (the same calls an editor window would make), and exits.
//! File paths given on the command line stand in for a file picker.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use crate::codec::IconDirectory;
use crate::config::Config;
use crate::database::{DatabaseError, ImportReport, ItemDatabaseController};
use crate::item::{ArmorRecord, Item, PotionRecord, WeaponRecord};
use crate::save::{JsonPersistence, Persistence};

#[derive(Parser, Debug)]
#[command(name = "itemdb", version, about = "Author game item databases and exchange them as CSV")]
pub struct Cli {
    /// Config file (defaults to <config dir>/itemdb/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub kind: KindCommand,
}

#[derive(Subcommand, Debug)]
pub enum KindCommand {
    /// Work on the weapon database
    Weapon {
        #[command(subcommand)]
        command: Command,
    },
    /// Work on the armor database
    Armor {
        #[command(subcommand)]
        command: Command,
    },
    /// Work on the potion database
    Potion {
        #[command(subcommand)]
        command: Command,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List records, optionally filtered
    List {
        /// Case-insensitive name substring
        #[arg(long)]
        search: Option<String>,
        /// Type member name, e.g. Bow or Head|Chest
        #[arg(long = "type")]
        type_filter: Option<String>,
    },
    /// Show every field of one record
    Show { name: String },
    /// Create a record with default fields
    Create { name: String },
    /// Set one field of a record, by any label `show` prints
    Set {
        name: String,
        column: String,
        value: String,
    },
    Rename { name: String, new_name: String },
    Delete { name: String },
    /// Copy a record under a generated name
    Duplicate { name: String },
    /// Append records from a CSV file
    Import { file: PathBuf },
    /// Write all records as CSV (stdout if no file is given)
    Export { file: Option<PathBuf> },
}

/// Dispatches to the database for the chosen kind
pub fn run(kind: KindCommand, config: &Config) -> Result<()> {
    match kind {
        KindCommand::Weapon { command } => run_kind::<WeaponRecord>(command, config),
        KindCommand::Armor { command } => run_kind::<ArmorRecord>(command, config),
        KindCommand::Potion { command } => run_kind::<PotionRecord>(command, config),
    }
}

fn run_kind<R: Item>(command: Command, config: &Config) -> Result<()> {
    let (store, repo) = JsonPersistence::<R>::open(&config.data_dir, config.backup_count)
        .with_context(|| format!("opening {} database in {}", R::KIND, config.data_dir.display()))?;
    let mut db = ItemDatabaseController::new(repo, store);

    match command {
        Command::List { search, type_filter } => {
            if let Some(query) = search {
                db.set_search_query(query);
            }
            if let Some(raw) = type_filter {
                let tag = R::parse_type_tag(&raw)
                    .ok_or_else(|| anyhow!("'{raw}' is not a {} type", R::KIND))?;
                db.set_type_filter(Some(tag));
            }

            for line in list_lines(&db) {
                println!("{line}");
            }
        }
        Command::Show { name } => {
            db.select_named(&name)?;
            let record = db
                .pending()
                .ok_or_else(|| anyhow!("no record named '{name}'"))?;
            print_record(record);
        }
        Command::Create { name } => {
            let mut record = R::default();
            record.base_mut().name = name;
            db.create(record)?;
        }
        Command::Set { name, column, value } => {
            db.select_named(&name)?;
            let fields = R::fields();
            let column = fields.column(&column)?;
            let resolver = IconDirectory::new(config.icon_dir());
            let pending = db.pending_mut().ok_or_else(|| anyhow!("nothing selected"))?;
            column.write(pending, value.trim(), &resolver)?;
            apply(&mut db)?;
        }
        Command::Rename { name, new_name } => {
            db.select_named(&name)?;
            if let Some(pending) = db.pending_mut() {
                pending.base_mut().name = new_name;
            }
            apply(&mut db)?;
        }
        Command::Delete { name } => {
            db.select_named(&name)?;
            db.delete_selected()?;
        }
        Command::Duplicate { name } => {
            db.select_named(&name)?;
            let copy = db.duplicate_selected()?;
            if let Some(record) = db.repository().get(copy) {
                println!("{}", record.name());
            }
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let resolver = IconDirectory::new(config.icon_dir());
            match db.import_from(&text, &resolver) {
                Ok(report) => print_import_report(&report),
                Err(DatabaseError::ImportNotSaved { report, source }) => {
                    print_import_report(&report);
                    return Err(anyhow::Error::new(source).context("imported records were not saved"));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Export { file } => {
            let text = db.export_to();
            match file {
                Some(path) => {
                    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported {} record(s) to {}", db.repository().len(), path.display());
                }
                None => print!("{text}"),
            }
        }
    }

    Ok(())
}

/// Applies the pending buffer, listing every name problem on failure
fn apply<R: Item, P: Persistence<R>>(db: &mut ItemDatabaseController<R, P>) -> Result<()> {
    let problems = db.pending_name_errors();
    if problems.len() > 1 {
        for problem in &problems {
            eprintln!("{problem}");
        }
    }
    db.apply_pending()?;
    Ok(())
}

/// Header plus one line per visible record, in CSV column order
fn list_lines<R: Item, P: Persistence<R>>(db: &ItemDatabaseController<R, P>) -> Vec<String> {
    let schema = R::schema();
    let rows = db.visible_records().map(|(_, record)| {
        let fields: Vec<String> = schema.columns.iter().map(|c| c.read(record)).collect();
        fields.join(", ")
    });
    std::iter::once(schema.header_line()).chain(rows).collect()
}

fn print_import_report(report: &ImportReport) {
    println!("Imported {} record(s)", report.imported.len());
    for (name, error) in &report.dropped {
        eprintln!("skipped '{name}': {error}");
    }
    for row in &report.rejected_rows {
        eprintln!("skipped line {}: {}", row.line, row.error);
    }
    for line in &report.short_rows {
        eprintln!("skipped line {line}: too few columns");
    }
}

fn print_record<R: Item>(record: &R) {
    for column in R::fields().columns.iter() {
        println!("{:<20}{}", column.header, column.read(record));
    }
}
