//! Authoring databases for game items
//!
//! Weapons, armor and potions each live in their own repository. A
//! controller drives list/detail editing over one repository, validates
//! names, and moves records in and out of CSV.

pub mod cli;
pub mod codec;
pub mod config;
pub mod database;
pub mod item;
pub mod logging;
pub mod save;
