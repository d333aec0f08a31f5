use std::fmt;
use tracing::warn;
use super::error::{RepositoryError, ValidationError};
use super::validator;
use crate::item::Item;

/// Identifies a record within one repository
///
/// Ids are handed out in increasing order and never reused, so an id held
/// by the UI keeps pointing at the same record (or at nothing once it is
/// removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct StoredRecord<R> {
    id: RecordId,
    record: R,
}

/// Ordered in-memory collection of records of one kind
///
/// The repository owns its records exclusively. Names are unique by exact
/// match; `add` and `replace` refuse empty and duplicate names but leave
/// the character whitelist to the caller.
#[derive(Debug, Clone)]
pub struct ItemRepository<R> {
    records: Vec<StoredRecord<R>>,
    next_id: u64,
}

impl<R> ItemRepository<R> {
    /// Creates an empty repository
    pub fn new() -> Self {
        ItemRepository {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|stored| stored.id == id)
    }
}

impl<R: Item> ItemRepository<R> {
    /// Builds a repository from loaded records
    ///
    /// Records `add` would refuse are dropped with a warning.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let mut repo = Self::new();
        for record in records {
            let name = record.name().to_string();
            if let Err(e) = repo.add(record) {
                warn!(kind = %R::KIND, name = %name, error = %e, "dropping stored record");
            }
        }
        repo
    }

    /// Appends a record
    ///
    /// Fails if the name is blank or already used by another record.
    pub fn add(&mut self, record: R) -> Result<RecordId, ValidationError> {
        self.check_storable(record.name(), None)?;

        let id = self.allocate_id();
        self.records.push(StoredRecord { id, record });
        Ok(id)
    }

    /// Removes a record, returning it; does nothing if absent
    pub fn remove(&mut self, id: RecordId) -> Option<R> {
        let index = self.position(id)?;
        Some(self.records.remove(index).record)
    }

    /// Appends a copy of a record under a fresh name
    ///
    /// The copy of "Sword" is "Sword 1", then "Sword 2", and so on. A name
    /// already ending in a number counts up from that number. When the
    /// numbers run out the copy becomes "Sword copy", "Sword copy 2", ...
    pub fn duplicate(&mut self, id: RecordId) -> Option<RecordId> {
        let mut copy = self.get(id)?.clone();
        let name = self.unique_copy_name(copy.name())?;
        copy.base_mut().name = name;

        let new_id = self.allocate_id();
        self.records.push(StoredRecord { id: new_id, record: copy });
        Some(new_id)
    }

    /// First record with exactly this name
    pub fn find(&self, name: &str) -> Option<(RecordId, &R)> {
        self.all().find(|(_, record)| record.name() == name)
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| &stored.record)
    }

    /// Mutable access for in-place edits
    ///
    /// Callers changing the name are responsible for validating it first.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut R> {
        self.records
            .iter_mut()
            .find(|stored| stored.id == id)
            .map(|stored| &mut stored.record)
    }

    /// Swaps in a new record under an existing id, returning the old one
    pub fn replace(&mut self, id: RecordId, record: R) -> Result<R, RepositoryError> {
        let index = self.position(id).ok_or(RepositoryError::RecordNotFound(id))?;
        self.check_storable(record.name(), Some(id))?;

        Ok(std::mem::replace(&mut self.records[index].record, record))
    }

    /// All records in insertion order
    ///
    /// The iterator is lazy and can be cloned to walk the records again.
    pub fn all(&self) -> impl Iterator<Item = (RecordId, &R)> + Clone + '_ {
        self.records.iter().map(|stored| (stored.id, &stored.record))
    }

    /// Records passing `predicate`, in insertion order
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = (RecordId, &'a R)> + Clone + 'a
    where
        P: Fn(&R) -> bool + Clone + 'a,
    {
        self.all().filter(move |(_, record)| predicate(record))
    }

    /// Records only, in insertion order
    pub fn records(&self) -> impl Iterator<Item = &R> + Clone + '_ {
        self.records.iter().map(|stored| &stored.record)
    }

    fn check_storable(&self, name: &str, excluding: Option<RecordId>) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if validator::is_duplicate(name, self, excluding) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// First free name among "stem N", then "name copy", "name copy 2", ...
    fn unique_copy_name(&self, name: &str) -> Option<String> {
        let (stem, start) = match name.rsplit_once(' ') {
            Some((stem, suffix)) if !stem.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
                match suffix.parse::<u32>() {
                    Ok(n) => (stem, n.saturating_add(1)),
                    Err(_) => (name, 1),
                }
            }
            _ => (name, 1),
        };

        let numbered = (start..=u32::MAX).map(|n| format!("{stem} {n}"));
        let copies = std::iter::once(format!("{name} copy"))
            .chain((2..=u32::MAX).map(|n| format!("{name} copy {n}")));

        numbered
            .chain(copies)
            .find(|candidate| self.find(candidate).is_none())
    }
}

impl<R> Default for ItemRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}
