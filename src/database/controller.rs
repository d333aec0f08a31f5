use tracing::{debug, info, warn};
use super::error::{DatabaseError, ValidationError};
use super::repository::{ItemRepository, RecordId};
use super::validator;
use crate::codec::{self, ResourceResolver, RowError};
use crate::item::Item;
use crate::save::Persistence;

/// What an import did with each row
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Ids of the records added, in file order
    pub imported: Vec<RecordId>,

    /// Decoded rows refused by name validation, with the reason
    pub dropped: Vec<(String, ValidationError)>,

    /// Rows that failed to decode
    pub rejected_rows: Vec<RowError>,

    /// Line numbers of rows with too few columns
    pub short_rows: Vec<usize>,
}

/// List/detail workflow over one repository
///
/// Holds the list state a UI renders (search text, type filter, current
/// selection) and a pending-edit buffer for the selected record. The UI
/// calls in once per user action and re-renders from the returned state;
/// nothing here is cached between calls.
pub struct ItemDatabaseController<R: Item, P: Persistence<R>> {
    repository: ItemRepository<R>,
    persistence: P,
    selected: Option<RecordId>,
    pending: Option<R>,
    search_query: String,
    type_filter: Option<R::TypeTag>,
}

impl<R: Item, P: Persistence<R>> ItemDatabaseController<R, P> {
    pub fn new(repository: ItemRepository<R>, persistence: P) -> Self {
        ItemDatabaseController {
            repository,
            persistence,
            selected: None,
            pending: None,
            search_query: String::new(),
            type_filter: None,
        }
    }

    pub fn repository(&self) -> &ItemRepository<R> {
        &self.repository
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    // ======================================================================
    // List view
    // ======================================================================

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// None shows every type
    pub fn set_type_filter(&mut self, filter: Option<R::TypeTag>) {
        self.type_filter = filter;
    }

    /// Records matching the search text and the type filter
    ///
    /// The search is a case-insensitive substring match on the name.
    /// Recomputed on every call; clone the iterator to walk it again.
    pub fn visible_records(&self) -> impl Iterator<Item = (RecordId, &R)> + Clone + '_ {
        let query = self.search_query.to_lowercase();
        let type_filter = self.type_filter;

        self.repository.filter(move |record| {
            record.name().to_lowercase().contains(&query)
                && type_filter.as_ref().is_none_or(|tag| record.matches_type(tag))
        })
    }

    // ======================================================================
    // Selection and editing
    // ======================================================================

    /// Selects a record and seeds the pending-edit buffer with its fields
    pub fn select(&mut self, id: RecordId) -> Result<(), DatabaseError> {
        let record = self.repository.get(id).ok_or(DatabaseError::RecordNotFound(id))?;
        self.pending = Some(record.clone());
        self.selected = Some(id);
        Ok(())
    }

    /// Selects the record with exactly this name
    pub fn select_named(&mut self, name: &str) -> Result<RecordId, DatabaseError> {
        let (id, _) = self
            .repository
            .find(name)
            .ok_or_else(|| DatabaseError::NameNotFound(name.to_string()))?;
        self.select(id)?;
        Ok(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.pending = None;
    }

    pub fn selected(&self) -> Option<(RecordId, &R)> {
        let id = self.selected?;
        self.repository.get(id).map(|record| (id, record))
    }

    pub fn pending(&self) -> Option<&R> {
        self.pending.as_ref()
    }

    pub fn pending_mut(&mut self) -> Option<&mut R> {
        self.pending.as_mut()
    }

    /// Every problem with the pending name, highest priority first
    pub fn pending_name_errors(&self) -> Vec<ValidationError> {
        match &self.pending {
            Some(pending) => validator::name_errors(pending.name(), &self.repository, self.selected),
            None => Vec::new(),
        }
    }

    /// Validates `pending` and copies it onto the selected record
    ///
    /// On a validation failure the record is left untouched and the
    /// highest-priority error is returned.
    pub fn apply_edits(&mut self, pending: R) -> Result<(), DatabaseError> {
        let id = self.selected.ok_or(DatabaseError::NoSelection)?;

        if let Err(e) = validator::check_record(&pending, &self.repository, Some(id)) {
            info!(record = %id, error = %e, "edit refused");
            self.pending = Some(pending);
            return Err(e.into());
        }

        let record = self
            .repository
            .get_mut(id)
            .ok_or(DatabaseError::RecordNotFound(id))?;
        *record = pending.clone();
        self.pending = Some(pending);

        self.commit(id)
    }

    /// Applies the controller's own pending-edit buffer
    pub fn apply_pending(&mut self) -> Result<(), DatabaseError> {
        let pending = self.pending.clone().ok_or(DatabaseError::NoSelection)?;
        self.apply_edits(pending)
    }

    // ======================================================================
    // Admin functions
    // ======================================================================

    /// Validates and appends a newly authored record
    pub fn create(&mut self, record: R) -> Result<RecordId, DatabaseError> {
        validator::check_record(&record, &self.repository, None)?;
        let id = self.repository.add(record)?;
        info!(kind = %R::KIND, record = %id, "record created");

        self.commit(id)?;
        Ok(id)
    }

    /// Removes the selected record and clears the selection
    pub fn delete_selected(&mut self) -> Result<R, DatabaseError> {
        let id = self.selected.ok_or(DatabaseError::NoSelection)?;
        let removed = self
            .repository
            .remove(id)
            .ok_or(DatabaseError::RecordNotFound(id))?;
        self.clear_selection();
        info!(kind = %R::KIND, name = %removed.name(), "record deleted");

        self.persistence.save(&self.repository)?;
        self.persistence.refresh()?;
        Ok(removed)
    }

    /// Appends a copy of the selected record under a generated name
    pub fn duplicate_selected(&mut self) -> Result<RecordId, DatabaseError> {
        let id = self.selected.ok_or(DatabaseError::NoSelection)?;
        let copy = self
            .repository
            .duplicate(id)
            .ok_or(DatabaseError::RecordNotFound(id))?;

        self.commit(copy)?;
        Ok(copy)
    }

    // ======================================================================
    // CSV
    // ======================================================================

    /// Appends every row of `text` that decodes and passes name validation
    ///
    /// Rows that fail either step are skipped and listed in the report;
    /// the import itself only fails if saving fails, and then the report
    /// travels inside `DatabaseError::ImportNotSaved`.
    pub fn import_from(
        &mut self,
        text: &str,
        resolver: &dyn ResourceResolver,
    ) -> Result<ImportReport, DatabaseError> {
        let decoded = codec::decode(text, &R::schema(), resolver);
        let mut report = ImportReport {
            imported: Vec::new(),
            dropped: Vec::new(),
            rejected_rows: decoded.rejected,
            short_rows: decoded.short_rows,
        };

        for record in decoded.records {
            let name = record.name().to_string();
            if let Err(e) = validator::check_name(&name, &self.repository, None) {
                debug!(name = %name, error = %e, "import row refused");
                report.dropped.push((name, e));
                continue;
            }

            let id = self.repository.add(record)?;
            self.persistence.mark_dirty(id);
            report.imported.push(id);
        }

        if !report.imported.is_empty() {
            let saved = self
                .persistence
                .save(&self.repository)
                .and_then(|()| self.persistence.refresh());
            if let Err(source) = saved {
                warn!(kind = %R::KIND, error = %source, "imported records were not saved");
                return Err(DatabaseError::ImportNotSaved {
                    report: Box::new(report),
                    source,
                });
            }
        }

        let skipped = report.dropped.len() + report.rejected_rows.len() + report.short_rows.len();
        if skipped > 0 {
            warn!(kind = %R::KIND, skipped, "some rows were not imported");
        }
        info!(kind = %R::KIND, imported = report.imported.len(), "database imported from CSV");

        Ok(report)
    }

    /// Every record as CSV text
    pub fn export_to(&self) -> String {
        let text = codec::encode(self.repository.records(), &R::schema());
        info!(kind = %R::KIND, count = self.repository.len(), "database exported to CSV");
        text
    }

    fn commit(&mut self, id: RecordId) -> Result<(), DatabaseError> {
        self.persistence.mark_dirty(id);
        self.persistence.save(&self.repository)?;
        self.persistence.refresh()?;
        Ok(())
    }
}
