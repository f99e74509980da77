//! Migration file naming and ordering.
//!
//! Migrations are applied in file-name order, so every migration created in
//! one run gets its own second: the first allocation reads the clock, each
//! later one adds a second to the previous stamp.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::{
    application::{
        ApplicationError,
        ports::{Clock, Filesystem},
    },
    domain::{RelativePath, naming},
    error::ForgeResult,
};

/// `Y_m_d_His`, the migration file prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Per-invocation timestamp counter.
#[derive(Debug, Default)]
pub struct MigrationSequencer {
    last: Option<NaiveDateTime>,
}

impl MigrationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp: the clock on first use, then one second later each call.
    pub fn next(&mut self, clock: &dyn Clock) -> NaiveDateTime {
        let next = match self.last {
            Some(last) => last + Duration::seconds(1),
            None => clock.now(),
        };
        self.last = Some(next);
        next
    }
}

/// Resolves where a table's create-migration lives.
pub struct MigrationPaths<'a> {
    filesystem: &'a dyn Filesystem,
    clock: &'a dyn Clock,
    sequencer: MigrationSequencer,
}

impl<'a> MigrationPaths<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, clock: &'a dyn Clock) -> Self {
        Self {
            filesystem,
            clock,
            sequencer: MigrationSequencer::new(),
        }
    }

    /// Migration path for a model's table, named by convention.
    pub fn allocate_migration_path(
        &mut self,
        module: &str,
        model_name: &str,
        is_pivot: bool,
    ) -> ForgeResult<RelativePath> {
        let table = naming::table_name(model_name, is_pivot);
        self.allocate_for_table(module, &table)
    }

    /// Migration path for `table` under `Modules/{Module}/Database/Migrations`.
    ///
    /// An existing `create_{table}_table` migration is reused so reruns do not
    /// pile up duplicates. Otherwise a fresh timestamped name is taken, with a
    /// `_{n}` suffix after the stamp if that name is somehow taken.
    pub fn allocate_for_table(&mut self, module: &str, table: &str) -> ForgeResult<RelativePath> {
        let dir = RelativePath::module_dir(module)?
            .join("Database")?
            .join("Migrations")?;
        let marker = format!("create_{table}_table");

        let existing = self.filesystem.list_dir(dir.as_path())?;
        if let Some(name) = existing.iter().find(|name| name.contains(&marker)) {
            debug!(table, file = %name, "Reusing existing migration");
            return Ok(dir.join(name)?);
        }

        let stamp = self.sequencer.next(self.clock).format(TIMESTAMP_FORMAT).to_string();
        let mut candidate = dir.join(format!("{stamp}_{marker}.php"))?;
        let mut n = 1u32;
        while self.filesystem.exists(candidate.as_path()) {
            candidate = dir.join(format!("{stamp}_{n}_{marker}.php"))?;
            n = n.checked_add(1).ok_or_else(|| ApplicationError::FilesystemError {
                path: dir.clone().into_path_buf(),
                reason: "no free migration file name".into(),
            })?;
        }
        Ok(candidate)
    }
}
