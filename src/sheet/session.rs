use super::{Result, Sheet, SheetError};

/// Exclusive owner of the active snapshot.
///
/// Each [`Session::apply`] runs one snapshot transition: on success the new
/// snapshot replaces the old one wholesale, on failure the old one stays.
/// What a failure looks like to the caller depends on the index policy:
///
/// - strict: the [`SheetError`] is returned.
/// - lenient: the error is logged and the unchanged snapshot is returned, so
///   a stale index behaves as a no-op.
#[derive(Debug, Clone)]
pub struct Session {
    current: Sheet,
    strict: bool,
}

impl Session {
    pub fn new(sheet: Sheet, strict: bool) -> Self {
        Self {
            current: sheet,
            strict,
        }
    }

    /// Start from the seeded sheet.
    pub fn seeded(strict: bool) -> Self {
        Self::new(Sheet::seeded(), strict)
    }

    /// Strict in debug and test builds, lenient in release builds.
    pub fn default_strictness() -> bool {
        cfg!(debug_assertions)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn sheet(&self) -> &Sheet {
        &self.current
    }

    /// A cheap clone of the active snapshot.
    pub fn snapshot(&self) -> Sheet {
        self.current.clone()
    }

    pub fn apply<F>(&mut self, op: F) -> Result<Sheet>
    where
        F: FnOnce(&Sheet) -> Result<Sheet>,
    {
        match op(&self.current) {
            Ok(next) => {
                self.current = next;
                Ok(self.snapshot())
            }
            Err(err) if self.strict => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring edit addressed to a stale index");
                Ok(self.snapshot())
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::seeded(Self::default_strictness())
    }
}
