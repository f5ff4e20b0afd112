//! HS code lookup table.
//!
//! Maps Harmonized System codes to an HSN description and a main product
//! category. The builtin table is built once per process and never mutated;
//! callers that need a different mapping load their own and pass it to the
//! enricher explicitly.

use crate::constants::BUILTIN_HSN_ENTRIES;
use crate::error::{Result, TradeError};
use crate::models::HsnEntry;
use crate::reader::read_string_rows;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Columns of a lookup file: HS Code, HSN Description, Main Category
const LOOKUP_COLUMNS: usize = 3;

static BUILTIN_TABLE: LazyLock<HsnTable> = LazyLock::new(|| {
    HsnTable::from_entries(
        BUILTIN_HSN_ENTRIES
            .iter()
            .map(|(code, description, category)| (*code, HsnEntry::new(*description, *category))),
    )
});

/// Immutable HS code → classification mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HsnTable {
    entries: HashMap<String, HsnEntry>,
}

impl HsnTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin mapping of household steel articles
    pub fn builtin() -> &'static HsnTable {
        &BUILTIN_TABLE
    }

    /// Build a table from (code, entry) pairs; later codes replace earlier ones
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, HsnEntry)>,
    {
        let mut table = Self::new();
        for (code, entry) in entries {
            table.insert(code, entry);
        }
        table
    }

    /// Add or replace an entry
    pub fn insert(&mut self, code: impl Into<String>, entry: HsnEntry) {
        let code = code.into().trim().to_string();
        self.entries.insert(code, entry);
    }

    /// Look up an HS code exactly as written
    pub fn lookup(&self, hs_code: &str) -> Option<&HsnEntry> {
        self.entries.get(hs_code)
    }

    /// Check whether a code is mapped
    pub fn contains(&self, hs_code: &str) -> bool {
        self.entries.contains_key(hs_code)
    }

    /// Number of mapped codes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no codes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (code, entry) pairs in no particular order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &HsnEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    /// Load a lookup CSV with columns: HS Code, HSN Description, Main Category
    ///
    /// The first row is treated as a header. Rows with a blank code are
    /// skipped; a missing description or category is stored as empty and
    /// logged. A file in which no row has a description or category was
    /// almost certainly read with the wrong delimiter and is rejected.
    pub fn load_csv(path: &Path, delimiter: u8) -> Result<Self> {
        if !path.exists() {
            return Err(TradeError::LookupTable {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let rows = read_string_rows(path, delimiter, true, LOOKUP_COLUMNS).map_err(|e| TradeError::LookupTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut table = Self::new();
        let mut classified_rows = 0;
        for (line, row) in rows.iter().enumerate() {
            let code = row.first().map(|s| s.trim()).unwrap_or_default();
            if code.is_empty() {
                warn!(
                    "Skipping lookup row {} in {}: blank HS code",
                    line + 2,
                    path.display()
                );
                continue;
            }

            let description = row.get(1).map(|s| s.trim()).unwrap_or_default();
            let category = row.get(2).map(|s| s.trim()).unwrap_or_default();
            if description.is_empty() || category.is_empty() {
                warn!(
                    "Lookup row {} in {} is missing its description or category",
                    line + 2,
                    path.display()
                );
            }
            if !description.is_empty() || !category.is_empty() {
                classified_rows += 1;
            }

            table.insert(code, HsnEntry::new(description, category));
        }

        if !table.is_empty() && classified_rows == 0 {
            return Err(TradeError::LookupTable {
                path: path.to_path_buf(),
                reason: format!(
                    "no row has a description or category column; is {:?} the right delimiter?",
                    delimiter as char
                ),
            });
        }

        debug!(
            "Loaded {} HS codes from {}",
            table.len(),
            path.display()
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_table_contents() {
        let table = HsnTable::builtin();
        assert_eq!(table.len(), 4);

        let entry = table.lookup("73239990").unwrap();
        assert_eq!(entry.description, "Household articles of iron or steel");
        assert_eq!(entry.category, "Steel");

        assert!(table.contains("73211900"));
        assert!(table.lookup("00000000").is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = HsnTable::builtin();
        assert!(table.lookup(" 73239990").is_none());
        assert!(table.lookup("7323999").is_none());
    }

    #[test]
    fn test_from_entries_later_wins() {
        let table = HsnTable::from_entries([
            ("1234", HsnEntry::new("first", "A")),
            ("1234", HsnEntry::new("second", "B")),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("1234").unwrap().description, "second");
    }

    #[test]
    fn test_load_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lookup.csv");
        fs::write(
            &path,
            "HS Code,HSN Description,Main Category\n\
             39241090,Plastic tableware,Plastic\n\
             ,orphan row,None\n\
             73239990,\"Household articles, steel\",Steel\n",
        )
        .unwrap();

        let table = HsnTable::load_csv(&path, b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("39241090").unwrap(),
            &HsnEntry::new("Plastic tableware", "Plastic")
        );
        assert_eq!(
            table.lookup("73239990").unwrap().description,
            "Household articles, steel"
        );
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = HsnTable::load_csv(Path::new("/nonexistent/lookup.csv"), b',');
        assert!(matches!(result, Err(TradeError::LookupTable { .. })));
    }

    #[test]
    fn test_load_csv_with_wrong_delimiter_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lookup.csv");
        fs::write(
            &path,
            "HS Code,HSN Description,Main Category\n39241090,Plastic tableware,Plastic\n",
        )
        .unwrap();

        let result = HsnTable::load_csv(&path, b'\t');
        assert!(matches!(result, Err(TradeError::LookupTable { .. })));
    }

    #[test]
    fn test_load_csv_keeps_partial_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lookup.csv");
        fs::write(&path, "code,desc,cat\n1,one,A\n2\n").unwrap();

        let table = HsnTable::load_csv(&path, b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("2").unwrap(), &HsnEntry::new("", ""));
    }

    #[test]
    fn test_entries_cover_table() {
        let mut codes: Vec<&str> = HsnTable::builtin().entries().map(|(code, _)| code).collect();
        codes.sort();
        assert_eq!(codes, vec!["73211900", "73239300", "73239900", "73239990"]);
    }
}
