//! Bibliography entry data structures

use serde::{Deserialize, Serialize};

/// A single field (name-value pair) of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibField {
    pub name: String,
    pub value: String,
}

/// One bibliographic record, read from an `@type{key, ...}` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    /// Lower-cased entry type as written in the source (e.g. "article")
    pub entry_type: String,
    pub citation_key: String,
    /// Fields in first-seen order, names lower-cased
    pub fields: Vec<BibField>,
    /// 1-based line of the `@` marker
    pub source_line: u32,
}

impl BibEntry {
    /// Create a new entry with no fields
    pub fn new(
        entry_type: impl Into<String>,
        citation_key: impl Into<String>,
        source_line: u32,
    ) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            citation_key: citation_key.into(),
            fields: Vec::new(),
            source_line,
        }
    }

    /// Set a field value.
    ///
    /// A repeated name keeps the position of its first occurrence and takes
    /// the latest value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(BibField { name, value }),
        }
    }

    /// Get a field value by name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Whether the entry carries a field with this name (case-insensitive)
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get_field("author")
    }

    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }

    pub fn hyphenation(&self) -> Option<&str> {
        self.get_field("hyphenation")
    }

    /// The year as a number, when the field is present and made only of
    /// ASCII digits. Values that do not fit in a `u32` count as absent.
    pub fn numeric_year(&self) -> Option<u32> {
        let year = self.year()?.trim();
        if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        year.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_is_lowercased() {
        let entry = BibEntry::new("InProceedings", "Key1", 3);
        assert_eq!(entry.entry_type, "inproceedings");
        assert_eq!(entry.citation_key, "Key1");
        assert_eq!(entry.source_line, 3);
    }

    #[test]
    fn test_entry_field_access() {
        let mut entry = BibEntry::new("article", "Smith2024", 1);
        entry.set_field("title", "A Great Paper");
        entry.set_field("Author", "Smith, John");
        entry.set_field("YEAR", "2024");

        assert_eq!(entry.title(), Some("A Great Paper"));
        assert_eq!(entry.author(), Some("Smith, John"));
        assert_eq!(entry.get_field("Year"), Some("2024"));
        assert!(entry.has_field("AUTHOR"));
        assert_eq!(entry.hyphenation(), None);
        assert_eq!(
            entry.field_names().collect::<Vec<_>>(),
            vec!["title", "author", "year"]
        );
    }

    #[test]
    fn test_duplicate_field_last_write_wins() {
        let mut entry = BibEntry::new("book", "b", 1);
        entry.set_field("year", "1999");
        entry.set_field("title", "T");
        entry.set_field("Year", "2001");

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields[0].name, "year");
        assert_eq!(entry.year(), Some("2001"));
    }

    #[test]
    fn test_numeric_year() {
        let mut entry = BibEntry::new("misc", "m", 1);
        assert_eq!(entry.numeric_year(), None);

        entry.set_field("year", "2019");
        assert_eq!(entry.numeric_year(), Some(2019));

        entry.set_field("year", "circa 2019");
        assert_eq!(entry.numeric_year(), None);

        entry.set_field("year", "");
        assert_eq!(entry.numeric_year(), None);

        entry.set_field("year", "99999999999999999999");
        assert_eq!(entry.numeric_year(), None);
    }
}
