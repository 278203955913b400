pub mod college;
pub mod course;
pub mod file;
pub mod saved_file;
pub mod subject;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// List-valued column (courses, branches, tags) stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Trims every entry, drops empties and duplicates, keeping first-seen order.
    pub fn normalized<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.as_ref().trim();
            if !item.is_empty() && !out.iter().any(|existing| existing == item) {
                out.push(item.to_string());
            }
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::StringList;

    #[test]
    fn normalized_drops_blanks_and_duplicates() {
        let list = StringList::normalized(["  dbms ", "", "os", "dbms", "   "]);
        assert_eq!(list.0, vec!["dbms".to_string(), "os".to_string()]);
    }
}
