//! # Partial Updates
//!
//! A column → value list for `UPDATE ... SET` statements. Column names are
//! `&'static str` so only names written in source can reach SQL; values are
//! always bound as parameters by the store implementation.

/// A value to bind for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    Bool(bool),
}

/// Ordered set of column assignments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdates {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing an earlier assignment to the same column
    pub fn set(&mut self, column: &'static str, value: FieldValue) -> &mut Self {
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    pub fn text(&mut self, column: &'static str, value: impl Into<String>) -> &mut Self {
        self.set(column, FieldValue::Text(value.into()))
    }

    pub fn optional_text(&mut self, column: &'static str, value: Option<String>) -> &mut Self {
        self.set(column, FieldValue::OptionalText(value))
    }

    pub fn flag(&mut self, column: &'static str, value: bool) -> &mut Self {
        self.set(column, FieldValue::Bool(value))
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    /// Remove a column and return its value
    pub fn take(&mut self, column: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(c, _)| *c == column)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(c, v)| (*c, v))
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(c, _)| *c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut updates = FieldUpdates::new();
        updates.text("card_type", "visa").flag("is_default", true);
        assert_eq!(updates.columns(), vec!["card_type", "is_default"]);
    }

    #[test]
    fn test_set_replaces_same_column() {
        let mut updates = FieldUpdates::new();
        updates.text("email", "a@x.io").text("email", "b@x.io");
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates.get("email"),
            Some(&FieldValue::Text("b@x.io".to_string()))
        );
    }

    #[test]
    fn test_take_removes() {
        let mut updates = FieldUpdates::new();
        updates.flag("is_default", false).optional_text("address", None);
        assert_eq!(updates.take("is_default"), Some(FieldValue::Bool(false)));
        assert_eq!(updates.columns(), vec!["address"]);
        assert!(updates.take("is_default").is_none());
    }
}
