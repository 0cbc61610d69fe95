//! Shared traits for budgeting records.

/// Exposes the opaque identifier of a stored record.
///
/// Records compare by identity through [`Identifiable::same_id`]; derived
/// `PartialEq` implementations compare every field.
pub trait Identifiable {
    fn id(&self) -> &str;

    fn same_id(&self, other: &impl Identifiable) -> bool {
        self.id() == other.id()
    }
}

/// Supplies a common contract for retrieving non-negative amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Finds the record with the given identifier.
pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Returns the index of the record with the given identifier.
pub fn position_by_id<T: Identifiable>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
