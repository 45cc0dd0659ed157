use serde::{Deserialize, Deserializer};

/// A field of a partial update.
///
/// `Unset` means the caller did not mention the field; `Set` carries the new
/// value, which may itself be empty. Nullable columns use `Patch<Option<T>>`
/// so that an explicit `null` clears the column while an absent key leaves it
/// alone.
///
/// Deserializes from the bare value; pair with `#[serde(default)]` so a
/// missing key becomes `Unset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// Write the value into `slot` if set. Returns whether anything was written.
    pub fn apply_to(self, slot: &mut T) -> bool {
        match self {
            Patch::Set(value) => {
                *slot = value;
                true
            }
            Patch::Unset => false,
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Set(value)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}
