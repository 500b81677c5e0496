use std::fmt;

/// One step of a key path: a field name for maps and records, a position for
/// lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Field(String),
    Index(usize),
}

impl Key {
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Key::Field(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(name) => write!(f, "{}", name),
            Key::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Field(name)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

/// Renders a key path for error messages, e.g. `pets[0].name`.
pub fn display_path(path: &[Key]) -> String {
    let mut out = String::new();
    for key in path {
        match key {
            Key::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Key::Index(i) => out.push_str(&format!("[{}]", i)),
        }
    }
    out
}

/// Builds a key path from a mixed list of field names and indices.
///
/// ```
/// use recordkit_core::{path, Key};
/// assert_eq!(path!["pets", 0, "name"], vec![Key::from("pets"), Key::from(0usize), Key::from("name")]);
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        vec![$($crate::Key::from($crate::key::PathSegment::from($key))),*]
    };
}

/// Adapter so `path!` accepts integer literals without a `usize` suffix.
#[doc(hidden)]
pub struct PathSegment(Key);

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment(Key::from(name))
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment(Key::from(name))
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment(Key::Index(i))
    }
}

/// Negative literals have no element to address; they map to `usize::MAX`,
/// which every lookup treats as out of range.
impl From<i32> for PathSegment {
    fn from(i: i32) -> Self {
        PathSegment(Key::Index(usize::try_from(i).unwrap_or(usize::MAX)))
    }
}

impl From<PathSegment> for Key {
    fn from(segment: PathSegment) -> Self {
        segment.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_mixes_fields_and_indices() {
        let path = vec![Key::from("pets"), Key::from(0usize), Key::from("name")];
        assert_eq!(display_path(&path), "pets[0].name");
        assert_eq!(display_path(&[]), "");
    }

    #[test]
    fn path_macro_accepts_bare_integers() {
        let built = crate::path!["items", 2];
        assert_eq!(built, vec![Key::Field("items".into()), Key::Index(2)]);
    }

    #[test]
    fn path_macro_maps_negative_index_out_of_range() {
        let built = crate::path!["items", -1];
        assert_eq!(
            built,
            vec![Key::Field("items".into()), Key::Index(usize::MAX)]
        );
    }
}
