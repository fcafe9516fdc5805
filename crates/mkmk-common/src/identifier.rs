use smol_str::SmolStr;
use std::fmt;

/// Separator used when rendering an identifier for diagnostics.
const SEPARATOR: &str = "|";

/// A segmented, immutable node name.
///
/// Identifiers are like relative paths without the ambiguities: two
/// identifiers are equal iff their segments are equal, and they order
/// lexicographically over segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    segments: Vec<SmolStr>,
}

impl Identifier {
    /// The empty identifier, used as the prefix of the root script.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn of<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments.into_iter().map(|s| SmolStr::new(s.as_ref())).collect(),
        }
    }

    /// Returns a new identifier consisting of this one followed by `segments`.
    pub fn append<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = self.segments.clone();
        result.extend(segments.into_iter().map(|s| SmolStr::new(s.as_ref())));
        Self { segments: result }
    }

    /// The final segment, `c` for `a|b|c`. `None` only for the root.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(SmolStr::as_str)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
