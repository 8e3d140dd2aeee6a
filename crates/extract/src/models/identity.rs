use std::fmt::{Display, Formatter, Result as FmtResult};

/// The manga a chapter URL points at, as encoded in the URL path.
///
/// Only `title` is stable enough to build directories from; `version` and
/// `chapter` are opaque site identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MangaIdentity {
    pub title: String,
    pub version: String,
    pub chapter: String,
}
impl Display for MangaIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}/{}", self.title, self.version, self.chapter)
    }
}
