mod chapter;
mod identity;
mod number;

pub use self::chapter::ChapterRef;
pub use self::identity::MangaIdentity;
pub use self::number::ChapterNumber;
