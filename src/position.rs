//! Shared position space: every registered file owns a disjoint range of
//! global positions, so a single integer identifies file and offset.

use std::sync::{Arc, RwLock};

/// Global position. `Pos::NONE` is never inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(u64);

impl Pos {
    pub const NONE: Pos = Pos(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A file registered in a `PositionSpace`: positions `base..=base+size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: Arc<str>,
    base: u64,
    size: usize,
}

impl FileHandle {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Global position of `offset`; offsets past the end clamp to the end.
    pub fn pos(&self, offset: usize) -> Pos {
        Pos(self.base + offset.min(self.size) as u64)
    }

    /// Offset of `pos` in this file, if it belongs here.
    pub fn offset(&self, pos: Pos) -> Option<usize> {
        let rel = pos.0.checked_sub(self.base)?;
        usize::try_from(rel).ok().filter(|&o| o <= self.size)
    }
}

/// Registry of files. Shared between sessions through `Arc`.
#[derive(Debug)]
pub struct PositionSpace {
    files: RwLock<Vec<FileHandle>>,
}

impl Default for PositionSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSpace {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Vec::new()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Registers a file of `size` bytes after every file added so far.
    pub fn add_file(&self, name: &str, size: usize) -> FileHandle {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        let base = files.last().map_or(1, |f| f.base + f.size as u64 + 1);
        let handle = FileHandle {
            name: Arc::from(name),
            base,
            size,
        };
        files.push(handle.clone());
        handle
    }

    /// The file containing `pos`.
    pub fn file_for(&self, pos: Pos) -> Option<FileHandle> {
        if !pos.is_valid() {
            return None;
        }
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let idx = files.partition_point(|f| f.base <= pos.0).checked_sub(1)?;
        let file = &files[idx];
        file.offset(pos).map(|_| file.clone())
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_get_disjoint_ranges() {
        let space = PositionSpace::new();
        let a = space.add_file("a.go", 10);
        let b = space.add_file("b.go", 5);
        assert_eq!(a.base(), 1);
        assert_eq!(b.base(), 12);

        let p = b.pos(3);
        assert_eq!(space.file_for(p).map(|f| f.name().to_string()), Some("b.go".into()));
        assert_eq!(b.offset(p), Some(3));
        assert_eq!(a.offset(p), None);
        assert_eq!(space.file_for(a.pos(10)).map(|f| f.base()), Some(1));
        assert!(space.file_for(Pos::NONE).is_none());
    }
}
