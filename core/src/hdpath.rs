//! BIP32 derivation paths.

use std::fmt;

/// Bit 31 set on a child index marks it hardened.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// An ordered sequence of BIP32 child indices. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HDPath(Vec<u32>);

impl HDPath {
    pub fn new() -> Self {
        HDPath(Vec::new())
    }

    pub fn from_indices(indices: Vec<u32>) -> Self {
        HDPath(indices)
    }

    /// Marks `index` hardened.
    pub fn harden(index: u32) -> u32 {
        index | HARDENED_BIT
    }

    pub fn is_hardened(index: u32) -> bool {
        index & HARDENED_BIT != 0
    }

    pub fn push(&mut self, index: u32) {
        self.0.push(index);
    }

    /// Returns a new path with `index` appended, leaving `self` untouched.
    pub fn child(&self, index: u32) -> HDPath {
        let mut next = self.0.clone();
        next.push(index);
        HDPath(next)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for HDPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            let (plain, hardened) = if Self::is_hardened(index) {
                (index & !HARDENED_BIT, "'")
            } else {
                (index, "")
            };
            write!(f, "/{plain}{hardened}")?;
        }
        Ok(())
    }
}
