//! Option flags accepted by mutating operations.

use std::ops::{BitOr, BitOrAssign};

/// Bit set of operation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flag(u32);

impl Flag {
    /// No flags.
    pub const NONE: Flag = Flag(0);
    /// Fail instead of replacing an existing destination.
    pub const NO_REPLACE: Flag = Flag(1);
    /// Do not recurse into directories.
    pub const NO_RECURSIVE: Flag = Flag(2);

    /// Raw bits.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(&self, other: Flag) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flag {
    type Output = Flag;

    fn bitor(self, rhs: Flag) -> Flag {
        Flag(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flag {
    fn bitor_assign(&mut self, rhs: Flag) {
        self.0 |= rhs.0;
    }
}

/// ORs all `flags` together.
pub fn merge_flags(flags: &[Flag]) -> Flag {
    flags.iter().fold(Flag::NONE, |acc, f| acc | *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_flags() {
        assert_eq!(merge_flags(&[]), Flag::NONE);
        let merged = merge_flags(&[Flag::NO_REPLACE, Flag::NO_RECURSIVE, Flag::NO_REPLACE]);
        assert_eq!(merged.bits(), 3);
        assert!(merged.contains(Flag::NO_REPLACE));
        assert!(merged.contains(Flag::NO_RECURSIVE));
    }

    #[test]
    fn test_contains() {
        assert!(!Flag::NONE.contains(Flag::NO_REPLACE));
        assert!(Flag::NO_REPLACE.contains(Flag::NONE));
        let mut f = Flag::NONE;
        f |= Flag::NO_RECURSIVE;
        assert!(!f.contains(Flag::NO_REPLACE));
    }
}
