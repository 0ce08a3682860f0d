//! Operand kinds and kind sets.

use bitflags::bitflags;
use core::fmt;

/// Primitive operand kinds.
///
/// This is the closed set of kinds the engine specializes over. The order of
/// the variants is the order used when listing kinds in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Boolean
    Bool,

    /// Integer (64-bit, signed)
    Int,

    /// Floating-point (64-bit)
    Float,

    /// Immutable string
    Str,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 4] = [Kind::Bool, Kind::Int, Kind::Float, Kind::Str];

    /// Returns true if this kind is numeric (Int or Float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Float)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::Str => "Str",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of operand kinds accepted at one operand position.
    ///
    /// A candidate's type predicate is one `KindSet` per operand position.
    /// A set holding exactly one kind lets the dispatcher use the typed fast
    /// accessor for that position.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct KindSet: u8 {
        const BOOL = 1;
        const INT = 1 << 1;
        const FLOAT = 1 << 2;
        const STR = 1 << 3;

        const NUMERIC = Self::INT.bits() | Self::FLOAT.bits();
        const ANY = Self::BOOL.bits() | Self::INT.bits() | Self::FLOAT.bits() | Self::STR.bits();
    }
}

impl KindSet {
    /// Returns true if `kind` is a member of this set.
    #[inline]
    pub fn accepts(self, kind: Kind) -> bool {
        self.contains(KindSet::from(kind))
    }

    /// The kind held by this set, if it holds exactly one.
    pub fn single(self) -> Option<Kind> {
        if self.bits().count_ones() != 1 {
            return None;
        }
        Kind::ALL.into_iter().find(|kind| self.accepts(*kind))
    }

    /// Iterate over the kinds in this set, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = Kind> {
        Kind::ALL.into_iter().filter(move |kind| self.accepts(*kind))
    }
}

impl From<Kind> for KindSet {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Bool => KindSet::BOOL,
            Kind::Int => KindSet::INT,
            Kind::Float => KindSet::FLOAT,
            Kind::Str => KindSet::STR,
        }
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Never");
        }
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(kind.name())?;
        }
        Ok(())
    }
}
