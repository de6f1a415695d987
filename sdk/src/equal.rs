use std::any::Any;

use crate::mismatch::Mismatch;

/// Structural equality against an operand of unknown type.
///
/// `that` may be a `&T` or a `&Option<T>`; anything else is unequal. Two
/// absent sides are equal.
pub trait Equal: Sized + 'static {
    fn equal(this: Option<&Self>, that: Option<&dyn Any>) -> bool;

    fn equal_to(&self, that: &dyn Any) -> bool {
        Self::equal(Some(self), Some(that))
    }
}

/// Like [`Equal`], but reports the first difference instead of `false`.
pub trait VerboseEqual: Sized + 'static {
    fn verbose_equal(this: Option<&Self>, that: Option<&dyn Any>) -> Result<(), Mismatch>;

    fn verbose_equal_to(&self, that: &dyn Any) -> Result<(), Mismatch> {
        Self::verbose_equal(Some(self), Some(that))
    }
}

/// Content equality for byte sequences.
pub fn bytes_equal(lhs: &[u8], rhs: &[u8]) -> bool {
    lhs == rhs
}
