use core::fmt;

/// A signal join number on the wire.
///
/// Join `0` is the unbound sentinel: it marks a feature a control does not
/// use. An unbound join must survive offset application untouched, no matter
/// how deeply the owning control is nested.
///
/// Bound joins live in `1..=65535`. Offset arithmetic wraps in 16 bits, the
/// same modular space the panel numbers its joins in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Join(pub u16);

impl Join {
    /// The sentinel for a feature that has no join assigned.
    pub const UNBOUND: Join = Join(0);

    /// Create a join from its wire number.
    pub fn new(number: u16) -> Self {
        Self(number)
    }

    /// The raw wire number.
    pub fn get(self) -> u16 {
        self.0
    }

    /// True when a join number has been assigned.
    pub fn is_bound(self) -> bool {
        self.0 != 0
    }

    /// True for the unbound sentinel.
    pub fn is_unbound(self) -> bool {
        self.0 == 0
    }

    /// Apply an additive offset, preserving the unbound sentinel.
    pub fn with_offset(self, offset: u16) -> Join {
        if self.is_unbound() {
            Join::UNBOUND
        } else {
            Join(self.0.wrapping_add(offset))
        }
    }
}

impl From<u16> for Join {
    fn from(number: u16) -> Self {
        Self(number)
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three signal channels of the join protocol.
///
/// Each channel numbers its joins independently: digital 1 and analog 1 are
/// different sigs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SigKind {
    Digital,
    Analog,
    Serial,
}

impl fmt::Display for SigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigKind::Digital => write!(f, "digital"),
            SigKind::Analog => write!(f, "analog"),
            SigKind::Serial => write!(f, "serial"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_stays_unbound_under_offset() {
        assert_eq!(Join::UNBOUND.with_offset(0), Join::UNBOUND);
        assert_eq!(Join::UNBOUND.with_offset(4010), Join::UNBOUND);
        assert_eq!(Join::UNBOUND.with_offset(u16::MAX), Join::UNBOUND);
    }

    #[test]
    fn bound_join_adds_offset() {
        assert_eq!(Join::new(3).with_offset(35), Join::new(38));
        assert_eq!(Join::new(1).with_offset(4010), Join::new(4011));
    }

    #[test]
    fn offset_wraps_in_sixteen_bits() {
        assert_eq!(Join::new(u16::MAX).with_offset(2), Join::new(1));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sentinel_survives_any_offset(offset in any::<u16>()) {
            prop_assert_eq!(Join::UNBOUND.with_offset(offset), Join::UNBOUND);
        }

        #[test]
        fn bound_offset_is_wrapping_add(number in 1..=u16::MAX, offset in any::<u16>()) {
            let join = Join::new(number);
            prop_assert_eq!(join.with_offset(offset).get(), number.wrapping_add(offset));
        }
    }
}
