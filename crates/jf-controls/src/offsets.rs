//! The join-offset protocol.
//!
//! Containers translate the local join numbers of their children into the
//! absolute numbers transmitted on the wire by adding a per-channel offset.
//! A child asks only its direct parent; a nested container asks *its* parent
//! for an offset on itself and adds its own contribution, so the total
//! accumulates one addition per nesting level and no level is ever skipped.

use jf_core::Join;

/// Zero-based position of a control within a repeating parent.
///
/// Controls outside a repeating parent report index 0; the index only
/// matters to parents whose offset is a function of the child's slot.
pub trait Indexed {
    fn index(&self) -> u16;
}

/// Additive join offsets a container applies to its children.
pub trait JoinOffsets: Send + Sync {
    /// The digital offset for the given child.
    fn digital_join_offset(&self, child: &dyn Indexed) -> u16;

    /// The analog offset for the given child.
    fn analog_join_offset(&self, child: &dyn Indexed) -> u16;

    /// The serial offset for the given child.
    fn serial_join_offset(&self, child: &dyn Indexed) -> u16;

    /// Resolve a child's local digital join. Unbound stays unbound.
    fn digital_join_with_offset(&self, join: Join, child: &dyn Indexed) -> Join {
        join.with_offset(self.digital_join_offset(child))
    }

    /// Resolve a child's local analog join. Unbound stays unbound.
    fn analog_join_with_offset(&self, join: Join, child: &dyn Indexed) -> Join {
        join.with_offset(self.analog_join_offset(child))
    }

    /// Resolve a child's local serial join. Unbound stays unbound.
    fn serial_join_with_offset(&self, join: Join, child: &dyn Indexed) -> Join {
        join.with_offset(self.serial_join_offset(child))
    }
}

/// Per-row visible/enabled state a repeating parent manages on behalf of its
/// indexed children.
///
/// Reads return the cached value; an index never written reads `false`.
pub trait ItemStates {
    fn item_visible(&self, index: u16) -> bool;
    fn item_enabled(&self, index: u16) -> bool;
    fn set_item_visible(&self, index: u16, visible: bool);
    fn set_item_enabled(&self, index: u16, enabled: bool);
}

/// The parent handle a child control holds for offsets and visibility.
///
/// Injected at construction time; children keep a non-owning reference up
/// the tree and parents hold no references back down.
pub trait ControlParent: crate::base::Control + JoinOffsets {
    /// Row states managed on behalf of indexed children, when this parent
    /// drives repeated rows. Containers with fixed offsets return `None`.
    fn items(&self) -> Option<&dyn ItemStates> {
        None
    }
}
