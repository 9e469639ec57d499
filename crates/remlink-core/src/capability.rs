//! Learn-capability policy for remote entities.
//!
//! The platform's remote-entity feature enum assigns `LEARN_COMMAND = 1`
//! and `DELETE_COMMAND = 2`; an entity's `supported_features` attribute
//! is the OR of what it can do. The policy is a bit test, not an
//! equality test: learn-and-send hardware advertises a superset mask,
//! and equality would silently hide those devices from the listing.

/// Feature bit: the entity can capture (learn) new commands.
pub const LEARN_COMMAND: u64 = 1;

/// Feature bit: the entity can delete previously learned commands.
pub const DELETE_COMMAND: u64 = 2;

/// Whether a `supported_features` bitmask marks the entity as
/// command-learning-capable. This is the single place the policy lives.
pub fn supports_learning(supported_features: u64) -> bool {
    supported_features & LEARN_COMMAND != 0
}

/// Whether the bitmask allows deleting learned commands.
pub fn supports_deletion(supported_features: u64) -> bool {
    supported_features & DELETE_COMMAND != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learn_only_mask_is_capable() {
        assert!(supports_learning(LEARN_COMMAND));
    }

    #[test]
    fn learn_and_delete_mask_is_capable() {
        // Superset masks must pass -- this is why the policy is a bit
        // test rather than an equality test.
        assert!(supports_learning(LEARN_COMMAND | DELETE_COMMAND));
        assert!(supports_deletion(LEARN_COMMAND | DELETE_COMMAND));
    }

    #[test]
    fn send_only_mask_is_not_capable() {
        assert!(!supports_learning(0));
        assert!(!supports_learning(DELETE_COMMAND));
    }
}
