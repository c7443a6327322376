//! Custom actions for the inventory actor.

/// Stock operations beyond plain updates.
#[derive(Debug, Clone, Copy)]
pub enum InventoryAction {
    /// Removes `u32` units, stopping at zero. Yields the new stock level.
    Decrement(u32),
}
