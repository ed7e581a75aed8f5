//! Bill-of-materials helpers: panel row lookup, subtotals and reordering.

use super::error::Violation;
use super::types::LineItem;

/// Locates the single panel row.
///
/// # Errors
///
/// Returns [`Violation::MissingPanelRow`] if no item has order rank 1 and
/// [`Violation::DuplicatePanelRow`] if more than one does.
pub fn panel_row_index(items: &[LineItem]) -> Result<usize, Violation> {
    let mut found = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_panel_row())
        .map(|(i, _)| i);

    let Some(first) = found.next() else {
        return Err(Violation::MissingPanelRow);
    };
    let extra = found.count();
    if extra > 0 {
        return Err(Violation::DuplicatePanelRow { count: extra + 1 });
    }
    Ok(first)
}

/// Sum of `quantity * unit_price` over all items.
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// Returns a new sequence with the element at `from` moved to `to`.
///
/// Order ranks are renumbered from 1 in the new order, so whichever row
/// lands first becomes the panel row. The input slice is left untouched.
/// Returns `None` if either index is out of range.
pub fn move_item(items: &[LineItem], from: usize, to: usize) -> Option<Vec<LineItem>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    for (i, item) in moved.iter_mut().enumerate() {
        item.order_rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
    }
    Some(moved)
}
