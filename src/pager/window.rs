/// Indices of the pages to keep materialized around `active`, in render order.
///
/// Every returned value is a true page index, so per-page state keyed on it
/// stays attached to the right page when the window shifts.
pub fn visible_pages(total: usize, active: usize, adjacent: usize, looping: bool) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let span = adjacent.saturating_mul(2).saturating_add(1);
    if span >= total {
        return (0..total).collect();
    }
    let active = active.min(total - 1);

    if !looping {
        let start = active.saturating_sub(adjacent);
        let end = (active + adjacent + 1).min(total);
        return (start..end).collect();
    }

    // adjacent < total here, so neither side underflows
    let start = (active + total - adjacent) % total;
    let end = (active + adjacent + 1) % total;
    if start < end {
        (start..end).collect()
    } else {
        (start..total).chain(0..end).collect()
    }
}
