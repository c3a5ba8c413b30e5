//! Utility helpers used across the application (formatting, ids, pagination).
//! Keep helpers small and well-documented for readability.

/// Format a Pokémon `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `ho_oh` -> `Ho Oh`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace(['-', '_'], " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Numeric id at the end of a resource URL (`.../pokemon/25/` -> 25), or 0.
pub fn pokemon_id_from_url(url: &str) -> u32 {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
        .and_then(|seg| seg.parse().ok())
        .unwrap_or(0)
}

/// Height and weight come in tenths (decimetres, hectograms).
pub fn format_measure(tenths: u32) -> String {
    format!("{}", tenths as f64 / 10.0)
}

/// One slot in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Gap,
}

/// Pages shown around `current`: the first, the last, and two on each side,
/// with gaps where pages are skipped. Empty when there is at most one page.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageSlot> {
    const DELTA: u32 = 2;
    if total <= 1 {
        return Vec::new();
    }

    let mut slots = vec![PageSlot::Page(1)];
    if current > DELTA + 2 {
        slots.push(PageSlot::Gap);
    }
    let start = current.saturating_sub(DELTA).max(2);
    let end = current.saturating_add(DELTA).min(total - 1);
    slots.extend((start..=end).map(PageSlot::Page));
    if current.saturating_add(DELTA) < total - 1 {
        slots.push(PageSlot::Gap);
    }
    slots.push(PageSlot::Page(total));
    slots
}

/// `Showing 21 to 40 of 1302 Pokémon`
pub fn range_label(current: u32, page_size: u32, total_count: u32) -> String {
    let (current, page_size) = (u64::from(current), u64::from(page_size));
    let start = current.saturating_sub(1) * page_size + 1;
    let end = (current * page_size).min(u64::from(total_count));
    format!("Showing {} to {} of {} Pokémon", start, end, total_count)
}
