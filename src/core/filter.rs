//! Pure filter predicates applied to each fetched listing, in order:
//! room-count marker, then budget ceiling. The seen-set check lives in the
//! watcher because it needs the cycle state.

/// The page mixes "2 pièces" phrases and "T2" codes in titles; either counts,
/// case-insensitively.
pub fn is_two_rooms(title: &str) -> bool {
    let title = title.to_lowercase();
    title.contains("2 pièces") || title.contains("t2")
}

/// Inclusive ceiling: a listing at exactly the budget still qualifies.
pub fn within_budget(price: u32, budget_max: u32) -> bool {
    price <= budget_max
}
