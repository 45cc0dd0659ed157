use std::cmp::Ordering;

use crate::models::ScrapeUrl;

/// Queue order: higher priority first; equal priority is first-come-first-served.
pub fn queue_order(a: &ScrapeUrl, b: &ScrapeUrl) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Sort a batch into queue order. Stable, so rows equal on both keys keep their input order.
pub fn sort_queue(urls: &mut [ScrapeUrl]) {
    urls.sort_by(queue_order);
}

/// True if `urls` is already in queue order.
pub fn is_queue_ordered(urls: &[ScrapeUrl]) -> bool {
    urls.windows(2)
        .all(|pair| queue_order(&pair[0], &pair[1]) != Ordering::Greater)
}
