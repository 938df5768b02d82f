//! Unbiased sampling without replacement.
//!
//! Each draw picks `k` uniformly from the number of items still eligible,
//! then walks the items in their fixed order, skipping ineligible or already
//! chosen ones, until it reaches the `k`-th eligible item. Repeating this
//! `count` times yields a uniformly random subset without materialising a
//! shuffled copy of the input.

use crate::rng::DeterministicRng;

/// Draws an index uniformly from `[0, pool)`. `pool` must be non-zero.
fn draw_below(rng: &mut dyn DeterministicRng, pool: usize) -> usize {
    let max = u32::try_from(pool - 1).unwrap_or(u32::MAX);
    rng.next_u32_range(0, max) as usize
}

/// Returns the position of the `k`-th (zero-based) item satisfying
/// `is_eligible`, or `None` if fewer than `k + 1` items are eligible.
pub fn nth_eligible<T>(
    items: &[T],
    k: usize,
    is_eligible: impl Fn(usize, &T) -> bool,
) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(index, item)| is_eligible(*index, item))
        .nth(k)
        .map(|(index, _)| index)
}

/// Chooses up to `count` distinct positions among the items satisfying
/// `is_eligible`, uniformly at random, in draw order.
///
/// If fewer than `count` items are eligible, every eligible item is chosen.
pub fn sample_indices<T>(
    items: &[T],
    count: usize,
    rng: &mut dyn DeterministicRng,
    is_eligible: impl Fn(&T) -> bool,
) -> Vec<usize> {
    let mut taken = vec![false; items.len()];
    let mut remaining = items.iter().filter(|item| is_eligible(item)).count();
    let mut chosen = Vec::with_capacity(count.min(remaining));

    for _ in 0..count {
        if remaining == 0 {
            break;
        }

        let k = draw_below(rng, remaining);
        let Some(index) = nth_eligible(items, k, |index, item| !taken[index] && is_eligible(item))
        else {
            break;
        };

        taken[index] = true;
        chosen.push(index);
        remaining -= 1;
    }

    chosen
}

/// Chooses one position uniformly among the eligible items.
pub fn sample_one<T>(
    items: &[T],
    rng: &mut dyn DeterministicRng,
    is_eligible: impl Fn(&T) -> bool,
) -> Option<usize> {
    sample_indices(items, 1, rng, is_eligible).into_iter().next()
}
