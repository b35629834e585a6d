//! Room selection: which catalog types, how many of each.
//!
//! Specs are offered instances in priority order (highest first; equal
//! priorities keep catalog order). Each sweep gives every spec with spare
//! capacity a random number of instances in `[1, remaining]`, clamped so
//! the running total never passes the target. Sweeps repeat until the
//! target is met. The result is shuffled, then an outside-capable room is
//! moved to the front so the ground floor has a front door.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::RoomSpec;
use crate::error::{GenerationError, Result};

/// Pick `num_rooms` room-type names from `specs`.
///
/// Every name appears at most `max_instances` times and entry 0 can border
/// the outside.
pub fn choose_rooms<R: Rng + ?Sized>(
    specs: &[RoomSpec],
    num_rooms: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let capacity: usize = specs.iter().map(|s| s.max_instances as usize).sum();
    if num_rooms > capacity {
        return Err(GenerationError::CapacityExceeded {
            requested: num_rooms,
            capacity,
        });
    }
    if num_rooms == 0 {
        return Ok(Vec::new());
    }

    let mut order: Vec<usize> = (0..specs.len()).collect();
    // Stable sort: equal priorities keep catalog order.
    order.sort_by(|&a, &b| specs[b].priority.cmp(&specs[a].priority));

    let mut placed = vec![0usize; specs.len()];
    let mut total = 0usize;
    while total < num_rooms {
        let before = total;
        for &i in &order {
            if total == num_rooms {
                break;
            }
            let remaining = specs[i].max_instances as usize - placed[i];
            if remaining == 0 {
                continue;
            }
            let count = rng.gen_range(1..=remaining).min(num_rooms - total);
            placed[i] += count;
            total += count;
        }
        if total == before {
            // Unreachable given the capacity check above, but a sweep that
            // places nothing would otherwise spin forever.
            return Err(GenerationError::CapacityExceeded {
                requested: num_rooms,
                capacity: total,
            });
        }
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(num_rooms);
    for &i in &order {
        chosen.extend(std::iter::repeat(i).take(placed[i]));
    }
    chosen.shuffle(rng);

    match chosen.iter().position(|&i| specs[i].borders_outside()) {
        Some(pos) => {
            let entry = chosen.remove(pos);
            chosen.insert(0, entry);
        }
        None => {
            let outside = specs
                .iter()
                .position(|s| s.borders_outside() && s.max_instances > 0)
                .ok_or(GenerationError::NoOutsideRoom)?;
            // None of the chosen types borders the outside, so this type
            // has zero instances so far; evicting a random pick keeps the
            // count at `num_rooms`.
            let evict = rng.gen_range(0..chosen.len());
            log::debug!(
                "no outside-capable room chosen; replacing {} with {}",
                specs[chosen[evict]].name,
                specs[outside].name
            );
            chosen.remove(evict);
            chosen.insert(0, outside);
        }
    }

    Ok(chosen.into_iter().map(|i| specs[i].name.clone()).collect())
}
