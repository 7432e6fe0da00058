//! Piece-count allocation across regions
//!
//! Quotas follow region area: one piece is reserved per region, the rest is
//! split with floor + largest remainder. Ties go to the lower region index so
//! the result never depends on the random stream.

/// Split `total` pieces over regions with the given areas
///
/// With fewer pieces than regions the largest regions are served first and
/// the others get zero. Otherwise every region gets at least one.
pub fn allocate_quotas(total: usize, areas: &[f64]) -> Vec<usize> {
    let count = areas.len();
    let mut quotas = vec![0usize; count];
    if count == 0 || total == 0 {
        return quotas;
    }

    if total < count {
        for idx in by_area_desc(areas).into_iter().take(total) {
            quotas[idx] = 1;
        }
        return quotas;
    }

    let area_sum: f64 = areas.iter().map(|a| a.max(0.0)).sum();
    let remaining = total - count;
    let mut remainders = Vec::with_capacity(count);
    for (idx, area) in areas.iter().enumerate() {
        let share = if area_sum > 0.0 {
            remaining as f64 * area.max(0.0) / area_sum
        } else {
            remaining as f64 / count as f64
        };
        let whole = share.floor() as usize;
        quotas[idx] = 1 + whole;
        remainders.push((idx, share - whole as f64));
    }

    let assigned: usize = quotas.iter().sum();
    if assigned < total {
        // Stable sort keeps index order among equal remainders.
        remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
        for &(idx, _) in remainders.iter().cycle().take(total - assigned) {
            quotas[idx] += 1;
        }
    }

    let mut assigned: usize = quotas.iter().sum();
    while assigned > total {
        let Some(largest) = by_quota_desc(&quotas).into_iter().find(|&i| quotas[i] > 1) else {
            break;
        };
        quotas[largest] -= 1;
        assigned -= 1;
    }

    quotas
}

fn by_area_desc(areas: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..areas.len()).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));
    order
}

fn by_quota_desc(quotas: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].cmp(&quotas[a]));
    order
}
