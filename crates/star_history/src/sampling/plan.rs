use std::collections::BTreeSet;

/// Upper bound on page requests per history computation.
pub const SAMPLE_BUDGET: u32 = 15;

/// Decide which stargazer pages to fetch.
///
/// Below the budget every page is fetched. Otherwise the budget is spread over
/// the page range: sample `i` (for `i` in `2..=SAMPLE_BUDGET`) is page
/// `round(i * total_pages / SAMPLE_BUDGET) - 1`, so the last sample sits just
/// before the final page. Page 1 is always part of the plan and stands in for
/// `i = 1`, so the result never exceeds [`SAMPLE_BUDGET`] pages.
pub fn plan(total_pages: u32) -> BTreeSet<u32> {
    let total_pages = total_pages.max(1);
    if total_pages < SAMPLE_BUDGET {
        return (1..=total_pages).collect();
    }

    let budget = u64::from(SAMPLE_BUDGET);
    let total = u64::from(total_pages);
    let mut pages: BTreeSet<u32> = (2..=budget)
        .map(|i| {
            // Integer round-half-up of i * total / budget.
            let rounded = (2 * i * total + budget) / (2 * budget);
            u32::try_from(rounded.saturating_sub(1))
                .unwrap_or(total_pages)
                .clamp(1, total_pages)
        })
        .collect();
    pages.insert(1);

    tracing::debug!(total_pages, planned = pages.len(), "planned sampled pages");
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_below_budget_takes_every_page() {
        assert_eq!(plan(5), BTreeSet::from([1, 2, 3, 4, 5]));
        assert_eq!(plan(1), BTreeSet::from([1]));
        assert_eq!(plan(14), (1..=14).collect());
    }

    #[test]
    fn test_plan_zero_pages_is_one_page() {
        assert_eq!(plan(0), BTreeSet::from([1]));
    }

    #[test]
    fn test_plan_at_budget() {
        // round(2 * 15 / 15) - 1 collides with the forced page 1.
        assert_eq!(plan(15), (1..=14).collect());
    }

    #[test]
    fn test_plan_spreads_over_large_collections() {
        let pages = plan(150);
        let expected: BTreeSet<u32> = std::iter::once(1)
            .chain((2..=15).map(|i| i * 10 - 1))
            .collect();
        assert_eq!(pages, expected);
        assert_eq!(pages.len(), SAMPLE_BUDGET as usize);
        assert_eq!(pages.first(), Some(&1));
        assert_eq!(pages.last(), Some(&149));
    }

    #[test]
    fn test_plan_reaches_the_end_of_the_collection() {
        for total in [19u32, 57, 150, 400, 4_000, 40_000] {
            let last = *plan(total).last().unwrap();
            assert_eq!(last, total - 1, "total = {total}");
        }
    }

    #[test]
    fn test_plan_rounds_indices() {
        // round(i * 20 / 15) - 1 for i in 2..=15, plus page 1
        let pages: Vec<u32> = plan(20).into_iter().collect();
        assert_eq!(
            pages,
            vec![1, 2, 3, 4, 6, 7, 8, 10, 11, 12, 14, 15, 16, 18, 19]
        );
    }

    #[test]
    fn test_plan_invariants_hold_for_all_sizes() {
        for total in 1..=2_000u32 {
            let pages = plan(total);
            assert!(pages.contains(&1), "page 1 missing for {total}");
            assert!(pages.len() <= SAMPLE_BUDGET as usize, "too many for {total}");
            assert!(pages.iter().all(|p| (1..=total).contains(p)));
            if total >= 19 {
                assert_eq!(pages.len(), SAMPLE_BUDGET as usize, "budget unused for {total}");
            } else if total >= SAMPLE_BUDGET {
                assert_eq!(pages.len(), SAMPLE_BUDGET as usize - 1, "total = {total}");
            } else {
                assert_eq!(pages.len(), total as usize);
            }
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        for total in [15, 99, 400, 40_000, u32::MAX] {
            assert_eq!(plan(total), plan(total));
        }
    }
}
