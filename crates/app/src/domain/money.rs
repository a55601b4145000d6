//! Money arithmetic over minor currency units.

/// `quantity × unit_price`, or `None` on overflow.
pub(crate) fn line_total(quantity: u32, unit_price: u64) -> Option<u64> {
    unit_price.checked_mul(u64::from(quantity))
}

/// Exact sum of line totals over `(quantity, unit_price)` pairs, or `None` on overflow.
pub(crate) fn sum_line_totals<I>(lines: I) -> Option<u64>
where
    I: IntoIterator<Item = (u32, u64)>,
{
    lines
        .into_iter()
        .try_fold(0_u64, |total, (quantity, unit_price)| {
            total.checked_add(line_total(quantity, unit_price)?)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_quantity_times_price() {
        let total = sum_line_totals([(2, 25_00), (1, 50_00)]);

        assert_eq!(total, Some(100_00));
    }

    #[test]
    fn empty_lines_sum_to_zero() {
        assert_eq!(sum_line_totals(Vec::<(u32, u64)>::new()), Some(0));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(line_total(2, u64::MAX), None);
        assert_eq!(sum_line_totals([(1, u64::MAX), (1, 1)]), None);
    }
}
