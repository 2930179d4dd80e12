use anyhow::{Result, bail};
use std::{fmt::Debug, ops::RangeBounds};

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }

    Ok(())
}

/// Check that `num` is finite and non-negative.
pub fn check_size(num: f64) -> Result<()> {
    if !num.is_finite() {
        bail!("number must be finite, but is {num:?}");
    }
    check_num(num, 0.0..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_num_rejects_out_of_range() {
        assert!(check_num(3, 1..10).is_ok());
        assert!(check_num(10, 1..10).is_err());
        assert!(check_num(0.5, 0.0..=1.0).is_ok());
        assert!(check_num(f64::NAN, 0.0..=1.0).is_err());
    }

    #[test]
    fn check_size_rejects_negative_and_non_finite() {
        assert!(check_size(0.0).is_ok());
        assert!(check_size(12.5).is_ok());
        assert!(check_size(-1e-3).is_err());
        assert!(check_size(f64::INFINITY).is_err());
        assert!(check_size(f64::NAN).is_err());
    }
}
