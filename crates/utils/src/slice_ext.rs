use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find both the minimum and maximum values as `(min, max)`
    ///
    /// Only provides extrema from a collection of valid numbers. Any NAN
    /// values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use nucdiff_utils::SliceExt;
    /// # use nucdiff_utils::Error;
    /// // Successful cases
    /// assert_eq!([-1.5, 0.5, 2.0].try_extrema(), Ok((-1.5, 2.0)));
    /// assert_eq!([1.1, f32::MIN, 2.2].try_extrema(), Ok((f32::MIN, 2.2)));
    ///
    /// // Error cases
    /// assert_eq!([0.0, f64::NAN].try_extrema(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!([1.1, f32::INFINITY].try_extrema(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f32>::new().try_extrema(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// Values are checked in a single pass.
    fn try_extrema(&self) -> Result<(T, T)>;
}

macro_rules! impl_slice_ext {
    ($t:ty) => {
        impl SliceExt<$t> for [$t] {
            fn try_extrema(&self) -> Result<($t, $t)> {
                let (first, rest) = self.split_first().ok_or(Error::SliceContainsNoValues)?;
                if !first.is_finite() {
                    return Err(Error::SliceContainsUndefinedValues);
                }

                let mut extrema = (*first, *first);
                for v in rest {
                    if !v.is_finite() {
                        return Err(Error::SliceContainsUndefinedValues);
                    }
                    extrema.0 = extrema.0.min(*v);
                    extrema.1 = extrema.1.max(*v);
                }

                Ok(extrema)
            }
        }
    };
}

impl_slice_ext!(f32);
impl_slice_ext!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrema_of_single_value() {
        assert_eq!([3.0_f32].try_extrema(), Ok((3.0, 3.0)));
    }

    #[test]
    fn extrema_rejects_infinite_values() {
        assert_eq!(
            [1.0_f32, f32::NEG_INFINITY].try_extrema(),
            Err(Error::SliceContainsUndefinedValues)
        );
        assert_eq!(
            Vec::<f32>::new().try_extrema(),
            Err(Error::SliceContainsNoValues)
        );
    }
}
