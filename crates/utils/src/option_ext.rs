use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Display the contained value, or "none"
    ///
    /// Generic over anything that implements `Display`. Mostly used for
    /// optional limits, where `None` means the axis is left unclamped.
    ///
    /// ```rust
    /// # use nucdiff_utils::OptionExt;
    /// let limit: Option<usize> = Some(80);
    /// assert_eq!(limit.display(), "80");
    ///
    /// let limit: Option<usize> = None;
    /// assert_eq!(limit.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}
