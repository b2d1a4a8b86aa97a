/// Extends string types with useful functions
pub trait StringExt {
    /// Capitalises the first letter in a string
    ///
    /// Element symbols in isotope lists are not always consistent, so this is
    /// used to tidy them up.
    ///
    /// ```rust
    /// # use nucdiff_utils::StringExt;
    /// assert_eq!("he".capitalise(), "He".to_string());
    /// assert_eq!("Fe56".capitalise(), "Fe56".to_string());
    /// ```
    fn capitalise(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(first) => first.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    }
}
