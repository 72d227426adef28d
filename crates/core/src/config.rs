//! Help rendering options and the terminal width they resolve to.

use std::env;

/// Environment variable holding the terminal width, as exported by most shells.
pub const COLUMNS_VAR: &str = "COLUMNS";

/// Layout options for usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HelpOptions {
    /// Print the flags section after the commands section.
    pub flags_last: bool,
    /// One line per command instead of a usage line plus indented help.
    pub compact: bool,
    /// Upper bound for the wrap width; 0 disables the bound.
    pub wrap_upper_bound: usize,
}

impl HelpOptions {
    /// Resolves the wrap width from the `COLUMNS` environment variable.
    ///
    /// # Returns
    ///
    /// `None` when text should not be wrapped at all.
    #[must_use]
    pub fn wrap_width(&self) -> Option<usize> {
        let columns = env::var(COLUMNS_VAR).ok();
        self.wrap_width_for(columns.as_deref())
    }

    /// Like [`Self::wrap_width`] with an explicit `COLUMNS` value.
    ///
    /// # Examples
    ///
    /// ```
    /// use upjet_core::config::HelpOptions;
    ///
    /// let options = HelpOptions { wrap_upper_bound: 80, ..HelpOptions::default() };
    /// assert_eq!(options.wrap_width_for(Some("120")), Some(80));
    /// assert_eq!(options.wrap_width_for(Some("60")), Some(60));
    /// assert_eq!(options.wrap_width_for(None), Some(80));
    /// ```
    #[must_use]
    pub fn wrap_width_for(&self, columns: Option<&str>) -> Option<usize> {
        let columns = columns
            .and_then(|columns| columns.trim().parse::<usize>().ok())
            .filter(|columns| *columns > 0);
        let bound = Some(self.wrap_upper_bound).filter(|bound| *bound > 0);

        match (columns, bound) {
            (Some(columns), Some(bound)) => Some(columns.min(bound)),
            (Some(width), None) | (None, Some(width)) => Some(width),
            (None, None) => None,
        }
    }
}
