//! Reader configuration.

/// Configuration for opening a binary workbook and reading it through the cursor.
///
/// # Examples
///
/// ```rust
/// use xlsb_cursor::sheet::ReaderOptions;
///
/// let options = ReaderOptions::new()
///     .with_convert_dates(false)
///     .with_skip_unresolved_sheets(false);
/// assert_eq!(options.workbook_part, "xl/workbook.bin");
/// ```
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Part holding the workbook record stream
    pub workbook_part: String,
    /// Part holding the stylesheet (optional in the package)
    pub styles_part: String,
    /// Part holding the shared string table (optional in the package)
    pub shared_strings_part: String,
    /// Surface numbers with a date number format as date/time values
    pub convert_dates: bool,
    /// Skip sheets whose relationship id or part cannot be resolved
    pub skip_unresolved_sheets: bool,
    /// Yield empty rows for row indices the sheet stream skips
    pub fill_missing_rows: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            workbook_part: "xl/workbook.bin".to_string(),
            styles_part: "xl/styles.bin".to_string(),
            shared_strings_part: "xl/sharedStrings.bin".to_string(),
            convert_dates: true,
            skip_unresolved_sheets: true,
            fill_missing_rows: true,
        }
    }
}

impl ReaderOptions {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workbook part path
    pub fn with_workbook_part(mut self, path: impl Into<String>) -> Self {
        self.workbook_part = path.into();
        self
    }

    /// Set the stylesheet part path
    pub fn with_styles_part(mut self, path: impl Into<String>) -> Self {
        self.styles_part = path.into();
        self
    }

    /// Set the shared string table part path
    pub fn with_shared_strings_part(mut self, path: impl Into<String>) -> Self {
        self.shared_strings_part = path.into();
        self
    }

    /// Enable/disable conversion of date-formatted numbers
    pub fn with_convert_dates(mut self, convert: bool) -> Self {
        self.convert_dates = convert;
        self
    }

    /// Enable/disable skipping of unresolvable sheets
    pub fn with_skip_unresolved_sheets(mut self, skip: bool) -> Self {
        self.skip_unresolved_sheets = skip;
        self
    }

    /// Enable/disable filling of skipped row indices
    pub fn with_fill_missing_rows(mut self, fill: bool) -> Self {
        self.fill_missing_rows = fill;
        self
    }
}
