//! Rendering options and configuration.

/// Options for rendering a reconstructed document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include the linear text
    pub include_text: bool,

    /// Include tables
    pub include_tables: bool,

    /// Include form fields
    pub include_forms: bool,

    /// Include YAML frontmatter with the job summary
    pub include_frontmatter: bool,

    /// Include reconstruction warnings
    pub include_warnings: bool,

    /// Escape special Markdown characters in cell and field text
    pub escape_special_chars: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the linear text.
    pub fn with_text(mut self, include: bool) -> Self {
        self.include_text = include;
        self
    }

    /// Enable or disable tables.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable form fields.
    pub fn with_forms(mut self, include: bool) -> Self {
        self.include_forms = include;
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable warnings.
    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    /// Only the linear text.
    pub fn text_only() -> Self {
        Self::default().with_tables(false).with_forms(false)
    }

    /// Only the tables.
    pub fn tables_only() -> Self {
        Self::default().with_text(false).with_forms(false)
    }

    /// Only the form fields.
    pub fn forms_only() -> Self {
        Self::default().with_text(false).with_tables(false)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_text: true,
            include_tables: true,
            include_forms: true,
            include_frontmatter: false,
            include_warnings: false,
            escape_special_chars: true,
        }
    }
}
