//! Terminal stylesheet.

use owo_colors::Style;

/// Styles for each kind of line `dosh` prints. Every style is plain when
/// colors are off.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Section and table titles.
    pub header: Style,
    /// Column headings, percentages.
    pub bold: Style,
    /// Table rules, keys, progress markers.
    pub dim: Style,
    /// Workflow step markers.
    pub step: Style,
}

impl Styles {
    #[must_use]
    pub fn new(colored: bool) -> Self {
        if !colored {
            return Self::default();
        }
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            header: Style::new().bold().cyan(),
            bold: Style::new().bold(),
            dim: Style::new().dimmed(),
            step: Style::new().cyan(),
        }
    }
}
