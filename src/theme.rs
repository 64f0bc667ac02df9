use ratatui::style::{Color, Style};

/// Theme configuration for the annotator
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the text area
    pub background: Color,

    /// The same background as plain RGB; the translucent highlight colors
    /// are flattened against this when painted into terminal cells
    pub background_rgb: (u8, u8, u8),

    /// Foreground (text) color for document text
    pub text_fg: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the document name in the status bar
    pub title_color: Color,

    /// Foreground color for active selection
    pub selection_fg: Color,

    /// Background color for active selection
    pub selection_bg: Color,

    /// Foreground color for highlight list entries
    pub list_fg: Color,

    /// Foreground color for hovered highlight list entries
    pub list_hover_fg: Color,

    /// Border color for the highlight list panel
    pub list_border_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(252, 252, 252),
            background_rgb: (252, 252, 252),
            text_fg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            title_color: Color::LightYellow,
            selection_fg: Color::White,
            selection_bg: Color::LightBlue,
            list_fg: Color::Blue,
            list_hover_fg: Color::Red,
            list_border_fg: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the style for plain document text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_fg).bg(self.background)
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the document name in the status bar
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title_color).bg(self.status_bar_bg)
    }

    /// Get the style for selected text
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    /// Get the style for a highlight list entry
    pub fn list_style(&self) -> Style {
        Style::default().fg(self.list_fg).bg(self.background)
    }

    /// Get the style for a hovered highlight list entry
    pub fn list_hover_style(&self) -> Style {
        Style::default().fg(self.list_hover_fg).bg(self.background)
    }

    /// Get the style for the highlight list border
    pub fn list_border_style(&self) -> Style {
        Style::default().fg(self.list_border_fg).bg(self.background)
    }
}
