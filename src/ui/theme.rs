//! Theme system
//!
//! Provides:
//! - Theme struct with all UI colors
//! - Built-in presets (darkwall, catppuccin, nord, gruvbox)
//! - Wheel segment palette
//! - Hex color parsing for palette overrides

use ratatui::style::Color;

/// Default wheel palette, cycled over the participants
pub const SEGMENT_PALETTE: [Color; 12] = [
    Color::Rgb(239, 68, 68),   // #ef4444
    Color::Rgb(249, 115, 22),  // #f97316
    Color::Rgb(234, 179, 8),   // #eab308
    Color::Rgb(34, 197, 94),   // #22c55e
    Color::Rgb(6, 182, 212),   // #06b6d4
    Color::Rgb(59, 130, 246),  // #3b82f6
    Color::Rgb(139, 92, 246),  // #8b5cf6
    Color::Rgb(236, 72, 153),  // #ec4899
    Color::Rgb(245, 158, 11),  // #f59e0b
    Color::Rgb(16, 185, 129),  // #10b981
    Color::Rgb(99, 102, 241),  // #6366f1
    Color::Rgb(244, 63, 94),   // #f43f5e
];

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background for selected items
    pub selection_bg: Color,
    /// Text color for selected items
    pub selection_fg: Color,
    /// Accent color (borders, highlights)
    pub accent: Color,
    /// Dimmed text (weights, secondary info)
    pub dimmed: Color,
    /// More dimmed text (chances, tertiary info)
    pub dimmed_alt: Color,
    /// Search/filter highlight color
    pub search_highlight: Color,
    /// Winner announcement color
    pub winner: Color,
    /// Error status color
    pub error: Color,
    /// Wheel segment colors
    pub segments: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::darkwall()
    }
}

impl Theme {
    /// Darkwall theme - default
    pub fn darkwall() -> Self {
        Self {
            background: Color::Rgb(13, 17, 22),       // #0d1116
            foreground: Color::Rgb(229, 234, 241),    // #e5eaf1
            selection_bg: Color::Rgb(20, 28, 42),     // #141c2a
            selection_fg: Color::Rgb(229, 234, 241),  // #e5eaf1
            accent: Color::Rgb(180, 83, 9),           // #b45309 (amber)
            dimmed: Color::Rgb(156, 163, 175),        // #9ca3af
            dimmed_alt: Color::Rgb(107, 114, 128),    // #6b7280
            search_highlight: Color::Rgb(180, 83, 9), // #b45309
            winner: Color::Rgb(34, 197, 94),          // #22c55e
            error: Color::Rgb(239, 68, 68),           // #ef4444
            segments: SEGMENT_PALETTE.to_vec(),
        }
    }

    /// Catppuccin Mocha theme
    pub fn catppuccin_mocha() -> Self {
        Self {
            background: Color::Rgb(30, 30, 46),       // #1e1e2e (base)
            foreground: Color::Rgb(205, 214, 244),    // #cdd6f4 (text)
            selection_bg: Color::Rgb(49, 50, 68),     // #313244 (surface0)
            selection_fg: Color::Rgb(205, 214, 244),  // #cdd6f4 (text)
            accent: Color::Rgb(137, 180, 250),        // #89b4fa (blue)
            dimmed: Color::Rgb(166, 173, 200),        // #a6adc8 (subtext0)
            dimmed_alt: Color::Rgb(147, 153, 178),    // #9399b2 (overlay2)
            search_highlight: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
            winner: Color::Rgb(166, 227, 161),        // #a6e3a1 (green)
            error: Color::Rgb(243, 139, 168),         // #f38ba8 (red)
            segments: SEGMENT_PALETTE.to_vec(),
        }
    }

    /// Catppuccin Latte theme (light)
    pub fn catppuccin_latte() -> Self {
        Self {
            background: Color::Rgb(239, 241, 245),    // #eff1f5 (base)
            foreground: Color::Rgb(76, 79, 105),      // #4c4f69 (text)
            selection_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface0)
            selection_fg: Color::Rgb(76, 79, 105),    // #4c4f69 (text)
            accent: Color::Rgb(30, 102, 245),         // #1e66f5 (blue)
            dimmed: Color::Rgb(108, 111, 133),        // #6c6f85 (subtext0)
            dimmed_alt: Color::Rgb(140, 143, 161),    // #8c8fa1 (overlay2)
            search_highlight: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
            winner: Color::Rgb(64, 160, 43),          // #40a02b (green)
            error: Color::Rgb(210, 15, 57),           // #d20f39 (red)
            segments: SEGMENT_PALETTE.to_vec(),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),       // #2e3440 (nord0)
            foreground: Color::Rgb(236, 239, 244),    // #eceff4 (nord6)
            selection_bg: Color::Rgb(67, 76, 94),     // #434c5e (nord2)
            selection_fg: Color::Rgb(236, 239, 244),  // #eceff4 (nord6)
            accent: Color::Rgb(136, 192, 208),        // #88c0d0 (nord8)
            dimmed: Color::Rgb(216, 222, 233),        // #d8dee9 (nord4)
            dimmed_alt: Color::Rgb(76, 86, 106),      // #4c566a (nord3)
            search_highlight: Color::Rgb(235, 203, 139), // #ebcb8b (nord13)
            winner: Color::Rgb(163, 190, 140),        // #a3be8c (nord14)
            error: Color::Rgb(191, 97, 106),          // #bf616a (nord11)
            segments: SEGMENT_PALETTE.to_vec(),
        }
    }

    /// Gruvbox dark theme
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),       // #282828 (bg)
            foreground: Color::Rgb(235, 219, 178),    // #ebdbb2 (fg)
            selection_bg: Color::Rgb(60, 56, 54),     // #3c3836 (bg1)
            selection_fg: Color::Rgb(235, 219, 178),  // #ebdbb2 (fg)
            accent: Color::Rgb(215, 153, 33),         // #d79921 (yellow)
            dimmed: Color::Rgb(168, 153, 132),        // #a89984 (gray)
            dimmed_alt: Color::Rgb(146, 131, 116),    // #928374 (gray)
            search_highlight: Color::Rgb(250, 189, 47), // #fabd2f (bright yellow)
            winner: Color::Rgb(152, 151, 26),         // #98971a (green)
            error: Color::Rgb(204, 36, 29),           // #cc241d (red)
            segments: SEGMENT_PALETTE.to_vec(),
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "darkwall" | "default" => Some(Self::darkwall()),
            "catppuccin-mocha" | "catppuccin_mocha" | "catppuccin" => Some(Self::catppuccin_mocha()),
            "catppuccin-latte" | "catppuccin_latte" => Some(Self::catppuccin_latte()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }

    /// Replace the wheel palette with hex colors. Invalid entries are
    /// skipped; an empty result keeps the current palette.
    pub fn with_segment_colors(mut self, hex: &[String]) -> Self {
        let colors: Vec<Color> = hex
            .iter()
            .filter_map(|s| match parse_hex_color(s) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("Ignoring segment color {:?}: {}", s, e);
                    None
                }
            })
            .collect();
        if !colors.is_empty() {
            self.segments = colors;
        }
        self
    }

    /// Color of the segment at `index`
    pub fn segment(&self, index: usize) -> Color {
        if self.segments.is_empty() {
            return self.accent;
        }
        self.segments[index % self.segments.len()]
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ColorError::InvalidHex);
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ColorError::InvalidHex)
    };

    match s.len() {
        // #rgb -> #rrggbb
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    InvalidLength,
    InvalidHex,
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::InvalidLength => write!(f, "invalid color length (expected 3 or 6 hex chars)"),
            ColorError::InvalidHex => write!(f, "invalid hex character"),
        }
    }
}

impl std::error::Error for ColorError {}
