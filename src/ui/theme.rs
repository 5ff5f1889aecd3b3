//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// How a status label should read at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Pending,
    Bad,
    Neutral,
}

impl Tone {
    /// Classify a French status label ("Actif", "Annulée", "Complété"...).
    pub fn of_label(label: &str) -> Self {
        match label {
            "Actif" | "Confirmée" | "Complété" => Tone::Good,
            "En attente" => Tone::Pending,
            "Inactif" | "Annulée" | "Échoué" => Tone::Bad,
            _ => Tone::Neutral,
        }
    }
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] to follow the terminal background, or
/// [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for pending statuses ("En attente").
    pub warning: Color,
    /// Color for failed, cancelled and inactive statuses, and load errors.
    pub critical: Color,
    /// Color for active, confirmed and completed statuses.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for table header rows and overlay titles.
    pub header: Style,
    /// Style for the selected row.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a status tone
    pub fn tone_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Good => Style::default().fg(self.healthy),
            Tone::Pending => Style::default().fg(self.warning),
            Tone::Bad => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            Tone::Neutral => Style::default(),
        }
    }

    /// Style for a status label cell.
    pub fn label_style(&self, label: &str) -> Style {
        self.tone_style(Tone::of_label(label))
    }
}
