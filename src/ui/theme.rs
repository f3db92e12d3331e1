//! Color theme constants for the dashboard
//!
//! Minimal dark palette: gray chrome, white figures, one accent per series.

use ratatui::style::Color;

// ============================================================================
// Chrome
// ============================================================================

/// Border color for cards and charts
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Header title color
pub const COLOR_HEADER: Color = Color::White;

/// Primary figure color
pub const COLOR_ACCENT: Color = Color::White;

/// Dim text for labels and hints
pub const COLOR_DIM: Color = Color::DarkGray;

// ============================================================================
// Connection indicator
// ============================================================================

pub const COLOR_LIVE: Color = Color::Rgb(4, 181, 117); // green #04B575
pub const COLOR_PENDING: Color = Color::Yellow;
pub const COLOR_DISCONNECTED: Color = Color::Red;

// ============================================================================
// Chart series
// ============================================================================

/// TPS line - citrus orange
pub const COLOR_TPS: Color = Color::Rgb(255, 165, 0);

/// Finality line
pub const COLOR_FINALITY: Color = Color::Cyan;
