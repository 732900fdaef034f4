//! Viewport and responsive breakpoint registry.
//!
//! A closed set: the base (desktop) layer plus two override layers. This is
//! static configuration, not mutable entity state - the canvas uses the pixel
//! widths for live sizing and the generator uses the media conditions when
//! emitting responsive CSS.

use serde::{Deserialize, Serialize};

/// Identifier for a responsive style layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportKey {
    /// The unmodified base styles. Never a key in an override map.
    Base,
    /// Tablet override layer.
    Tablet,
    /// Mobile override layer.
    Mobile,
}

impl ViewportKey {
    /// The media condition for this breakpoint's generated CSS.
    ///
    /// `Base` has no media query: the base styles are the resting rules.
    #[must_use]
    pub fn media_query(self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::Tablet => Some("(max-width: 992px)"),
            Self::Mobile => Some("(max-width: 576px)"),
        }
    }

    /// Breakpoint keys in registry order, used for responsive CSS grouping.
    #[must_use]
    pub fn breakpoints() -> [Self; 2] {
        [Self::Tablet, Self::Mobile]
    }
}

impl std::fmt::Display for ViewportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        };
        write!(f, "{name}")
    }
}

/// A canvas viewport preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Preset identifier ("desktop", "tablet", "mobile").
    pub id: &'static str,
    /// Human-readable label for the viewport picker.
    pub label: &'static str,
    /// Canvas width in pixels.
    pub width: u32,
    /// The style layer this viewport edits.
    pub key: ViewportKey,
}

/// The closed viewport registry.
pub const VIEWPORTS: [Viewport; 3] = [
    Viewport {
        id: "desktop",
        label: "Desktop (1200px)",
        width: 1200,
        key: ViewportKey::Base,
    },
    Viewport {
        id: "tablet",
        label: "Tablet (768px)",
        width: 768,
        key: ViewportKey::Tablet,
    },
    Viewport {
        id: "mobile",
        label: "Mobile (375px)",
        width: 375,
        key: ViewportKey::Mobile,
    },
];
