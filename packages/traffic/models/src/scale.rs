//! Level to color/label lookup shared by every view.

use serde::Serialize;

use crate::TrafficLevel;

/// A display color as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    /// Wraps a static hex string.
    #[must_use]
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    /// The hex string, e.g. `"#FFEB3B"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.0)
    }
}

impl PartialEq<&str> for Color {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One row of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleEntry {
    /// The level this row describes.
    pub level: TrafficLevel,
    /// Fill color.
    pub color: Color,
    /// User-facing label.
    pub label: &'static str,
}

/// Lookup table from traffic level to color and label.
///
/// Both lookups are total: any value outside `1..=5` yields the fallback
/// entry instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficScale {
    entries: [ScaleEntry; 5],
    fallback_color: Color,
    fallback_label: &'static str,
}

impl TrafficScale {
    /// The scale used throughout the application.
    pub const STANDARD: Self = Self {
        entries: [
            ScaleEntry {
                level: TrafficLevel::Fluide,
                color: Color::new("#4CAF50"),
                label: "Fluide",
            },
            ScaleEntry {
                level: TrafficLevel::Bon,
                color: Color::new("#8BC34A"),
                label: "Bon",
            },
            ScaleEntry {
                level: TrafficLevel::Modere,
                color: Color::new("#FFEB3B"),
                label: "Modéré",
            },
            ScaleEntry {
                level: TrafficLevel::Dense,
                color: Color::new("#FF9800"),
                label: "Dense",
            },
            ScaleEntry {
                level: TrafficLevel::Bloque,
                color: Color::new("#F44336"),
                label: "Bloqué",
            },
        ],
        fallback_color: Color::new("#9E9E9E"),
        fallback_label: "Inconnu",
    };

    fn entry(&self, level: i64) -> Option<&ScaleEntry> {
        TrafficLevel::from_value(level).map(|l| &self.entries[entry_index(l)])
    }

    /// Color for a raw level value.
    #[must_use]
    pub fn color_of(&self, level: i64) -> Color {
        self.entry(level).map_or(self.fallback_color, |e| e.color)
    }

    /// Label for a raw level value.
    #[must_use]
    pub fn label_of(&self, level: i64) -> &'static str {
        self.entry(level).map_or(self.fallback_label, |e| e.label)
    }

    /// Color for a typed level.
    #[must_use]
    pub const fn color(&self, level: TrafficLevel) -> Color {
        self.entries[entry_index(level)].color
    }

    /// Label for a typed level.
    #[must_use]
    pub const fn label(&self, level: TrafficLevel) -> &'static str {
        self.entries[entry_index(level)].label
    }

    /// The color used for unknown levels.
    #[must_use]
    pub const fn fallback_color(&self) -> Color {
        self.fallback_color
    }

    /// The label used for unknown levels.
    #[must_use]
    pub const fn fallback_label(&self) -> &'static str {
        self.fallback_label
    }

    /// Reverse lookup from a label such as `"Modéré"`.
    ///
    /// The backend reports a route's traffic as text; this maps it onto the
    /// same table so badges use the zone colors. Matching ignores case and
    /// surrounding whitespace.
    #[must_use]
    pub fn level_for_label(&self, label: &str) -> Option<TrafficLevel> {
        let wanted = label.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.label.to_lowercase() == wanted)
            .map(|e| e.level)
    }

    /// All rows, lowest level first, for legends.
    #[must_use]
    pub const fn entries(&self) -> &[ScaleEntry; 5] {
        &self.entries
    }
}

impl Default for TrafficScale {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn entry_index(level: TrafficLevel) -> usize {
    (level.value() - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_table_for_known_levels() {
        let scale = TrafficScale::STANDARD;
        let expected = [
            (1, "#4CAF50", "Fluide"),
            (2, "#8BC34A", "Bon"),
            (3, "#FFEB3B", "Modéré"),
            (4, "#FF9800", "Dense"),
            (5, "#F44336", "Bloqué"),
        ];
        for (level, color, label) in expected {
            assert_eq!(scale.color_of(level), color);
            assert_eq!(scale.label_of(level), label);
        }
    }

    #[test]
    fn unknown_levels_fall_back() {
        let scale = TrafficScale::STANDARD;
        for level in [0, 6, -1, i64::MAX, i64::MIN] {
            assert_eq!(scale.color_of(level), "#9E9E9E");
            assert_eq!(scale.label_of(level), "Inconnu");
        }
    }

    #[test]
    fn typed_and_raw_lookups_agree() {
        let scale = TrafficScale::default();
        for level in TrafficLevel::all() {
            assert_eq!(scale.color(*level), scale.color_of(level.value()));
            assert_eq!(scale.label(*level), scale.label_of(level.value()));
        }
    }

    #[test]
    fn reverse_lookup_by_label() {
        let scale = TrafficScale::STANDARD;
        assert_eq!(scale.level_for_label("Modéré"), Some(TrafficLevel::Modere));
        assert_eq!(scale.level_for_label(" dense "), Some(TrafficLevel::Dense));
        assert_eq!(scale.level_for_label("BLOQUÉ"), Some(TrafficLevel::Bloque));
        assert_eq!(scale.level_for_label("Inconnu"), None);
    }

    #[test]
    fn string_comparison_matches_color_equality() {
        let amber = Color::new("#FFEB3B");
        assert_eq!(amber, "#FFEB3B");
        assert_ne!(amber, "#ffeb3b");
        assert_ne!(amber, Color::new("#ffeb3b"));
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&TrafficScale::STANDARD.color_of(3)).unwrap();
        assert_eq!(json, "\"#FFEB3B\"");
    }
}
