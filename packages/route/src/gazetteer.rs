//! Place-name lookup for the simulated map.
//!
//! Without a mapping provider nobody geocodes the typed origin and
//! destination, so the simulated map resolves them against a small list of
//! known neighborhoods. A literal `"lat,lng"` is accepted as well.

use std::sync::LazyLock;

use chapchap_geography_models::GeoPoint;
use chapchap_route_models::RouteRequest;
use regex::Regex;

use crate::{RouteEndpoints, RouteError};

/// Punctuation that never contributes to a place match.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;:#'’/\\\-()]+").expect("valid regex"));

/// `lat,lng` with optional whitespace and sign.
static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").expect("valid regex")
});

/// A named point.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name.
    pub name: String,
    /// Location.
    pub location: GeoPoint,
    normalized: String,
}

impl Place {
    /// Creates a place.
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        let name = name.into();
        let normalized = normalize(&name);
        Self {
            name,
            location,
            normalized,
        }
    }
}

/// A list of known places.
#[derive(Debug, Clone, PartialEq)]
pub struct Gazetteer {
    places: Vec<Place>,
}

impl Gazetteer {
    /// Creates a gazetteer from `places`.
    ///
    /// Longer names are tried first so `"Cocody Riviera"` wins over
    /// `"Cocody"` when both match.
    #[must_use]
    pub fn new(mut places: Vec<Place>) -> Self {
        places.sort_by(|a, b| b.normalized.len().cmp(&a.normalized.len()));
        Self { places }
    }

    /// Neighborhoods of Abidjan.
    #[must_use]
    pub fn abidjan() -> Self {
        Self::new(vec![
            Place::new("Plateau", GeoPoint::new(5.3198, -4.0200)),
            Place::new("Cocody", GeoPoint::new(5.3547, -3.9868)),
            Place::new("Cocody Riviera", GeoPoint::new(5.3547, -3.9868)),
            Place::new("Riviera", GeoPoint::new(5.3547, -3.9868)),
            Place::new("Yopougon", GeoPoint::new(5.3364, -4.0731)),
            Place::new("Adjamé", GeoPoint::new(5.3536, -4.0267)),
            Place::new("Marcory", GeoPoint::new(5.2889, -3.9947)),
            Place::new("Treichville", GeoPoint::new(5.2936, -4.0089)),
            Place::new("Koumassi", GeoPoint::new(5.2889, -3.9539)),
            Place::new("Port-Bouët", GeoPoint::new(5.2547, -3.9198)),
        ])
    }

    /// Known places, longest name first.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Resolves free text to a point.
    ///
    /// Matches a `"lat,lng"` literal, otherwise the first known place whose
    /// name appears as whole words in the text. Matching ignores case,
    /// accents and punctuation.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Option<GeoPoint> {
        if let Some(caps) = COORDINATE_RE.captures(query) {
            let lat = caps[1].parse().ok()?;
            let lng = caps[2].parse().ok()?;
            return Some(GeoPoint::new(lat, lng));
        }

        let haystack = format!(" {} ", normalize(query));
        if haystack.trim().is_empty() {
            return None;
        }

        self.places
            .iter()
            .find(|place| haystack.contains(&format!(" {} ", place.normalized)))
            .map(|place| place.location)
    }

    /// Resolves both ends of a route request.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnresolvedPlace`] naming the first end that
    /// could not be resolved.
    pub fn resolve_request(&self, request: &RouteRequest) -> Result<RouteEndpoints, RouteError> {
        let origin = self.resolve_one(&request.origin)?;
        let destination = self.resolve_one(&request.destination)?;
        Ok(RouteEndpoints {
            origin,
            destination,
        })
    }

    fn resolve_one(&self, query: &str) -> Result<GeoPoint, RouteError> {
        self.resolve(query).ok_or_else(|| {
            log::debug!("No known place matches {query:?}");
            RouteError::UnresolvedPlace {
                query: query.to_string(),
            }
        })
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::abidjan()
    }
}

/// Lowercases, folds French accents, turns punctuation into spaces and
/// collapses whitespace.
fn normalize(input: &str) -> String {
    let folded: String = input.to_lowercase().chars().map(fold_accent).collect();
    let no_punct = PUNCTUATION_RE.replace_all(&folded, " ");
    no_punct.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_neighborhood_inside_free_text() {
        let g = Gazetteer::abidjan();
        assert_eq!(
            g.resolve("Rue du Commerce, Plateau"),
            Some(GeoPoint::new(5.3198, -4.0200))
        );
    }

    #[test]
    fn ignores_case_and_accents() {
        let g = Gazetteer::abidjan();
        let expected = Some(GeoPoint::new(5.3536, -4.0267));
        assert_eq!(g.resolve("ADJAME"), expected);
        assert_eq!(g.resolve("adjamé"), expected);
        assert_eq!(g.resolve("Port Bouet"), Some(GeoPoint::new(5.2547, -3.9198)));
    }

    #[test]
    fn requires_whole_word_match() {
        let g = Gazetteer::new(vec![Place::new("Bon", GeoPoint::new(1.0, 1.0))]);
        assert_eq!(g.resolve("Bonoua"), None);
        assert_eq!(g.resolve("Carrefour Bon"), Some(GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn accepts_coordinate_literal() {
        let g = Gazetteer::abidjan();
        assert_eq!(
            g.resolve(" 5.31 , -4.02 "),
            Some(GeoPoint::new(5.31, -4.02))
        );
    }

    #[test]
    fn unknown_and_blank_text_do_not_resolve() {
        let g = Gazetteer::abidjan();
        assert_eq!(g.resolve("Bouaké"), None);
        assert_eq!(g.resolve("   "), None);
    }

    #[test]
    fn request_reports_unresolved_end() {
        let g = Gazetteer::abidjan();
        let err = g
            .resolve_request(&RouteRequest::new("Plateau", "Bouaké"))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::UnresolvedPlace {
                query: "Bouaké".to_string()
            }
        );

        let ends = g
            .resolve_request(&RouteRequest::new("Yopougon", "Marcory"))
            .unwrap();
        assert_eq!(ends.origin, GeoPoint::new(5.3364, -4.0731));
        assert_eq!(ends.destination, GeoPoint::new(5.2889, -3.9947));
    }

    #[test]
    fn longest_name_is_tried_first() {
        let g = Gazetteer::abidjan();
        assert_eq!(g.places()[0].name, "Cocody Riviera");
    }
}
