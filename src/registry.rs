//! # Location Registry
//!
//! Curated table of named destinations plus the alias table used to resolve
//! free-text itinerary prose to one of them.
//!
//! Itinerary copy says "tostaduría", "café-bar" or "muelle" far more often than
//! it spells out a town name, so resolution runs in two passes:
//!
//! 1. aliases, longest fragment first (ties broken by fragment text), first
//!    substring hit wins;
//! 2. canonical names in table order, case-insensitive substring match.
//!
//! A registry is built once and never mutated afterwards. Share it by
//! reference; it is `Send + Sync`.
//!
//! ```rust
//! use itinerary_map::LocationRegistry;
//!
//! let registry = LocationRegistry::atitlan();
//!
//! let hit = registry.resolve("Caminata al Volcán San Pedro").unwrap();
//! assert_eq!(hit.name, "San Pedro Volcano"); // beats the shorter "san pedro"
//!
//! assert!(registry.resolve("Almuerzo libre").is_none());
//! ```

use std::collections::HashMap;

use log::{error, trace};

use crate::error::ConfigError;
use crate::Coordinate;

/// A canonical destination and its position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedLocation {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Lowercase text fragment that refers to a canonical destination.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alias {
    pub fragment: String,
    pub target: String,
}

/// Result of resolving a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation<'a> {
    pub name: &'a str,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<NamedLocation>,
    /// Lowercased canonical names, parallel to `locations`
    search_names: Vec<String>,
    /// Scan order: longest fragment first
    aliases: Vec<Alias>,
}

impl LocationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Exact lookup by canonical name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Coordinate> {
        self.index_of(name).map(|i| self.locations[i].coordinate)
    }

    /// Resolve free text to a destination, or `None` if nothing matches.
    ///
    /// Misses are expected: most itinerary steps ("Almuerzo", "Tiempo libre")
    /// never name a place.
    pub fn resolve(&self, text: &str) -> Option<ResolvedLocation<'_>> {
        let haystack = text.to_lowercase();

        if let Some(alias) = self
            .aliases
            .iter()
            .find(|a| haystack.contains(a.fragment.as_str()))
        {
            // Targets are validated at build time
            let idx = self.index_of(&alias.target)?;
            return Some(self.resolved(idx));
        }

        if let Some(idx) = self
            .search_names
            .iter()
            .position(|name| haystack.contains(name.as_str()))
        {
            return Some(self.resolved(idx));
        }

        trace!("no destination in '{}'", text);
        None
    }

    /// Aliases in the order `resolve` scans them.
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn locations(&self) -> &[NamedLocation] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.search_names.iter().position(|n| *n == needle)
    }

    fn resolved(&self, idx: usize) -> ResolvedLocation<'_> {
        let loc = &self.locations[idx];
        ResolvedLocation {
            name: &loc.name,
            coordinate: loc.coordinate,
        }
    }

    /// The curated Lake Atitlán destinations used by the tour catalog.
    pub fn atitlan() -> Self {
        let mut builder = Self::builder();
        for (name, lat, lng) in ATITLAN_LOCATIONS {
            builder = builder.location(*name, Coordinate::new(*lat, *lng));
        }
        for (fragment, target) in ATITLAN_ALIASES {
            builder = builder.alias(*fragment, *target);
        }
        match builder.build() {
            Ok(registry) => registry,
            Err(e) => {
                error!("built-in location table rejected: {}", e);
                Self::empty()
            }
        }
    }

    fn empty() -> Self {
        Self {
            locations: Vec::new(),
            search_names: Vec::new(),
            aliases: Vec::new(),
        }
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::atitlan()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects locations and aliases, then validates them in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    locations: Vec<NamedLocation>,
    aliases: Vec<Alias>,
}

impl RegistryBuilder {
    pub fn location(mut self, name: impl Into<String>, coordinate: Coordinate) -> Self {
        self.locations.push(NamedLocation {
            name: name.into(),
            coordinate,
        });
        self
    }

    pub fn alias(mut self, fragment: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push(Alias {
            fragment: fragment.into(),
            target: target.into(),
        });
        self
    }

    pub fn build(self) -> Result<LocationRegistry, ConfigError> {
        let mut search_names: Vec<String> = Vec::with_capacity(self.locations.len());

        for loc in &self.locations {
            let trimmed = loc.name.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if !loc.coordinate.is_valid() {
                return Err(ConfigError::InvalidCoordinate {
                    name: loc.name.clone(),
                    latitude: loc.coordinate.latitude,
                    longitude: loc.coordinate.longitude,
                });
            }
            let lowered = trimmed.to_lowercase();
            if search_names.contains(&lowered) {
                return Err(ConfigError::DuplicateLocation(loc.name.clone()));
            }
            search_names.push(lowered);
        }

        // fragment -> canonical target spelling
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut aliases: Vec<Alias> = Vec::with_capacity(self.aliases.len());

        for alias in self.aliases {
            let fragment = alias.fragment.trim().to_lowercase();
            if fragment.is_empty() {
                return Err(ConfigError::EmptyAlias { target: alias.target });
            }

            let target_lower = alias.target.trim().to_lowercase();
            let Some(idx) = search_names.iter().position(|n| *n == target_lower) else {
                return Err(ConfigError::UnknownAliasTarget {
                    alias: fragment,
                    target: alias.target,
                });
            };
            let target = self.locations[idx].name.clone();

            match seen.get(&fragment) {
                Some(existing) if *existing == target => continue,
                Some(existing) => {
                    return Err(ConfigError::ConflictingAlias {
                        alias: fragment,
                        first: existing.clone(),
                        second: target,
                    });
                }
                None => {}
            }

            seen.insert(fragment.clone(), target.clone());
            aliases.push(Alias { fragment, target });
        }

        aliases.sort_by(|a, b| {
            b.fragment
                .chars()
                .count()
                .cmp(&a.fragment.chars().count())
                .then_with(|| a.fragment.cmp(&b.fragment))
        });

        Ok(LocationRegistry {
            locations: self.locations,
            search_names,
            aliases,
        })
    }
}

// =============================================================================
// Lake Atitlán table
// =============================================================================

const ATITLAN_LOCATIONS: &[(&str, f64, f64)] = &[
    ("Panajachel", 14.7422, -91.1591),
    ("Santa Catarina Palopó", 14.7186, -91.1364),
    ("San Antonio Palopó", 14.6931, -91.1153),
    ("San Lucas Tolimán", 14.6328, -91.1408),
    ("Cerro de Oro", 14.6614, -91.1958),
    ("Santiago Atitlán", 14.6375, -91.2297),
    ("San Pedro Volcano", 14.6564, -91.2667),
    ("San Pedro La Laguna", 14.6936, -91.2727),
    ("San Juan La Laguna", 14.6947, -91.2858),
    ("Indian Nose", 14.7117, -91.3036),
    ("San Marcos La Laguna", 14.7242, -91.2578),
    ("Tzununá", 14.7336, -91.2444),
    ("Jaibalito", 14.7461, -91.2214),
    ("Santa Cruz La Laguna", 14.7464, -91.2069),
    ("Sololá", 14.7730, -91.1830),
];

const ATITLAN_ALIASES: &[(&str, &str)] = &[
    ("panajachel", "Panajachel"),
    ("café-bar", "Panajachel"),
    ("cafe-bar", "Panajachel"),
    ("muelle", "Panajachel"),
    ("calle santander", "Panajachel"),
    ("santa catarina", "Santa Catarina Palopó"),
    ("san antonio", "San Antonio Palopó"),
    ("san lucas", "San Lucas Tolimán"),
    ("tolimán", "San Lucas Tolimán"),
    ("toliman", "San Lucas Tolimán"),
    ("cerro de oro", "Cerro de Oro"),
    ("santiago", "Santiago Atitlán"),
    ("maximón", "Santiago Atitlán"),
    ("maximon", "Santiago Atitlán"),
    ("volcán san pedro", "San Pedro Volcano"),
    ("volcan san pedro", "San Pedro Volcano"),
    ("volcán de san pedro", "San Pedro Volcano"),
    ("volcan de san pedro", "San Pedro Volcano"),
    ("san pedro", "San Pedro La Laguna"),
    ("san juan", "San Juan La Laguna"),
    ("tostaduría", "San Juan La Laguna"),
    ("tostaduria", "San Juan La Laguna"),
    ("tostadoria", "San Juan La Laguna"),
    ("nariz del indio", "Indian Nose"),
    ("indian nose", "Indian Nose"),
    ("rostro maya", "Indian Nose"),
    ("san marcos", "San Marcos La Laguna"),
    ("tzununá", "Tzununá"),
    ("tzununa", "Tzununá"),
    ("jaibalito", "Jaibalito"),
    ("santa cruz", "Santa Cruz La Laguna"),
    ("sololá", "Sololá"),
    ("solola", "Sololá"),
];
