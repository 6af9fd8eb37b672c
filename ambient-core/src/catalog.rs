//! Pattern-Katalog: feste Tabelle der abspielbaren LED-Sequenzen
//!
//! Die Patterns sind reine Daten. Die Interpretation (Timing, Looping)
//! übernimmt die [`PatternEngine`](crate::engine::PatternEngine).

use crate::types::ChannelLevels;

/// Ein Frame eines Patterns: Kanal-Kombination plus Anzeigedauer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStep {
    pub levels: ChannelLevels,
    pub duration_ms: u32,
}

impl PatternStep {
    pub const fn new(red: bool, yellow: bool, green: bool, duration_ms: u32) -> Self {
        Self {
            levels: ChannelLevels::new(red, yellow, green),
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub id: u8,
    pub name: &'static str,
    pub steps: &'static [PatternStep],
}

impl Pattern {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Fehler bei der Pattern-Auswahl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Keine Pattern mit dieser ID im Katalog
    NotFound(i32),
}

/// Unveränderliche Sammlung von Patterns mit eindeutigen IDs
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    patterns: &'static [Pattern],
}

impl Catalog {
    /// Erstellt einen Katalog und prüft ihn
    ///
    /// Im `const`-Kontext schlägt ein ungültiger Katalog bereits beim
    /// Kompilieren fehl: leere Patterns, Steps mit Dauer 0 und doppelte IDs
    /// sind nicht erlaubt.
    pub const fn new(patterns: &'static [Pattern]) -> Self {
        let mut i = 0;
        while i < patterns.len() {
            let pattern = &patterns[i];
            assert!(!pattern.steps.is_empty(), "pattern without steps");

            let mut s = 0;
            while s < pattern.steps.len() {
                assert!(pattern.steps[s].duration_ms > 0, "step duration must be > 0");
                s += 1;
            }

            let mut j = i + 1;
            while j < patterns.len() {
                assert!(patterns[j].id != pattern.id, "duplicate pattern id");
                j += 1;
            }
            i += 1;
        }
        Self { patterns }
    }

    pub fn lookup(&self, id: i32) -> Result<&'static Pattern, PatternError> {
        let patterns: &'static [Pattern] = self.patterns;
        patterns
            .iter()
            .find(|pattern| i32::from(pattern.id) == id)
            .ok_or(PatternError::NotFound(id))
    }

    pub fn patterns(&self) -> &'static [Pattern] {
        self.patterns
    }
}

// ============================================================================
// Standard-Katalog
// ============================================================================

const fn step(red: bool, yellow: bool, green: bool, duration_ms: u32) -> PatternStep {
    PatternStep::new(red, yellow, green, duration_ms)
}

/// Rock: aggressives rotes Blinken mit gelben Akzenten
const ROCK: [PatternStep; 4] = [
    step(true, false, false, 150),
    step(false, false, false, 100),
    step(true, true, false, 150),
    step(false, false, false, 100),
];

/// Pop: fröhlicher Durchlauf durch alle Farben
const POP: [PatternStep; 6] = [
    step(true, false, false, 300),
    step(false, true, false, 300),
    step(false, false, true, 300),
    step(true, true, false, 200),
    step(false, true, true, 200),
    step(true, true, true, 300),
];

/// Jazz: langsamer, warmer Wechsel Rot/Gelb
const JAZZ: [PatternStep; 5] = [
    step(true, false, false, 800),
    step(true, true, false, 600),
    step(false, true, false, 800),
    step(false, true, false, 400),
    step(false, false, false, 400),
];

/// Classical: sanfter Lauf von Rot nach Grün
const CLASSICAL: [PatternStep; 6] = [
    step(true, false, false, 500),
    step(true, true, false, 400),
    step(false, true, false, 500),
    step(false, true, true, 400),
    step(false, false, true, 500),
    step(false, false, false, 300),
];

/// Electronic: schnelles Stroboskop
const ELECTRONIC: [PatternStep; 6] = [
    step(true, true, true, 80),
    step(false, false, false, 50),
    step(true, false, true, 100),
    step(false, false, false, 50),
    step(false, true, false, 100),
    step(false, false, false, 50),
];

/// Hip-Hop: rhythmische Beats mit Pausen
const HIP_HOP: [PatternStep; 6] = [
    step(true, true, false, 200),
    step(false, false, false, 300),
    step(true, true, false, 200),
    step(false, false, false, 300),
    step(true, true, true, 150),
    step(false, false, false, 500),
];

const PATTERNS: [Pattern; 6] = [
    Pattern { id: 1, name: "Rock", steps: &ROCK },
    Pattern { id: 2, name: "Pop", steps: &POP },
    Pattern { id: 3, name: "Jazz", steps: &JAZZ },
    Pattern { id: 4, name: "Classical", steps: &CLASSICAL },
    Pattern { id: 5, name: "Electronic", steps: &ELECTRONIC },
    Pattern { id: 6, name: "Hip-Hop", steps: &HIP_HOP },
];

/// Der eingebaute Katalog (IDs 1-6)
pub const DEFAULT_CATALOG: Catalog = Catalog::new(&PATTERNS);

#[cfg(feature = "defmt")]
impl defmt::Format for PatternError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PatternError::NotFound(id) => defmt::write!(fmt, "Pattern {} not found", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_six_patterns() {
        let ids: [u8; 6] = core::array::from_fn(|i| DEFAULT_CATALOG.patterns()[i].id);
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
        for pattern in DEFAULT_CATALOG.patterns() {
            assert!((4..=6).contains(&pattern.step_count()));
        }
    }

    #[test]
    fn test_lookup_found() {
        let pattern = DEFAULT_CATALOG.lookup(3).unwrap();
        assert_eq!(pattern.name, "Jazz");
        assert_eq!(pattern.step_count(), 5);
    }

    #[test]
    fn test_lookup_not_found() {
        assert_eq!(DEFAULT_CATALOG.lookup(0), Err(PatternError::NotFound(0)));
        assert_eq!(DEFAULT_CATALOG.lookup(7), Err(PatternError::NotFound(7)));
        assert_eq!(DEFAULT_CATALOG.lookup(-1), Err(PatternError::NotFound(-1)));
        assert_eq!(
            DEFAULT_CATALOG.lookup(257),
            Err(PatternError::NotFound(257))
        );
    }

    #[test]
    #[should_panic(expected = "step duration must be > 0")]
    fn test_zero_duration_rejected() {
        static BAD_STEPS: [PatternStep; 1] = [PatternStep::new(true, false, false, 0)];
        static BAD: [Pattern; 1] = [Pattern {
            id: 1,
            name: "bad",
            steps: &BAD_STEPS,
        }];
        let _ = Catalog::new(&BAD);
    }

    #[test]
    #[should_panic(expected = "duplicate pattern id")]
    fn test_duplicate_id_rejected() {
        static STEPS: [PatternStep; 1] = [PatternStep::new(true, false, false, 10)];
        static DUP: [Pattern; 2] = [
            Pattern {
                id: 2,
                name: "a",
                steps: &STEPS,
            },
            Pattern {
                id: 2,
                name: "b",
                steps: &STEPS,
            },
        ];
        let _ = Catalog::new(&DUP);
    }
}
