//! Correlation-identifier generation
//!
//! Fills a template pattern where each `x` becomes a random hex nibble and
//! each `y` becomes a nibble whose two high bits are `10` (values 8-b); any
//! other character is copied verbatim. The default pattern carries a fixed
//! version nibble, yielding the standard randomized hyphenated identifier.

use rand::Rng;

/// Default identifier pattern: 8-4-4-4-12 hex with version nibble 4
pub const CORRELATION_PATTERN: &str = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";

const HEX: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Generate a fresh identifier from a template pattern
pub fn correlation_id(pattern: &str) -> String {
    let mut rng = rand::rng();
    pattern
        .chars()
        .map(|c| match c {
            'x' => HEX[rng.random_range(0..16)],
            'y' => HEX[rng.random_range(8..12)],
            other => other,
        })
        .collect()
}
