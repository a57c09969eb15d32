//! Ready-made prompt ideas for users who want a starting point.

use rand::seq::IndexedRandom;

pub const INSPIRATIONS: &[&str] = &[
    "Clockwork heart with glowing gears and vines",
    "Cyberpunk Venice with neon gondolas",
    "Astronaut playing a saxophone on an asteroid",
    "Desert of iridescent glass under three moons",
    "Miniature forest inside a vintage lightbulb",
];

/// Pick one idea uniformly at random.
pub fn random_inspiration() -> &'static str {
    INSPIRATIONS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(INSPIRATIONS[0])
}
