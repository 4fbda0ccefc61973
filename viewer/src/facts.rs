use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Rotating "Did you know" blurbs shown under the gallery.
pub const SPACE_FACTS: &[&str] = &[
    "Venus rotates in the opposite direction to most planets; its day is longer than its year.",
    "A teaspoon of neutron star would weigh about 6 billion tons on Earth.",
    "There are more trees on Earth than stars in the Milky Way (by current estimates).",
    "Saturn could float in water; it is mostly made of gas and has a low average density.",
    "The footprints on the Moon will likely remain for millions of years because the Moon has no atmosphere.",
    "A day on Jupiter lasts about 10 hours; it spins very quickly for its size.",
    "The largest volcano in the solar system is Olympus Mons on Mars, nearly three times the height of Everest.",
    "Space is not completely empty; it contains tiny amounts of dust, gas, and cosmic rays called the interstellar medium.",
];

/// Picks facts at random, avoiding an immediate repeat.
pub struct FactRotation {
    current: Option<usize>,
    rng: StdRng,
}

impl Default for FactRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl FactRotation {
    pub fn new() -> Self {
        Self {
            current: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current.map(|i| SPACE_FACTS[i])
    }

    /// Pick the next fact: a few random retries to dodge the one currently
    /// shown, then fall back to just stepping to the next index.
    pub fn pick(&mut self) -> &'static str {
        let n = SPACE_FACTS.len();
        let mut index = self.rng.gen_range(0..n);

        if let Some(current) = self.current {
            if n > 1 {
                let mut attempts = 0;
                while index == current && attempts < 6 {
                    index = self.rng.gen_range(0..n);
                    attempts += 1;
                }
                if index == current {
                    index = (current + 1) % n;
                }
            }
        }

        self.current = Some(index);
        SPACE_FACTS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_repeats_consecutively() {
        let mut rotation = FactRotation::new();
        let mut previous = rotation.pick();
        for _ in 0..100 {
            let next = rotation.pick();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn current_tracks_last_pick() {
        let mut rotation = FactRotation::new();
        assert!(rotation.current().is_none());
        let fact = rotation.pick();
        assert_eq!(rotation.current(), Some(fact));
    }
}
