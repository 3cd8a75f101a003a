//! Clip browser: plays any clip by index while the resolver is paused.

use rand::Rng;

use super::resolver::AnimState;

const CLIP_COUNT: usize = AnimState::ALL.len();

#[derive(Debug, Default)]
pub struct ClipBrowser {
    enabled: bool,
    index: usize,
}

impl ClipBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::info!("debug mode: {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> AnimState {
        AnimState::ALL[self.index]
    }

    pub fn next(&mut self) -> AnimState {
        self.select(self.index + 1)
    }

    pub fn previous(&mut self) -> AnimState {
        self.select(self.index + CLIP_COUNT - 1)
    }

    /// Wraps around the clip list.
    pub fn select(&mut self, index: usize) -> AnimState {
        self.index = index % CLIP_COUNT;
        self.current()
    }

    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> AnimState {
        self.select(rng.gen_range(0..CLIP_COUNT))
    }

    /// One line per clip: index, clip name, loop or one-shot.
    pub fn listing() -> Vec<String> {
        AnimState::ALL
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let kind = if state.is_looping() { "loop" } else { "once" };
                format!("{i:2}: {} ({kind})", state.clip_name())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn stepping_wraps_both_ways() {
        let mut browser = ClipBrowser::new();
        assert_eq!(browser.previous(), AnimState::Victory);
        assert_eq!(browser.index(), CLIP_COUNT - 1);
        assert_eq!(browser.next(), AnimState::Idle);
        assert_eq!(browser.next(), AnimState::TurnLeft);
        assert_eq!(browser.select(CLIP_COUNT + 3), AnimState::Turn180);
    }

    #[test]
    fn random_pick_stays_in_range() {
        let mut browser = ClipBrowser::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let state = browser.random(&mut rng);
            assert_eq!(state, AnimState::ALL[browser.index()]);
        }
    }

    #[test]
    fn listing_marks_one_shots() {
        let lines = ClipBrowser::listing();
        assert_eq!(lines.len(), CLIP_COUNT);
        assert!(lines[AnimState::ALL.len() - 1].ends_with("(once)"));
        assert!(lines[0].ends_with("(loop)"));
    }
}
