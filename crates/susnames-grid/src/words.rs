//! Built-in word bank.

use susnames_core::rng::DeterministicRng;
use susnames_core::sampling::sample_indices;

use crate::domain::grid::GRID_SIZE;

/// Words a grid may be dealt from. Entries are distinct.
pub const WORD_BANK: &[&str] = &[
    "relinquish", "genuine", "formula", "gain", "established", "development", "long",
    "personality", "package", "reveal", "premium", "carve", "authority", "blast", "compromise",
    "acid", "video", "live", "eject", "redundancy", "announcement", "tear", "depressed",
    "cunning", "child", "ocean", "anchor", "lantern", "harvest", "orbit", "whisper", "glacier",
    "bishop", "cipher", "compass", "embassy", "falcon", "fortress", "ghost", "harbor", "island",
    "jungle", "knight", "ladder", "marble", "needle", "opera", "palace", "pirate", "pyramid",
    "quarter", "rocket", "saddle", "shadow", "signal", "spring", "statue", "switch", "temple",
    "thunder", "torch", "tunnel", "umbrella", "valley", "vault", "violin", "volcano", "wagon",
    "window", "yard", "zero", "agent", "alibi", "ambush", "bridge", "bullet", "camera",
    "canyon", "castle", "chain", "circus", "clock", "code", "comet", "crown", "desert",
    "diamond", "doctor", "dragon", "engine", "envelope", "feather", "field", "film", "forest",
    "garden", "glove", "hammer", "helmet", "honey", "horizon", "ice", "ink", "jacket", "jewel",
    "key", "kingdom", "laser", "letter", "lighthouse", "magnet", "map", "mask", "mercury",
    "mirror", "mission", "moon", "mountain", "museum", "night", "novel", "oasis", "paper",
    "passport", "pearl", "pilot", "planet", "poison", "radio", "river", "robot", "rope",
    "satellite", "scarf", "secret", "shell", "silk", "smoke", "spider", "stamp", "storm",
    "suitcase", "sword", "tower", "train", "treasure", "trumpet", "uniform", "virus", "wave",
    "whale", "wire", "wolf",
];

/// Draws `GRID_SIZE` distinct words from [`WORD_BANK`] uniformly at random.
pub fn deal_words(rng: &mut dyn DeterministicRng) -> Vec<String> {
    sample_indices(WORD_BANK, GRID_SIZE, rng, |_| true)
        .into_iter()
        .map(|index| WORD_BANK[index].to_owned())
        .collect()
}
