//! Random hyphenated names for players and rooms.

use crate::rng::DeterministicRng;

const OPINION_ADJECTIVES: &[&str] = &[
    "adorable", "adventurous", "agreeable", "alert", "amused", "anxious", "arrogant", "average",
    "bewildered", "blushing", "bored", "brainy", "brave", "bright", "busy", "calm", "careful",
    "cautious", "charming", "cheerful", "clever", "clumsy", "colorful", "combative", "confused",
    "cooperative", "courageous", "crazy", "creepy", "curious", "cute", "dangerous", "defiant",
    "delightful", "determined", "dizzy", "doubtful", "eager", "elated", "elegant", "enchanting",
    "energetic", "enthusiastic", "envious", "excited", "exuberant", "fair", "faithful", "famous",
    "fancy", "fantastic", "fierce", "foolish", "fragile", "frantic", "friendly", "funny", "gentle",
    "gifted", "glamorous", "gleaming", "glorious", "graceful", "grumpy", "happy", "helpful",
    "hilarious", "hungry", "inquisitive", "itchy", "jealous", "jittery", "jolly", "joyous", "kind",
    "lazy", "lively", "lonely", "lucky", "magnificent", "misty", "modern", "mysterious", "naughty",
    "nervous", "nutty", "obedient", "odd", "outrageous", "panicky", "perfect", "pleasant", "poised",
    "powerful", "precious", "prickly", "proud", "puzzled", "quaint", "relieved", "scary", "shiny",
    "shy", "silly", "sleepy", "smiling", "sparkling", "splendid", "spotless", "stormy", "strange",
    "super", "talented", "tame", "tasty", "tender", "tense", "thankful", "thoughtful", "tired",
    "tough", "unusual", "uptight", "vast", "victorious", "vivacious", "wandering", "weary",
    "wild", "wistful", "witty", "worried", "zany", "zealous",
];

const COLOUR_ADJECTIVES: &[&str] = &[
    "amber", "amethyst", "apricot", "aqua", "auburn", "azure", "beige", "bronze", "buff", "carmine",
    "celadon", "cerise", "cerulean", "charcoal", "chartreuse", "cinnamon", "copper", "coral",
    "cream", "crimson", "cyan", "denim", "ebony", "ecru", "emerald", "fuchsia", "gold",
    "goldenrod", "indigo", "ivory", "jade", "khaki", "lavender", "lemon", "lilac", "lime",
    "magenta", "mahogany", "maroon", "mauve", "mustard", "ocher", "olive", "orchid", "peach",
    "periwinkle", "persimmon", "pewter", "puce", "pumpkin", "rose", "ruby", "russet", "rust",
    "saffron", "salmon", "sapphire", "scarlet", "sepia", "shamrock", "sienna", "silver", "slate",
    "tangerine", "taupe", "teal", "terracotta", "thistle", "tomato", "topaz", "turquoise",
    "ultramarine", "umber", "vermilion", "violet", "viridian", "wheat", "wisteria",
];

const NOUNS: &[&str] = &[
    "aardvark", "albatross", "alpaca", "anaconda", "angelfish", "anteater", "antelope", "armadillo",
    "axolotl", "baboon", "badger", "barracuda", "beagle", "beaver", "bison", "blobfish", "bobcat",
    "bonobo", "buffalo", "bumblebee", "butterfly", "caiman", "camel", "capybara", "caracal",
    "cardinal", "caribou", "cassowary", "chameleon", "cheetah", "chinchilla", "chipmunk",
    "clownfish", "coati", "cockatoo", "cougar", "coyote", "crane", "cricket", "cuttlefish",
    "dingo", "dodo", "dolphin", "dormouse", "dragonfly", "dugong", "eagle", "echidna", "egret",
    "elephant", "emu", "falcon", "ferret", "flamingo", "fossa", "gazelle", "gecko", "gerbil",
    "gibbon", "giraffe", "gopher", "gorilla", "grasshopper", "hamster", "hedgehog", "heron",
    "hippopotamus", "hornbill", "hummingbird", "hyena", "ibex", "ibis", "iguana", "impala",
    "jackal", "jaguar", "jellyfish", "kakapo", "kangaroo", "kestrel", "kingfisher", "kinkajou",
    "kiwi", "koala", "krill", "lemur", "leopard", "lion", "llama", "lobster", "lynx", "macaw",
    "manatee", "mandrill", "marmot", "meerkat", "mongoose", "moose", "narwhal", "newt", "numbat",
    "ocelot", "octopus", "okapi", "opossum", "orangutan", "osprey", "ostrich", "otter", "owl",
    "pangolin", "panther", "parrot", "peacock", "pelican", "penguin", "platypus", "porcupine",
    "puffin", "quokka", "quoll", "raccoon", "reindeer", "salamander", "seahorse", "serval", "sloth",
    "squid", "stingray", "stoat", "swordfish", "tapir", "tarsier", "toucan", "tortoise", "vicuna",
    "vulture", "wallaby", "walrus", "warthog", "weasel", "wolverine", "wombat", "yak", "zebra",
];

fn pick(rng: &mut dyn DeterministicRng, words: &[&'static str]) -> &'static str {
    let max = u32::try_from(words.len().saturating_sub(1)).unwrap_or(u32::MAX);
    let index = rng.next_u32_range(0, max) as usize;
    words.get(index).copied().unwrap_or_default()
}

/// Generates an `opinion-noun` name, e.g. `witty-capybara`.
pub fn two_part_name(rng: &mut dyn DeterministicRng) -> String {
    let opinion = pick(rng, OPINION_ADJECTIVES);
    let noun = pick(rng, NOUNS);
    format!("{opinion}-{noun}")
}

/// Generates an `opinion-colour-noun` name, e.g. `witty-teal-capybara`.
pub fn three_part_name(rng: &mut dyn DeterministicRng) -> String {
    let opinion = pick(rng, OPINION_ADJECTIVES);
    let colour = pick(rng, COLOUR_ADJECTIVES);
    let noun = pick(rng, NOUNS);
    format!("{opinion}-{colour}-{noun}")
}
