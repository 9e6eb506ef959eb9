//! Signal lexicons for deterministic feature scoring
//!
//! Every scorer in the engine detects semantic categories through fixed
//! word/phrase sets. The sets are compiled into case-insensitive regexes
//! exactly once at process start and the resulting registry is immutable,
//! so it is thread-safe by construction. English-centric matching only.

use crate::types::MessageSample;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Semantic categories detected by pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexiconCategory {
    /// Conceptual/curiosity vocabulary (openness signal)
    ConceptualCuriosity,

    /// Precision and structure vocabulary (conscientiousness signal)
    PrecisionStructure,

    /// Warmth and appreciation vocabulary (agreeableness signal)
    Warmth,

    /// Anxiety vocabulary (neuroticism signal)
    Anxiety,

    /// General emotion words (awareness signal)
    EmotionWords,

    /// Empathy phrases (empathy signal, also a quirk source)
    EmpathyPhrases,

    /// Cognitive style lexicons, mutually disjoint
    Analytical,
    Creative,
    AbstractThinking,
    ConcreteThinking,

    /// Imperative sentence starts (dominance and assertiveness signals)
    ImperativeStarts,

    /// First-person-plural / collaboration vocabulary
    Collaboration,

    /// Conflict markers, checked in presence order
    AggressiveConflict,
    CompromiseConflict,
    AvoidanceConflict,

    /// Humor registers
    SelfDeprecatingHumor,
    AffiliativeHumor,

    /// Register markers
    FormalRegister,
    CasualRegister,

    /// Hedging phrases (passive-assertiveness signal)
    Hedges,

    /// Vulnerability disclosures (attachment signal)
    Vulnerability,

    /// Technical vocabulary (quirk detection)
    TechnicalVocabulary,
}

fn word_pattern(words: &[&str]) -> Regex {
    let joined = words.join("|");
    Regex::new(&format!(r"(?i)\b(?:{joined})\b")).expect("static lexicon pattern must compile")
}

/// Category → compiled pattern, built once at process start
static LEXICONS: Lazy<HashMap<LexiconCategory, Regex>> = Lazy::new(|| {
    use LexiconCategory::*;

    let mut map = HashMap::new();
    map.insert(
        ConceptualCuriosity,
        word_pattern(&[
            "wonder",
            "curious",
            "fascinating",
            "imagine",
            "theory",
            "concept",
            "what if",
            "why does",
            "why do",
            "possibility",
            "philosophy",
            "explore",
            "intriguing",
        ]),
    );
    map.insert(
        PrecisionStructure,
        word_pattern(&[
            "specifically",
            "precisely",
            "exactly",
            "organized",
            "organize",
            "schedule",
            "plan",
            "planning",
            "checklist",
            "deadline",
            "systematic",
            "thorough",
            "consistent",
            "step by step",
        ]),
    );
    map.insert(
        Warmth,
        word_pattern(&[
            "thanks",
            "thank you",
            "appreciate",
            "glad",
            "happy for you",
            "love that",
            "you're welcome",
            "no worries",
            "take care",
            "proud of you",
            "so kind",
            "sweet of you",
        ]),
    );
    map.insert(
        Anxiety,
        word_pattern(&[
            "worried",
            "anxious",
            "nervous",
            "scared",
            "afraid",
            "stress",
            "stressed",
            "overwhelmed",
            "panic",
            "panicking",
            "uneasy",
            "dread",
            "freaking out",
        ]),
    );
    map.insert(
        EmotionWords,
        word_pattern(&[
            "happy",
            "sad",
            "angry",
            "excited",
            "frustrated",
            "love",
            "hate",
            "fear",
            "joy",
            "upset",
            "annoyed",
            "thrilled",
            "miserable",
            "delighted",
            "furious",
            "grateful",
            "lonely",
            "hopeful",
        ]),
    );
    map.insert(
        EmpathyPhrases,
        word_pattern(&[
            "i understand",
            "that must be",
            "i'm sorry",
            "that sounds hard",
            "that sounds rough",
            "i can imagine",
            "i hear you",
            "i'm here for you",
            "how are you feeling",
            "makes sense that you",
            "anyone would feel",
        ]),
    );
    map.insert(
        Analytical,
        word_pattern(&[
            "analyze",
            "analysis",
            "therefore",
            "logic",
            "logical",
            "evidence",
            "data",
            "hypothesis",
            "measure",
            "compare",
            "conclusion",
            "objectively",
            "reasoning",
        ]),
    );
    map.insert(
        Creative,
        word_pattern(&[
            "create",
            "creative",
            "design",
            "invent",
            "artistic",
            "brainstorm",
            "sketch",
            "compose",
            "improvise",
            "remix",
            "original idea",
            "riff",
        ]),
    );
    map.insert(
        AbstractThinking,
        word_pattern(&[
            "principle",
            "pattern",
            "framework",
            "essentially",
            "fundamentally",
            "in general",
            "paradigm",
            "abstraction",
            "conceptually",
            "big picture",
        ]),
    );
    map.insert(
        ConcreteThinking,
        word_pattern(&[
            "for example",
            "in practice",
            "literally",
            "right now",
            "today",
            "this one",
            "hands-on",
            "concretely",
            "in real life",
            "actual",
        ]),
    );
    map.insert(
        ImperativeStarts,
        Regex::new(
            r"(?im)^(?:do|don't|go|stop|wait|look|listen|take|make|give|get|try|check|run|use|read|remember|consider|note)\b",
        )
        .expect("static lexicon pattern must compile"),
    );
    map.insert(
        Collaboration,
        word_pattern(&[
            "we",
            "us",
            "our",
            "let's",
            "together",
            "team",
            "collaborate",
            "we could",
            "we should",
            "both of us",
        ]),
    );
    map.insert(
        AggressiveConflict,
        word_pattern(&[
            "you're wrong",
            "that's stupid",
            "ridiculous",
            "shut up",
            "you always",
            "you never",
            "idiot",
            "garbage take",
            "fight me",
            "absolute nonsense",
        ]),
    );
    map.insert(
        CompromiseConflict,
        word_pattern(&[
            "middle ground",
            "meet halfway",
            "fair enough",
            "compromise",
            "both right",
            "split the difference",
            "i see both sides",
            "can agree on",
        ]),
    );
    map.insert(
        AvoidanceConflict,
        word_pattern(&[
            "let's drop it",
            "nevermind",
            "never mind",
            "doesn't matter",
            "forget it",
            "moving on",
            "not worth arguing",
            "i'd rather not",
            "whatever you say",
        ]),
    );
    map.insert(
        SelfDeprecatingHumor,
        word_pattern(&[
            "i'm an idiot",
            "my bad lol",
            "i suck",
            "classic me",
            "i'm the worst",
            "leave it to me to",
            "i can't do anything right",
            "as usual i",
        ]),
    );
    map.insert(
        AffiliativeHumor,
        word_pattern(&[
            "lol",
            "lmao",
            "haha",
            "hahaha",
            "rofl",
            "that's hilarious",
            "good one",
            "just kidding",
            "joking",
            "cracks me up",
        ]),
    );
    map.insert(
        FormalRegister,
        word_pattern(&[
            "furthermore",
            "regarding",
            "therefore",
            "nevertheless",
            "accordingly",
            "moreover",
            "hence",
            "per our",
            "kindly",
            "sincerely",
            "with respect to",
        ]),
    );
    map.insert(
        CasualRegister,
        word_pattern(&[
            "gonna",
            "wanna",
            "kinda",
            "sorta",
            "yeah",
            "nah",
            "dude",
            "tbh",
            "imo",
            "btw",
            "gotta",
            "ngl",
            "fr",
        ]),
    );
    map.insert(
        Hedges,
        word_pattern(&[
            "maybe",
            "perhaps",
            "i think",
            "i guess",
            "possibly",
            "sort of",
            "kind of",
            "not sure",
            "could be",
            "i suppose",
            "it might",
            "probably",
        ]),
    );
    map.insert(
        Vulnerability,
        word_pattern(&[
            "i feel",
            "to be honest",
            "honestly",
            "i've been struggling",
            "i'm scared",
            "i trust you",
            "never told anyone",
            "opening up",
            "i need help",
            "i'm not okay",
            "hard for me to say",
        ]),
    );
    map.insert(
        TechnicalVocabulary,
        word_pattern(&[
            "algorithm",
            "compiler",
            "database",
            "server",
            "api",
            "kernel",
            "protocol",
            "refactor",
            "latency",
            "thread",
            "async",
            "schema",
            "endpoint",
        ]),
    );

    map
});

/// Unicode emoji plus common dingbat/symbol blocks
pub static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{1F300}-\u{1FAFF}\u{2600}-\u{27BF}\u{2B00}-\u{2BFF}\u{FE0F}]")
        .expect("static emoji pattern must compile")
});

/// Technical-indicator patterns; the number of DISTINCT indicators matched
/// across a message window drives the technical-knowledge level.
pub static TECHNICAL_INDICATORS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    let compile = |p: &str| Regex::new(p).expect("static indicator pattern must compile");
    vec![
        ("code-markup", compile(r"```|`[^`\n]+`")),
        (
            "languages",
            compile(r"(?i)\b(?:rust|python|typescript|javascript|kotlin|golang|java|sql)\b"),
        ),
        (
            "infrastructure",
            compile(r"(?i)\b(?:docker|kubernetes|deploy(?:ment)?|ci/cd|pipeline|terraform)\b"),
        ),
        (
            "cs-concepts",
            compile(
                r"(?i)\b(?:algorithm|complexity|big o|data structure|hash map|mutex|race condition)\b",
            ),
        ),
        (
            "tooling",
            compile(r"(?i)\b(?:git|github|compiler|debugger|ide|terminal|shell|profiler)\b"),
        ),
        (
            "protocols",
            compile(r"(?i)\b(?:http|https|tcp|udp|dns|websocket|grpc|rest api)\b"),
        ),
    ]
});

/// Topic keyword sets for interest detection
pub static TOPICS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "technology",
            word_pattern(&[
                "software", "hardware", "programming", "code", "coding", "computer", "app",
                "startup", "ai", "tech",
            ]),
        ),
        (
            "gaming",
            word_pattern(&[
                "game", "gaming", "console", "playthrough", "speedrun", "multiplayer", "rpg",
                "fps", "quest", "boss fight",
            ]),
        ),
        (
            "music",
            word_pattern(&[
                "music", "song", "album", "band", "concert", "playlist", "guitar", "melody",
                "vinyl", "lyrics",
            ]),
        ),
        (
            "sports",
            word_pattern(&[
                "game tonight", "match", "team", "season", "playoffs", "league", "score",
                "training", "workout", "tournament",
            ]),
        ),
        (
            "food",
            word_pattern(&[
                "recipe", "cooking", "baking", "restaurant", "dinner", "lunch", "delicious",
                "flavor", "ingredients", "cuisine",
            ]),
        ),
        (
            "movies",
            word_pattern(&[
                "movie", "film", "series", "episode", "director", "trailer", "cinema",
                "season finale", "documentary", "binge",
            ]),
        ),
        (
            "art",
            word_pattern(&[
                "painting", "drawing", "illustration", "gallery", "sculpture", "sketchbook",
                "canvas", "artist", "exhibit", "watercolor",
            ]),
        ),
        (
            "science",
            word_pattern(&[
                "science", "physics", "biology", "chemistry", "experiment", "research", "study",
                "paper", "quantum", "astronomy",
            ]),
        ),
        (
            "finance",
            word_pattern(&[
                "invest", "investing", "stocks", "market", "crypto", "budget", "savings",
                "portfolio", "interest rate", "economy",
            ]),
        ),
        (
            "travel",
            word_pattern(&[
                "travel", "trip", "flight", "hotel", "vacation", "itinerary", "backpacking",
                "passport", "sightseeing", "abroad",
            ]),
        ),
    ]
});

/// Closed set of low-effort filler tokens (exact, case-insensitive match)
pub const FILLER_TOKENS: &[&str] = &[
    "lol", "lmao", "ok", "okay", "k", "kk", "yeah", "yep", "yes", "no", "nah", "hm", "hmm",
    "haha", "same", "this", "nice", "cool", "+1", "^", "wow", "oof", "rip",
];

/// The compiled pattern for a category
pub fn pattern(category: LexiconCategory) -> &'static Regex {
    &LEXICONS[&category]
}

/// Total category hits in one text
pub fn hits_in(category: LexiconCategory, text: &str) -> usize {
    pattern(category).find_iter(text).count()
}

/// Total category hits across a message window
pub fn total_hits(category: LexiconCategory, messages: &[MessageSample]) -> usize {
    messages
        .iter()
        .map(|m| hits_in(category, &m.content))
        .sum()
}

/// Category hits normalized by message count (0.0 for an empty window)
pub fn density(category: LexiconCategory, messages: &[MessageSample]) -> f64 {
    if messages.is_empty() {
        return 0.0;
    }
    total_hits(category, messages) as f64 / messages.len() as f64
}

/// Number of messages containing at least one category hit
pub fn messages_matching(category: LexiconCategory, messages: &[MessageSample]) -> usize {
    let re = pattern(category);
    messages.iter().filter(|m| re.is_match(&m.content)).count()
}

/// Number of DISTINCT technical indicators matched anywhere in the window
pub fn distinct_technical_indicators(messages: &[MessageSample]) -> usize {
    TECHNICAL_INDICATORS
        .iter()
        .filter(|(_, re)| messages.iter().any(|m| re.is_match(&m.content)))
        .count()
}

/// Whether a trimmed message is one of the closed filler tokens
pub fn is_filler(content: &str) -> bool {
    let trimmed = content.trim().to_lowercase();
    FILLER_TOKENS.iter().any(|t| *t == trimmed)
}
