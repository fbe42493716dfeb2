use std::collections::HashMap;
use std::sync::LazyLock;

/// Every exercise the recommender may return, in canonical lowercase form.
///
/// The completion prompt and the advice validator both read this list through
/// [`VocabularyRegistry::standard`]; there is no other copy.
pub const EXERCISE_NAMES: &[&str] = &[
    "air bike",
    "bench dip (knees bent)",
    "bench hip extension",
    "bottoms-up",
    "chest dip",
    "chin-ups (narrow parallel grip)",
    "close-grip push-up",
    "crunch floor",
    "dead bug",
    "decline push-up",
    "diamond push-up",
    "donkey calf raise",
    "flutter kicks",
    "front plank with twist",
    "handstand push-up",
    "hanging leg raise",
    "hanging pike",
    "hyperextension",
    "incline push-up",
    "inverted row",
    "jackknife sit-up",
    "jump squat",
    "kipping muscle up",
    "mountain climber",
    "muscle up",
    "oblique crunches floor",
    "one arm chin-up",
    "pull-up",
    "push-up",
    "push-up to side plank",
    "reverse crunch",
    "reverse grip pull-up",
    "ring dips",
    "run",
    "russian twist",
    "scapular pull-up",
    "shoulder tap push-up",
    "single arm push-up",
    "superman push-up",
    "triceps dip",
    "wind sprints",
    "burpee",
    "clap push up",
    "plyo push up",
    "wide hand push up",
    "chin-up",
    "one leg squat",
    "sissy squat",
    "standing calf raise (on a staircase)",
    "hamstring stretch",
    "world greatest stretch",
    "lunge with twist",
    "single leg squat (pistol) male",
    "split squats",
    "scapula push-up",
    "glute-ham raise",
    "front lever",
    "back lever",
    "handstand",
    "skin the cat",
    "bear crawl",
    "skater hops",
    "l-pull-up",
    "l-sit on floor",
    "v-sit on floor",
    "glute bridge march",
    "lunge with jump",
    "reverse plank with leg lift",
    "curtsey squat",
    "archer pull up",
    "archer push up",
    "bodyweight drop jump squat",
    "pike-to-cobra push-up",
    "side lying hip adduction (male)",
    "standing archer",
];

static STANDARD: LazyLock<VocabularyRegistry> =
    LazyLock::new(|| VocabularyRegistry::from_names(EXERCISE_NAMES.iter().copied()));

/// Lowercases and trims a name so lookups ignore case and surrounding whitespace.
pub fn normalize_exercise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Closed set of exercise names accepted from the model.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    /// Canonical names in declaration order (used to render prompts).
    names: Vec<String>,
    /// Normalized form -> index into `names`.
    index: HashMap<String, usize>,
}

impl VocabularyRegistry {
    /// The process-wide registry built from [`EXERCISE_NAMES`].
    pub fn standard() -> &'static VocabularyRegistry {
        &STANDARD
    }

    /// Builds a registry from arbitrary names. Duplicates (after normalization)
    /// keep their first spelling.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self {
            names: Vec::new(),
            index: HashMap::new(),
        };

        for name in names {
            let normalized = normalize_exercise_name(name.as_ref());
            if normalized.is_empty() || registry.index.contains_key(&normalized) {
                continue;
            }
            registry.index.insert(normalized.clone(), registry.names.len());
            registry.names.push(normalized);
        }

        registry
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_exercise_name(name))
    }

    /// Returns the stored spelling for `name`, if it is a member.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.index
            .get(&normalize_exercise_name(name))
            .map(|&i| self.names[i].as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
