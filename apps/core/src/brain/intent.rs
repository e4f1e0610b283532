//! Intent Classification using regex signals.
//!
//! Fast pattern-based detection of what a prompt asks an AI coding agent to do.
//! Every intent owns a group of weighted regex signals; structural features of the
//! text (code fences, stack traces, numbered lists) add extra votes. No ML model.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::text;

/// Detected intent type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Build something new (feature, component, endpoint, script)
    CodeGeneration,
    /// Architecture, roadmap, breakdown of work
    Planning,
    /// Improve existing code (refactor, optimize, clean up)
    Refinement,
    /// Find and fix a defect
    Debugging,
    /// Write or update docs, READMEs, comments
    Documentation,
    /// Write or extend tests
    Testing,
    /// Move code or data between versions, frameworks or platforms
    Migration,
    /// Audit code for vulnerabilities
    SecurityReview,
    /// Understand a concept or a codebase
    Learning,
    /// Condense existing material
    Summarization,
    /// Produce a product requirements document
    PrdGeneration,
}

impl Intent {
    /// Every intent, in declaration order
    pub const ALL: [Intent; 11] = [
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::Refinement,
        Intent::Debugging,
        Intent::Documentation,
        Intent::Testing,
        Intent::Migration,
        Intent::SecurityReview,
        Intent::Learning,
        Intent::Summarization,
        Intent::PrdGeneration,
    ];

    /// Tie-break order: earlier wins when two intents score the same
    pub const PRECEDENCE: [Intent; 11] = [
        Intent::PrdGeneration,
        Intent::SecurityReview,
        Intent::Migration,
        Intent::Debugging,
        Intent::Testing,
        Intent::Refinement,
        Intent::Documentation,
        Intent::Summarization,
        Intent::Planning,
        Intent::Learning,
        Intent::CodeGeneration,
    ];

    /// Returns the kebab-case label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::CodeGeneration => "code-generation",
            Intent::Planning => "planning",
            Intent::Refinement => "refinement",
            Intent::Debugging => "debugging",
            Intent::Documentation => "documentation",
            Intent::Testing => "testing",
            Intent::Migration => "migration",
            Intent::SecurityReview => "security-review",
            Intent::Learning => "learning",
            Intent::Summarization => "summarization",
            Intent::PrdGeneration => "prd-generation",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.label() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown intent '{}'", s))
    }
}

/// One value per intent.
///
/// Built in `const` context with every field spelled out, so adding an intent
/// without updating each table fails to compile. `get` is an exhaustive match.
#[derive(Debug, Clone, Copy)]
pub struct IntentTable<T> {
    pub code_generation: T,
    pub planning: T,
    pub refinement: T,
    pub debugging: T,
    pub documentation: T,
    pub testing: T,
    pub migration: T,
    pub security_review: T,
    pub learning: T,
    pub summarization: T,
    pub prd_generation: T,
}

impl<T> IntentTable<T> {
    pub fn get(&self, intent: Intent) -> &T {
        match intent {
            Intent::CodeGeneration => &self.code_generation,
            Intent::Planning => &self.planning,
            Intent::Refinement => &self.refinement,
            Intent::Debugging => &self.debugging,
            Intent::Documentation => &self.documentation,
            Intent::Testing => &self.testing,
            Intent::Migration => &self.migration,
            Intent::SecurityReview => &self.security_review,
            Intent::Learning => &self.learning,
            Intent::Summarization => &self.summarization,
            Intent::PrdGeneration => &self.prd_generation,
        }
    }
}

impl<T: Copy> IntentTable<T> {
    /// Same value for every intent
    pub const fn splat(value: T) -> Self {
        Self {
            code_generation: value,
            planning: value,
            refinement: value,
            debugging: value,
            documentation: value,
            testing: value,
            migration: value,
            security_review: value,
            learning: value,
            summarization: value,
            prd_generation: value,
        }
    }
}

/// Structural traits of the prompt, independent of the intent label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    /// Code fence, file path or identifier-like token present
    pub has_code_context: bool,
    /// Technical vocabulary present
    pub is_technical: bool,
    /// Question or exploratory phrasing
    pub is_open_ended: bool,
    /// Several loose sentences without any markdown structure
    pub needs_structure: bool,
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    /// Detected intent
    pub primary_intent: Intent,
    /// Confidence percentage (0 - 100)
    pub confidence: u8,
    pub characteristics: Characteristics,
    /// Text fragments of the signals that voted for the winning intent
    pub matched_signals: Vec<String>,
}

impl IntentResult {
    /// Result for a caller-supplied intent
    pub fn supplied(intent: Intent, prompt: &str) -> Self {
        Self {
            primary_intent: intent,
            confidence: 100,
            characteristics: IntentClassifier::characteristics(prompt),
            matched_signals: vec!["supplied".to_string()],
        }
    }
}

/// Signal group for one intent
struct SignalGroup {
    intent: Intent,
    signals: &'static LazyLock<Vec<Regex>>,
    weight: f32,
}

// Compile patterns once at startup
// NOTE: expect() is acceptable here, the expressions are compile-time constants
static CODE_GENERATION_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(create|build|implement|write|generate|add|make|develop|scaffold)\b").expect("Invalid regex: creation verbs"),
        Regex::new(r"(?i)\b(function|component|class|endpoint|api|page|module|service|script|app|application|feature|form|cli|website)\b").expect("Invalid regex: code artifacts"),
        Regex::new(r"(?i)\b(code|program|boilerplate)\b").expect("Invalid regex: code nouns"),
    ]
});

static PLANNING_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(plan|planning|roadmap|architecture|architect|design|strategy)\b").expect("Invalid regex: planning nouns"),
        Regex::new(r"(?i)\b(break down|breakdown|milestones?|phases?|steps to|timeline)\b").expect("Invalid regex: breakdown words"),
        Regex::new(r"(?i)\b(how should (i|we)|what's the best way|best approach)\b").expect("Invalid regex: planning questions"),
    ]
});

static REFINEMENT_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(refactor|improve|optimi[sz]e|clean up|cleanup|simplify|restructure|polish|rewrite)\b").expect("Invalid regex: refinement verbs"),
        Regex::new(r"(?i)\b(performance|readability|maintainab\w*|code smell|duplication)\b").expect("Invalid regex: refinement goals"),
    ]
});

static DEBUGGING_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(debug|fix|bug|error|exception|crash(es|ing)?|broken|failing|fails|not working|doesn't work)\b").expect("Invalid regex: defect words"),
        Regex::new(r"(?i)\b(stack ?trace|traceback|panic(ked)?|segfault|null pointer|undefined is not|regression)\b").expect("Invalid regex: failure artifacts"),
    ]
});

static DOCUMENTATION_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(document|documentation|docs|readme|docstrings?|api reference|jsdoc|rustdoc|changelog)\b").expect("Invalid regex: documentation nouns"),
        Regex::new(r"(?i)\b(write up|guide|tutorial|comments? (for|to))\b").expect("Invalid regex: documentation phrasing"),
    ]
});

static TESTING_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(tests?|testing|unit tests?|integration tests?|e2e|coverage|test cases?)\b").expect("Invalid regex: testing nouns"),
        Regex::new(r"(?i)\b(jest|pytest|vitest|mocha|cypress|playwright|assertions?|mocks?|fixtures?)\b").expect("Invalid regex: test tooling"),
    ]
});

static MIGRATION_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(migrate|migration|upgrade|porting|convert|move from|switch from|transition)\b").expect("Invalid regex: migration verbs"),
        Regex::new(r"(?i)\b(legacy|deprecated|v\d+ to v\d+|from \w+ to \w+)\b").expect("Invalid regex: migration context"),
    ]
});

static SECURITY_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(security|vulnerabilit(y|ies)|audit|xss|csrf|sql injection|injection|owasp|cve)\b").expect("Invalid regex: security nouns"),
        Regex::new(r"(?i)\b(authori[sz]ation|permissions?|secrets?|encryption|sanitiz\w*|hardening)\b").expect("Invalid regex: security controls"),
    ]
});

static LEARNING_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(explain|understand|learn|teach|concept|difference between|walk me through)\b").expect("Invalid regex: learning verbs"),
        Regex::new(r"(?i)^\s*(what|why|how)\b").expect("Invalid regex: leading question word"),
    ]
});

static SUMMARIZATION_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(summari[sz]e|summary|tl;?dr|recap|condense|key points|digest)\b").expect("Invalid regex: summary verbs"),
    ]
});

static PRD_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(prd|product requirements?|requirements document|product spec(ification)?)\b").expect("Invalid regex: prd nouns"),
        Regex::new(r"(?i)\b(user stor(y|ies)|personas?|acceptance criteria|success metrics|stakeholders?)\b").expect("Invalid regex: prd sections"),
    ]
});

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```").expect("Invalid regex: code fence"));

static STACK_TRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(at \S+ \(.*:\d+(:\d+)?\)|Traceback \(most recent call last\)|\w*(Error|Exception): )")
        .expect("Invalid regex: stack trace line")
});

static NUMBERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)] ").expect("Invalid regex: numbered list"));

static FILE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w./-]+\.(rs|ts|tsx|js|jsx|py|go|java|rb|json|ya?ml|toml|sql|css|html)\b")
        .expect("Invalid regex: file path")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-z]+_[a-z0-9_]+|[a-z]+[A-Z][A-Za-z0-9]*)\b").expect("Invalid regex: identifier")
});

/// Vocabulary that marks a prompt as technical
const TECHNICAL_TERMS: &[&str] = &[
    "api", "database", "schema", "query", "endpoint", "component", "function", "class",
    "module", "service", "server", "client", "cache", "thread", "async", "rest", "graphql",
    "websocket", "docker", "kubernetes", "pipeline", "deployment", "algorithm", "interface",
    "react", "vue", "angular", "node", "typescript", "javascript", "python", "rust", "go",
    "java", "sql", "postgres", "redis", "auth", "token", "jwt", "oauth", "css", "html",
];

const OPEN_ENDED_MARKERS: &[&str] = &[
    "how should", "what's the best", "what is the best", "ideas", "explore", "options",
    "brainstorm", "any suggestions", "thoughts on",
];

/// Intent classifier using regex signal voting
pub struct IntentClassifier {
    groups: Vec<SignalGroup>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a new intent classifier with all signal groups
    pub fn new() -> Self {
        let groups = vec![
            SignalGroup { intent: Intent::PrdGeneration, signals: &PRD_SIGNALS, weight: 1.3 },
            SignalGroup { intent: Intent::SecurityReview, signals: &SECURITY_SIGNALS, weight: 1.2 },
            SignalGroup { intent: Intent::Migration, signals: &MIGRATION_SIGNALS, weight: 1.1 },
            SignalGroup { intent: Intent::Debugging, signals: &DEBUGGING_SIGNALS, weight: 1.1 },
            SignalGroup { intent: Intent::Testing, signals: &TESTING_SIGNALS, weight: 1.0 },
            SignalGroup { intent: Intent::Refinement, signals: &REFINEMENT_SIGNALS, weight: 1.0 },
            SignalGroup { intent: Intent::Documentation, signals: &DOCUMENTATION_SIGNALS, weight: 1.0 },
            SignalGroup { intent: Intent::Summarization, signals: &SUMMARIZATION_SIGNALS, weight: 1.0 },
            SignalGroup { intent: Intent::Planning, signals: &PLANNING_SIGNALS, weight: 1.0 },
            SignalGroup { intent: Intent::Learning, signals: &LEARNING_SIGNALS, weight: 0.9 },
            SignalGroup { intent: Intent::CodeGeneration, signals: &CODE_GENERATION_SIGNALS, weight: 1.0 },
        ];

        Self { groups }
    }

    /// Extra votes from the shape of the text
    fn structural_votes(text: &str, intent: Intent) -> f32 {
        match intent {
            Intent::Debugging if STACK_TRACE.is_match(text) => 1.0,
            Intent::Refinement if CODE_FENCE.is_match(text) => 0.5,
            Intent::Planning if NUMBERED_LIST.is_match(text) => 0.5,
            _ => 0.0,
        }
    }

    /// Structural traits of a prompt
    pub fn characteristics(text: &str) -> Characteristics {
        let lower = text.to_lowercase();
        let sentence_count = text::sentences(text).len();

        Characteristics {
            has_code_context: CODE_FENCE.is_match(text)
                || FILE_PATH.is_match(text)
                || IDENTIFIER.is_match(text),
            is_technical: text::contains_any(&lower, TECHNICAL_TERMS),
            is_open_ended: text.contains('?') || text::contains_any(&lower, OPEN_ENDED_MARKERS),
            needs_structure: sentence_count > 3 && !text::has_markdown_structure(text),
        }
    }

    /// Classify the intent of a prompt
    pub fn classify(&self, text: &str) -> IntentResult {
        let text = text.trim();

        if text.is_empty() {
            return IntentResult {
                primary_intent: Intent::CodeGeneration,
                confidence: 0,
                characteristics: Characteristics::default(),
                matched_signals: vec![],
            };
        }

        let mut best: Option<(Intent, f32, Vec<String>)> = None;
        let mut runner_up: f32 = 0.0;

        // Groups are stored in precedence order, so a strict comparison keeps
        // the earlier intent on ties.
        for group in &self.groups {
            let mut matched = Vec::new();
            for signal in group.signals.iter() {
                if let Some(m) = signal.find(text) {
                    matched.push(m.as_str().to_lowercase());
                }
            }

            let score = matched.len() as f32 * group.weight
                + Self::structural_votes(text, group.intent);
            if score <= 0.0 {
                continue;
            }

            match &best {
                Some((_, best_score, _)) if score <= *best_score => {
                    runner_up = runner_up.max(score);
                }
                Some((_, best_score, _)) => {
                    runner_up = runner_up.max(*best_score);
                    best = Some((group.intent, score, matched));
                }
                None => best = Some((group.intent, score, matched)),
            }
        }

        let characteristics = Self::characteristics(text);
        match best {
            Some((intent, score, matched_signals)) => {
                let margin = score - runner_up;
                let raw = 40.0 + 15.0 * score + 10.0 * margin;
                IntentResult {
                    primary_intent: intent,
                    confidence: raw.clamp(0.0, 100.0).round() as u8,
                    characteristics,
                    matched_signals,
                }
            }
            None => IntentResult {
                primary_intent: Intent::CodeGeneration,
                confidence: 0,
                characteristics,
                matched_signals: vec![],
            },
        }
    }
}
