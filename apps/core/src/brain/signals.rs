//! Secondary signals shared by triage and the patterns: does the prompt state an
//! objective, name a tech stack, ask for an output format.

use super::text;

/// Imperative verbs that open a clear objective
pub const ACTION_VERBS: &[&str] = &[
    "create", "build", "implement", "write", "generate", "add", "make", "develop", "design",
    "fix", "debug", "refactor", "optimize", "improve", "migrate", "convert", "upgrade", "test",
    "document", "explain", "summarize", "review", "audit", "plan", "update", "remove", "delete",
    "replace", "set up", "configure", "deploy", "integrate", "analyze", "draft", "port",
];

/// Languages, frameworks and infrastructure worth recognising as a tech stack
pub const TECH_STACK_TERMS: &[&str] = &[
    "react", "vue", "angular", "svelte", "next.js", "nextjs", "nuxt", "node", "node.js",
    "express", "nestjs", "django", "flask", "fastapi", "rails", "laravel", "spring", "rust",
    "python", "typescript", "javascript", "java", "kotlin", "swift", "golang", "ruby",
    "php", "c#", ".net", "postgres", "postgresql", "mysql", "sqlite", "mongodb", "redis",
    "graphql", "docker", "kubernetes", "aws", "gcp", "azure", "tailwind", "prisma", "supabase",
    "firebase",
];

const OBJECTIVE_LABELS: &[&str] = &["objective", "objectives", "goal", "goals", "task", "purpose"];

pub const OUTPUT_FORMAT_TERMS: &[&str] = &[
    "output", "format", "return", "respond with", "json", "markdown", "table", "yaml", "csv",
    "diff", "code block", "as a list", "bullet points",
];

/// First action verb that opens one of the sentences, if any
pub fn leading_action_verb(prompt: &str) -> Option<&'static str> {
    text::sentences(prompt).iter().find_map(|sentence| {
        let lower = sentence
            .trim_start_matches(|c: char| c == '#' || c == '-' || c == '*' || c.is_whitespace())
            .to_lowercase();
        ACTION_VERBS.iter().copied().find(|verb| {
            lower.starts_with(verb)
                && lower[verb.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

/// An explicit objective label or a sentence that opens with an action verb
pub fn has_objective(prompt: &str) -> bool {
    OBJECTIVE_LABELS.iter().any(|label| text::has_section(prompt, label))
        || leading_action_verb(prompt).is_some()
}

/// Tech stack terms mentioned in the prompt, in catalogue order
pub fn tech_stack(prompt: &str) -> Vec<&'static str> {
    let lower = prompt.to_lowercase();
    text::matching(&lower, TECH_STACK_TERMS)
}

pub fn has_tech_stack(prompt: &str) -> bool {
    !tech_stack(prompt).is_empty()
}

pub fn has_output_format(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    text::contains_any(&lower, OUTPUT_FORMAT_TERMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_detection() {
        assert_eq!(leading_action_verb("Create a login page"), Some("create"));
        assert_eq!(leading_action_verb("The page. Build it."), Some("build"));
        assert_eq!(leading_action_verb("Creative ideas only"), None);
        assert!(has_objective("Goal: faster builds"));
        assert!(!has_objective("login page"));
    }

    #[test]
    fn test_tech_stack_detection() {
        assert_eq!(tech_stack("A React app on Postgres"), vec!["react", "postgres"]);
        assert!(!has_tech_stack("a page for logging in"));
    }

    #[test]
    fn test_output_format_detection() {
        assert!(has_output_format("Return the result as JSON"));
        assert!(!has_output_format("Create a login page"));
    }
}
