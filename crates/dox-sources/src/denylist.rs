use glob::Pattern;

/// Glob patterns for files a directory scan must leave out
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    patterns: Vec<Pattern>,
}

impl Denylist {
    /// Create new denylist from pattern strings, dropping ones that don't compile
    pub fn new(patterns: Vec<String>) -> Self {
        let compiled: Vec<Pattern> = patterns
            .into_iter()
            .filter_map(|p| match Pattern::new(&p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self { patterns: compiled }
    }

    /// First pattern matching `path`, if any
    pub fn matching_pattern(&self, path: &str) -> Option<String> {
        self.patterns
            .iter()
            .find(|p| p.matches(path))
            .map(|p| p.as_str().to_string())
    }
}
