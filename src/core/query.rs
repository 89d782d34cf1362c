/// Filter built from the optional listing query parameters.
///
/// Absence of every parameter yields the match-all filter. When both a text
/// search and a framework list are present they combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    /// Case-insensitive unanchored substring, matched against
    /// name OR framework OR dataset.
    pub search: Option<String>,
    /// Lowercased framework labels; a model matches when its framework
    /// equals any entry, compared case-insensitively.
    pub frameworks: Vec<String>,
}

impl ModelFilter {
    /// Build a filter from raw query-parameter values.
    pub fn from_params(search: Option<&str>, framework: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let frameworks = framework
            .map(parse_framework_list)
            .unwrap_or_default();

        Self { search, frameworks }
    }

    /// True when no parameter was supplied (match-all)
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.frameworks.is_empty()
    }

    /// The ILIKE pattern for the search term, wildcards escaped
    pub fn like_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(s)))
    }
}

/// Split a comma-separated framework parameter into normalized entries:
/// trimmed, empties dropped, lowercased for case-insensitive exact match.
pub fn parse_framework_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Escape LIKE/ILIKE metacharacters so a search term is matched literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_match_all() {
        let filter = ModelFilter::from_params(None, None);
        assert!(filter.is_empty());
        assert_eq!(filter.like_pattern(), None);
    }

    #[test]
    fn test_blank_params_match_all() {
        let filter = ModelFilter::from_params(Some("   "), Some(" , ,"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_framework_list_normalization() {
        let frameworks = parse_framework_list("TensorFlow, PyTorch ,,  JAX");
        assert_eq!(frameworks, vec!["tensorflow", "pytorch", "jax"]);
    }

    #[test]
    fn test_combined_filter() {
        let filter = ModelFilter::from_params(Some("bert"), Some("TensorFlow,PyTorch"));
        assert!(!filter.is_empty());
        assert_eq!(filter.like_pattern().unwrap(), "%bert%");
        assert_eq!(filter.frameworks, vec!["tensorflow", "pytorch"]);
    }

    #[test]
    fn test_like_escaping() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_like_pattern_is_unanchored() {
        let filter = ModelFilter::from_params(Some("res_net"), None);
        assert_eq!(filter.like_pattern().unwrap(), "%res\\_net%");
    }
}
