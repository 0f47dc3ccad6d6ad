use std::collections::BTreeMap;

pub const WILDCARD: &str = "*";
const PARAM_PREFIX: char = ':';
const LITERAL_SCORE: u32 = 10;
const PARAM_SCORE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub pattern: String,
    pub path_params: BTreeMap<String, String>,
    pub score: u32,
}

fn segments(value: &str) -> Vec<&str> {
    value.split('/').filter(|segment| !segment.is_empty()).collect()
}

pub fn normalize(pattern: &str) -> &str {
    pattern.trim_start_matches('/')
}

/// Route patterns are `/` separated segments where `:name` captures one
/// segment and a trailing `*` captures the rest of the path.
pub trait RoutePattern {
    fn match_path(&self, path: &str) -> Option<RouteMatch>;

    fn is_match(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }

    fn has_path_params(&self) -> bool;

    fn has_wildcard(&self) -> bool;

    fn param_names(&self) -> Vec<&str>;
}

impl RoutePattern for str {
    fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path_segments = segments(path);
        let mut pattern_segments = segments(self);
        let wildcard = pattern_segments.last() == Some(&WILDCARD);
        if wildcard {
            pattern_segments.pop();
            if path_segments.len() < pattern_segments.len() {
                return None;
            }
        } else if path_segments.len() != pattern_segments.len() {
            return None;
        }

        let mut path_params = BTreeMap::new();
        let mut score = 0;
        for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
            if let Some(name) = expected.strip_prefix(PARAM_PREFIX) {
                path_params.insert(name.to_string(), actual.to_string());
                score += PARAM_SCORE;
            } else if expected == actual {
                score += LITERAL_SCORE;
            } else {
                return None;
            }
        }
        if wildcard {
            let rest = path_segments[pattern_segments.len()..].join("/");
            if !rest.is_empty() {
                path_params.insert(WILDCARD.to_string(), rest);
            }
        }

        Some(RouteMatch {
            pattern: self.to_string(),
            path_params,
            score,
        })
    }

    fn has_path_params(&self) -> bool {
        segments(self)
            .iter()
            .any(|segment| segment.starts_with(PARAM_PREFIX))
    }

    fn has_wildcard(&self) -> bool {
        segments(self).last() == Some(&WILDCARD)
    }

    fn param_names(&self) -> Vec<&str> {
        segments(self)
            .into_iter()
            .filter_map(|segment| segment.strip_prefix(PARAM_PREFIX))
            .collect()
    }
}

/// Highest scoring match, the earliest pattern wins a tie.
pub fn find_best_match<'a, I>(path: &str, patterns: I) -> Option<RouteMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    patterns
        .into_iter()
        .filter_map(|pattern| pattern.match_path(path))
        .fold(None, |best, candidate| match best {
            Some(best) if best.score >= candidate.score => Some(best),
            _ => Some(candidate),
        })
}
