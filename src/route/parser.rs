use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::pattern::RouteMatch;

const SCHEME_SEPARATOR: &str = "://";

/// Form encoding keeps these bytes as they are, spaces become `%20`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    MissingSchemeSeparator,
    EmptyScheme,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "url is empty"),
            Self::MissingSchemeSeparator => write!(f, "missing `{SCHEME_SEPARATOR}`"),
            Self::EmptyScheme => write!(f, "scheme is empty"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Structured form of a route URL `scheme://path?query`.
///
/// `path` never starts with `/` and `path_params` stay empty until a
/// pattern match fills them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoute {
    pub scheme: String,
    pub path: String,
    pub query_params: BTreeMap<String, String>,
    pub path_params: BTreeMap<String, String>,
}

impl ParsedRoute {
    pub fn parse(url: &str) -> Result<Self, ParseError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ParseError::Empty);
        }
        let scheme_end = url
            .find(SCHEME_SEPARATOR)
            .ok_or(ParseError::MissingSchemeSeparator)?;
        if scheme_end == 0 {
            return Err(ParseError::EmptyScheme);
        }
        let remainder = &url[scheme_end + SCHEME_SEPARATOR.len()..];
        let (path, query) = remainder.split_once('?').unwrap_or((remainder, ""));
        Ok(Self {
            scheme: url[..scheme_end].to_string(),
            path: path.trim_start_matches('/').to_string(),
            query_params: parse_query(query),
            path_params: BTreeMap::new(),
        })
    }

    pub fn parse_or_none(url: &str) -> Option<Self> {
        Self::parse(url).ok()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }

    pub fn fill_path_params(&mut self, matched: &RouteMatch) {
        self.path_params.extend(
            matched
                .path_params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    /// Query parameters overlaid with path parameters.
    pub fn all_params(&self) -> BTreeMap<String, String> {
        let mut params = self.query_params.clone();
        params.extend(
            self.path_params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params
    }

    pub fn to_url(&self) -> String {
        build_url(&self.scheme, &self.path, &self.query_params)
    }
}

impl FromStr for ParsedRoute {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        match pair.split_once('=') {
            Some(("", _)) => continue,
            Some((key, value)) => {
                params.insert(decode_component(key), decode_component(value));
            }
            None => {
                params.insert(decode_component(pair), String::new());
            }
        }
    }
    params
}

/// Decodes a form encoded component, returning the raw text when it is not valid.
pub fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    let decoded = percent_decode_str(&value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned());
    decoded.unwrap_or(value)
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

pub fn build_url<I, K, V>(scheme: &str, path: &str, query: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = format!(
        "{scheme}{SCHEME_SEPARATOR}{}",
        path.trim_start_matches('/')
    );
    let query = query
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key.as_ref()),
                encode_component(value.as_ref())
            )
        })
        .collect::<Vec<_>>();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}
