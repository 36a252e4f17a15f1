//! URL query-string codec.
//!
//! Encodes and decodes key/value state the same way the hosting web app
//! does, so URLs built on either side are interchangeable:
//!
//! - `true` is a bare key (`kiosk`), `false` is `kiosk=false`
//! - null is `key=`
//! - lists repeat the key once per item
//! - values are percent-encoded like `encodeURIComponent`, except that
//!   `@ : $ ,` stay literal and spaces are always `%20`
//!
//! Decoding is lenient: empty or undecodable segments are skipped. Because
//! `@ : $ ,` are not escaped and `+` decodes to a space, arbitrary strings
//! do not round-trip byte for byte.

use std::borrow::Cow;
use std::fmt;

/// A decoded query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Decode a single raw (still percent-encoded) value.
    fn decode(raw: &str) -> QueryValue {
        let text = decode_component(raw).unwrap_or_else(|| Cow::Owned(raw.replace('+', " ")));
        if text == "true" {
            return QueryValue::Bool(true);
        }
        if text == "false" {
            return QueryValue::Bool(false);
        }
        match parse_number(&text) {
            Some(n) => QueryValue::Number(n),
            None => QueryValue::String(text.into_owned()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => Ok(()),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Number(n) => f.write_str(&format_number(*n)),
            QueryValue::String(s) => f.write_str(s),
            QueryValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Number(n)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Number(n as f64)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Objects have no query form and are carried as their JSON text.
impl From<&serde_json::Value> for QueryValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => QueryValue::Null,
            serde_json::Value::Bool(b) => QueryValue::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(QueryValue::Null, QueryValue::Number),
            serde_json::Value::String(s) => QueryValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                QueryValue::List(items.iter().map(QueryValue::from).collect())
            }
            serde_json::Value::Object(_) => QueryValue::String(value.to_string()),
        }
    }
}

impl From<QueryValue> for serde_json::Value {
    fn from(value: QueryValue) -> Self {
        match value {
            QueryValue::Null => serde_json::Value::Null,
            QueryValue::Bool(b) => serde_json::Value::Bool(b),
            QueryValue::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            QueryValue::String(s) => serde_json::Value::String(s),
            QueryValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
        }
    }
}

/// Query parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`QueryParams::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Add a value for `key`. A repeated key turns into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, QueryValue::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, QueryValue::Null);
                *existing = QueryValue::List(vec![first, value]);
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_url_params(self))
    }
}

/// Percent-encode like `encodeURIComponent`, keeping `@ : $ , ;` literal.
pub fn encode_component(text: &str) -> String {
    const KEEP: [(&str, &str); 10] = [
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%2A", "*"),
        ("%40", "@"),
        ("%3A", ":"),
        ("%24", "$"),
        ("%2C", ","),
        ("%3B", ";"),
    ];

    let mut encoded = urlencoding::encode(text).into_owned();
    for (escaped, literal) in KEEP {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, literal);
        }
    }
    encoded
}

/// Format a number like JS `String(n)`: plain decimals for magnitudes in
/// `[1e-7, 1e21)`, exponent form (`1e+21`, `1.5e-7`) outside it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-7..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exponent_form = format!("{:e}", n);
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponent_form,
    }
}

/// Percent-decode, treating `+` as a space. `None` if not valid UTF-8.
pub fn decode_component(text: &str) -> Option<Cow<'_, str>> {
    if text.contains('+') {
        let spaced = text.replace('+', " ");
        return urlencoding::decode(&spaced)
            .ok()
            .map(|s| Cow::Owned(s.into_owned()));
    }
    urlencoding::decode(text).ok()
}

fn encode_pair(out: &mut Vec<String>, key: &str, value: &QueryValue) {
    match value {
        QueryValue::Bool(true) => out.push(key.to_string()),
        QueryValue::List(items) => {
            for item in items {
                encode_pair(out, key, item);
            }
        }
        other => out.push(format!("{}={}", key, encode_component(&other.to_string()))),
    }
}

/// Serialize params to a query string (without the leading `?`).
pub fn to_url_params(params: &QueryParams) -> String {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params.iter() {
        encode_pair(&mut pairs, &encode_component(key), value);
    }
    pairs.join("&")
}

/// Parse a query string (with or without the leading `?`).
pub fn parse_key_value(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for segment in query.split('&').filter(|s| !s.is_empty()) {
        let (raw_key, raw_value) = match segment.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (segment, None),
        };

        let key = match decode_component(raw_key) {
            Some(key) if !key.is_empty() => key.into_owned(),
            _ => {
                tracing::trace!("Skipping malformed query segment: {}", segment);
                continue;
            }
        };
        let value = raw_value.map_or(QueryValue::Bool(true), QueryValue::decode);
        params.append(key, value);
    }
    params
}

/// Parse a number the way a JS `Number(text)` would. Surrounding whitespace
/// is ignored; blank text is not a number.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix).ok().map(|n| n as f64);
    }

    let numeric_chars = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric_chars || !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_url_params_shapes() {
        let params = QueryParams::new()
            .with("server", "backend-01")
            .with("hasSpace", "has space")
            .with("many", vec!["1", "2", "3"])
            .with("true", true)
            .with("number", 20.0)
            .with("isNull", QueryValue::Null)
            .with("isUndefined", None::<String>);

        assert_eq!(
            to_url_params(&params),
            "server=backend-01&hasSpace=has%20space&many=1&many=2&many=3&true&number=20&isNull=&isUndefined="
        );
    }

    #[test]
    fn test_colon_and_at_unescaped() {
        let params = QueryParams::new().with("server", ":@");
        assert_eq!(to_url_params(&params), "server=:@");
    }

    #[test]
    fn test_false_keeps_value() {
        let params = QueryParams::new().with("kiosk", false);
        assert_eq!(to_url_params(&params), "kiosk=false");
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let params = QueryParams::new().with("q", "a&b=c/d?e#f");
        assert_eq!(to_url_params(&params), "q=a%26b%3Dc%2Fd%3Fe%23f");
    }

    #[test]
    fn test_parse_scalars_and_bare_keys() {
        let params = parse_key_value("param=value&param2=value2&kiosk");
        let expected = QueryParams::new()
            .with("param", "value")
            .with("param2", "value2")
            .with("kiosk", true);
        assert_eq!(params, expected);
    }

    #[test]
    fn test_parse_repeated_keys_into_list() {
        let params = parse_key_value("servers=A&servers=B");
        assert_eq!(
            params.get("servers"),
            Some(&QueryValue::List(vec!["A".into(), "B".into()]))
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_parse_numbers() {
        let params = parse_key_value("num1=12&num2=12.2");
        assert_eq!(params.get("num1"), Some(&QueryValue::Number(12.0)));
        assert_eq!(params.get("num2"), Some(&QueryValue::Number(12.2)));
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("-4"), Some(-4.0));
        assert_eq!(parse_number("0x1F"), Some(31.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12px"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("\t-1.5\n"), Some(-1.5));
        assert_eq!(parse_number("   "), None);
    }

    #[test]
    fn test_format_number_like_js() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(12.2), "12.2");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "0.0000001");
        assert_eq!(format_number(1.5e-8), "1.5e-8");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_whitespace_padded_number_decodes() {
        let params = parse_key_value("a=%2042&b=%20");
        assert_eq!(params.get("a"), Some(&QueryValue::Number(42.0)));
        assert_eq!(params.get("b"), Some(&QueryValue::String(" ".to_string())));
    }

    #[test]
    fn test_parse_booleans_and_decoding() {
        let params = parse_key_value("?a=true&b=false&c=has%20space&d=plus+sign&e=");
        assert_eq!(params.get("a"), Some(&QueryValue::Bool(true)));
        assert_eq!(params.get("b"), Some(&QueryValue::Bool(false)));
        assert_eq!(params.get("c"), Some(&QueryValue::from("has space")));
        assert_eq!(params.get("d"), Some(&QueryValue::from("plus sign")));
        assert_eq!(params.get("e"), Some(&QueryValue::from("")));
    }

    #[test]
    fn test_parse_is_lenient() {
        let params = parse_key_value("&&a=1&=orphan&%FF=bad&b=%E0%A4");
        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("b"), Some(&QueryValue::from("%E0%A4")));
    }

    #[test]
    fn test_value_after_first_equals_kept() {
        let params = parse_key_value("expr=a%3Db=c");
        assert_eq!(params.get("expr"), Some(&QueryValue::from("a=b=c")));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = QueryParams::new().with("a", 1i64).with("b", 2i64);
        params.insert("a", 3i64);
        assert_eq!(to_url_params(&params), "a=3&b=2");
        assert_eq!(params.remove("a"), Some(QueryValue::Number(3.0)));
        assert_eq!(params.to_string(), "b=2");
    }

    #[test]
    fn test_to_json() {
        let params = parse_key_value("a=1&b=x&b=y&c");
        assert_eq!(
            params.to_json(),
            serde_json::json!({ "a": 1.0, "b": ["x", "y"], "c": true })
        );
    }
}
