use itertools::Itertools;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// Typed, path-addressed read access to a configuration snapshot.
///
/// Every accessor returns `None` when the path is unset; a value that does not
/// parse as the requested type is reported as unset as well.
pub trait ConfigurationReader {
    fn get_string(&self, path: &str) -> Option<String>;
    fn get_int(&self, path: &str) -> Option<i32>;
    fn get_long(&self, path: &str) -> Option<i64>;
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("Failed to read snapshot {path}, cause: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Syntax error in line {line}: {content}")]
    Syntax { line: usize, content: String },
}

/// Immutable in-memory snapshot of flat `path -> value` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let configuration = Self::parse(&text)?;
        debug!(
            "Loaded {} values from {}",
            configuration.len(),
            path.display()
        );
        Ok(configuration)
    }

    /// Parses properties text: `key=value` or `key: value` per line, `#` and
    /// `!` start comments.
    ///
    /// A line ending in an odd number of backslashes continues on the next
    /// line, whose leading whitespace is dropped. Errors report the first line
    /// of a continued entry.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        let mut lines = text.lines().enumerate();
        while let Some((number, line)) = lines.next() {
            let line_number = number + 1;
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let mut entry = trimmed.to_string();
            while is_continued(&entry) {
                entry.pop();
                match lines.next() {
                    Some((_, next)) => entry.push_str(next.trim_start()),
                    None => break,
                }
            }
            let syntax_error = || ConfigError::Syntax {
                line: line_number,
                content: entry.clone(),
            };
            let captures = line_regex().captures(&entry).ok_or_else(syntax_error)?;
            let key = unescape(&captures["key"]).ok_or_else(syntax_error)?;
            let value = unescape(&captures["value"]).ok_or_else(syntax_error)?;
            trace!("{} = {}", key, value);
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct path segments directly below `prefix`, in sorted order.
    pub fn child_names(&self, prefix: &str) -> Vec<&str> {
        let start = format!("{}/", prefix);
        self.values
            .range(start.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(start.as_str()))
            .filter_map(|key| key[start.len()..].split('/').next())
            .filter(|name| !name.is_empty())
            .unique()
            .collect_vec()
    }
}

impl FromStr for Configuration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl ConfigurationReader for Configuration {
    fn get_string(&self, path: &str) -> Option<String> {
        self.values.get(path).cloned()
    }

    fn get_int(&self, path: &str) -> Option<i32> {
        self.values.get(path)?.trim().parse().ok()
    }

    fn get_long(&self, path: &str) -> Option<i64> {
        self.values.get(path)?.trim().parse().ok()
    }
}

fn line_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^(?P<key>(?:[^\\=:\s]|\\.)+)\s*[=:]\s*(?P<value>.*)$").unwrap();
    }
    &RE
}

fn is_continued(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn hex_unit(chars: &mut std::str::Chars) -> Option<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}

fn unescape(input: &str) -> Option<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next()? {
            'n' => output.push('\n'),
            't' => output.push('\t'),
            'r' => output.push('\r'),
            'u' => {
                let unit = hex_unit(&mut chars)?;
                let decoded = if (0xD800..=0xDBFF).contains(&unit) {
                    // characters above the BMP are written as a surrogate pair
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = hex_unit(&mut chars)?;
                    char::decode_utf16([unit, low]).next()?.ok()?
                } else {
                    char::from_u32(u32::from(unit))?
                };
                output.push(decoded);
            }
            other => output.push(other),
        }
    }
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn absent_values_are_none() {
        let config = Configuration::new();
        assert_eq!(config.get_string("Sone/1/Profile/FirstName"), None);
        assert_eq!(config.get_int("Sone/1/Profile/BirthDay"), None);
        assert_eq!(config.get_long("Sone/1/Posts/0/Time"), None);
    }

    #[test]
    fn typed_accessors() {
        let config: Configuration = [
            ("Sone/1/Profile/BirthDay", "18"),
            ("Sone/1/Posts/0/Time", "1000"),
            ("Sone/1/Posts/0/Text", "T0"),
        ]
        .into_iter()
        .collect();
        assert_eq!(config.get_int("Sone/1/Profile/BirthDay"), Some(18));
        assert_eq!(config.get_long("Sone/1/Posts/0/Time"), Some(1000));
        assert_eq!(config.get_string("Sone/1/Posts/0/Text"), Some("T0".into()));
    }

    #[test]
    fn unparseable_numbers_are_none() {
        let config: Configuration = [
            ("Sone/1/Profile/BirthDay", "eighteen"),
            ("Sone/1/Posts/0/Time", ""),
            ("Sone/1/Images/0/Width", "99999999999"),
        ]
        .into_iter()
        .collect();
        assert_eq!(config.get_int("Sone/1/Profile/BirthDay"), None);
        assert_eq!(config.get_long("Sone/1/Posts/0/Time"), None);
        assert_eq!(config.get_int("Sone/1/Images/0/Width"), None);
        assert_eq!(config.get_long("Sone/1/Images/0/Width"), Some(99999999999));
    }

    #[test]
    fn parse_properties() {
        let config = Configuration::parse(
            "# comment\n\
             ! other comment\n\
             \n\
             Sone/1/Posts/0/ID=P0\n\
             Sone/1/Posts/0/Time = 1000\n\
             Sone/1/Posts/0/Text: Hello\\nWorld\n\
             Sone/1/Profile/Fields/0/Name=a\\=b\n\
             Sone/1/Profile/Fields/0/Value=\\u00e4\n\
             Sone/1/Profile/FirstName=\n",
        )
        .unwrap();
        assert_eq!(config.len(), 6);
        assert_eq!(config.get_string("Sone/1/Posts/0/ID"), Some("P0".into()));
        assert_eq!(config.get_long("Sone/1/Posts/0/Time"), Some(1000));
        assert_eq!(
            config.get_string("Sone/1/Posts/0/Text"),
            Some("Hello\nWorld".into())
        );
        assert_eq!(
            config.get_string("Sone/1/Profile/Fields/0/Name"),
            Some("a=b".into())
        );
        assert_eq!(
            config.get_string("Sone/1/Profile/Fields/0/Value"),
            Some("ä".into())
        );
        assert_eq!(config.get_string("Sone/1/Profile/FirstName"), Some("".into()));
    }

    #[test]
    fn parse_handles_crlf() {
        let config =
            Configuration::parse("Sone/1/Friends/0/ID=F1\r\nSone/1/Friends/1/ID=F2\r\n").unwrap();
        assert_eq!(config.get_string("Sone/1/Friends/0/ID"), Some("F1".into()));
        assert_eq!(config.get_string("Sone/1/Friends/1/ID"), Some("F2".into()));
    }

    #[test]
    fn line_without_separator_is_syntax_error() {
        let result = Configuration::parse("Sone/1/Posts/0/ID=P0\nnot a property\n");
        assert!(matches!(result, Err(ConfigError::Syntax { line: 2, .. })));
    }

    #[test]
    fn bad_unicode_escape_is_syntax_error() {
        let result = Configuration::parse("Sone/1/Posts/0/Text=\\u00\n");
        assert!(matches!(result, Err(ConfigError::Syntax { line: 1, .. })));
    }

    #[test]
    fn surrogate_pairs_are_joined() {
        let config = Configuration::parse("Sone/1/Posts/0/Text=Hi \\uD83D\\uDE00\n").unwrap();
        assert_eq!(
            config.get_string("Sone/1/Posts/0/Text"),
            Some("Hi \u{1F600}".into())
        );
    }

    #[test]
    fn unpaired_surrogates_are_syntax_errors() {
        for text in [
            "Sone/1/Posts/0/Text=\\uD83D\n",
            "Sone/1/Posts/0/Text=\\uD83Dx\n",
            "Sone/1/Posts/0/Text=\\uD83D\\u0041\n",
            "Sone/1/Posts/0/Text=\\uDE00\n",
        ] {
            let result = Configuration::parse(text);
            assert!(
                matches!(result, Err(ConfigError::Syntax { line: 1, .. })),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn continued_lines_are_joined() {
        let config = Configuration::parse(
            "Sone/1/Posts/0/Text=first \\\n    second\n\
             Sone/1/Posts/0/ID=P0\n\
             Sone/1/Posts/1/Text=ends in backslash\\\\\n\
             Sone/1/Posts/1/ID=P1\n",
        )
        .unwrap();
        assert_eq!(
            config.get_string("Sone/1/Posts/0/Text"),
            Some("first second".into())
        );
        assert_eq!(config.get_string("Sone/1/Posts/0/ID"), Some("P0".into()));
        assert_eq!(
            config.get_string("Sone/1/Posts/1/Text"),
            Some("ends in backslash\\".into())
        );
        assert_eq!(config.get_string("Sone/1/Posts/1/ID"), Some("P1".into()));
    }

    #[test]
    fn child_names_lists_identities() {
        let config: Configuration = [
            ("Sone/1/Posts/0/ID", "P0"),
            ("Sone/1/Profile/FirstName", "First"),
            ("Sone/10/Friends/0/ID", "F1"),
            ("Sone/2/Albums/0/ID", "A1"),
            ("Other/3/ID", "X"),
        ]
        .into_iter()
        .collect();
        assert_eq!(config.child_names("Sone"), vec!["1", "10", "2"]);
        assert_eq!(config.child_names("Sone/1"), vec!["Posts", "Profile"]);
        assert!(config.child_names("Nothing").is_empty());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Sone/1/Friends/0/ID=F1").unwrap();
        let config = Configuration::load(file.path()).unwrap();
        assert_eq!(config.get_string("Sone/1/Friends/0/ID"), Some("F1".into()));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Configuration::load(dir.path().join("missing.properties"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
