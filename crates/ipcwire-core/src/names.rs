//! Textual grammars for object paths, interface, member, error and bus names.
//!
//! Checkers are pure predicates over the decoded text. Every name is bounded
//! by [`MAX_NAME_LEN`] bytes.

use std::fmt;

pub const MAX_NAME_LEN: usize = 255;

/// The five name grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    ObjectPath,
    Interface,
    Member,
    Error,
    Bus,
}

impl NameKind {
    /// # Examples
    /// ```
    /// use ipcwire_core::NameKind;
    ///
    /// assert!(NameKind::Interface.is_valid("org.example.Echo"));
    /// assert!(!NameKind::Member.is_valid("1st"));
    /// ```
    pub fn is_valid(self, name: &str) -> bool {
        match self {
            NameKind::ObjectPath => is_valid_object_path(name),
            NameKind::Interface => is_valid_interface(name),
            NameKind::Member => is_valid_member(name),
            NameKind::Error => is_valid_error_name(name),
            NameKind::Bus => is_valid_bus_name(name),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NameKind::ObjectPath => "object path",
            NameKind::Interface => "interface name",
            NameKind::Member => "member name",
            NameKind::Error => "error name",
            NameKind::Bus => "bus name",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `/` alone, or `/`-separated non-empty elements of `[A-Za-z0-9_]`.
pub fn is_valid_object_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    if bytes.len() > MAX_NAME_LEN || bytes.first() != Some(&b'/') {
        return false;
    }
    if bytes.len() == 1 {
        return true;
    }
    bytes[1..]
        .split(|&b| b == b'/')
        .all(|element| !element.is_empty() && element.iter().copied().all(is_element_char))
}

/// Two or more `.`-separated elements, none starting with a digit.
pub fn is_valid_interface(name: &str) -> bool {
    is_bounded(name) && is_dotted(name.as_bytes(), false, false)
}

/// Error names share the interface grammar.
pub fn is_valid_error_name(name: &str) -> bool {
    is_valid_interface(name)
}

/// A single element of `[A-Za-z0-9_]` not starting with a digit.
pub fn is_valid_member(name: &str) -> bool {
    is_bounded(name) && is_element(name.as_bytes(), false, false)
}

/// Unique (`:`-prefixed) or well-known bus name.
///
/// Elements may contain `-`; only unique names may have digit-leading
/// elements.
pub fn is_valid_bus_name(name: &str) -> bool {
    if !is_bounded(name) {
        return false;
    }
    match name.strip_prefix(':') {
        Some(unique) => is_dotted(unique.as_bytes(), true, true),
        None => is_dotted(name.as_bytes(), true, false),
    }
}

fn is_bounded(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LEN
}

fn is_element_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_element(element: &[u8], allow_dash: bool, allow_leading_digit: bool) -> bool {
    let Some(&first) = element.first() else {
        return false;
    };
    if !allow_leading_digit && first.is_ascii_digit() {
        return false;
    }
    element
        .iter()
        .all(|&b| is_element_char(b) || (allow_dash && b == b'-'))
}

fn is_dotted(name: &[u8], allow_dash: bool, allow_leading_digit: bool) -> bool {
    let mut elements = 0usize;
    for element in name.split(|&b| b == b'.') {
        if !is_element(element, allow_dash, allow_leading_digit) {
            return false;
        }
        elements += 1;
    }
    elements >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_paths() {
        assert!(is_valid_object_path("/"));
        assert!(is_valid_object_path("/org/example/Echo_1"));
        assert!(!is_valid_object_path(""));
        assert!(!is_valid_object_path("org"));
        assert!(!is_valid_object_path("/a//b"));
        assert!(!is_valid_object_path("/a/"));
        assert!(!is_valid_object_path("/a-b"));
        assert!(!is_valid_object_path("/a.b"));
    }

    #[test]
    fn interface_names() {
        assert!(is_valid_interface("a.B"));
        assert!(is_valid_interface("org.example.Echo"));
        assert!(is_valid_interface("_a._1"));
        assert!(!is_valid_interface("a"));
        assert!(!is_valid_interface("a..b"));
        assert!(!is_valid_interface(".a.b"));
        assert!(!is_valid_interface("a.b."));
        assert!(!is_valid_interface("a.1b"));
        assert!(!is_valid_interface("a.b-c"));
    }

    #[test]
    fn error_names_follow_interface_rules() {
        assert!(is_valid_error_name("org.example.Error.Failed"));
        assert!(!is_valid_error_name("Failed"));
    }

    #[test]
    fn member_names() {
        assert!(is_valid_member("Ping"));
        assert!(is_valid_member("_x9"));
        assert!(!is_valid_member(""));
        assert!(!is_valid_member("9x"));
        assert!(!is_valid_member("a.b"));
        assert!(!is_valid_member("a-b"));
    }

    #[test]
    fn bus_names() {
        assert!(is_valid_bus_name(":1.a"));
        assert!(is_valid_bus_name(":1.42"));
        assert!(is_valid_bus_name("org.example-app.Service"));
        assert!(!is_valid_bus_name("1.a"));
        assert!(!is_valid_bus_name(".a.b"));
        assert!(!is_valid_bus_name("single"));
        assert!(!is_valid_bus_name(":1"));
        assert!(!is_valid_bus_name(":"));
    }

    #[test]
    fn names_are_length_bounded() {
        let long = format!("a.{}", "b".repeat(MAX_NAME_LEN));
        assert!(!is_valid_interface(&long));
        let fits = format!("a.{}", "b".repeat(MAX_NAME_LEN - 2));
        assert!(is_valid_interface(&fits));
        let path = format!("/{}", "p".repeat(MAX_NAME_LEN));
        assert!(!is_valid_object_path(&path));
    }

    #[test]
    fn kind_dispatch() {
        assert!(NameKind::ObjectPath.is_valid("/"));
        assert!(NameKind::Bus.is_valid(":1.a"));
        assert_eq!(NameKind::Error.to_string(), "error name");
    }
}
