//! Identifier normalization.
//!
//! Schema names are separator-delimited (`logical_switch_port`, `ip-prefix`).
//! They are turned into exported PascalCase names that keep well-known
//! acronyms fully capitalized (`ip_port_mappings` -> `IPPortMappings`), and
//! into snake_case Rust identifiers for struct fields.

use std::{collections::BTreeMap, sync::LazyLock};

/// Built-in acronym table, keyed by the lower-cased token.
///
/// The value is the exact rendering used when a token matches, which is not
/// always fully upper-cased (`ids` -> `IDs`).
pub const ACRONYMS: &[(&str, &str)] = &[
    ("acl", "ACL"),
    ("arp", "ARP"),
    ("bfd", "BFD"),
    ("cpu", "CPU"),
    ("dhcp", "DHCP"),
    ("dns", "DNS"),
    ("ecmp", "ECMP"),
    ("http", "HTTP"),
    ("icmp", "ICMP"),
    ("id", "ID"),
    ("ids", "IDs"),
    ("ip", "IP"),
    ("ipsec", "IPSec"),
    ("ipv4", "IPv4"),
    ("ipv6", "IPv6"),
    ("mac", "MAC"),
    ("mtu", "MTU"),
    ("nat", "NAT"),
    ("qos", "QoS"),
    ("ssl", "SSL"),
    ("stp", "STP"),
    ("tcp", "TCP"),
    ("ttl", "TTL"),
    ("udp", "UDP"),
    ("uri", "URI"),
    ("url", "URL"),
    ("uuid", "UUID"),
    ("vlan", "VLAN"),
    ("vtep", "VTEP"),
];

/// Words that cannot be used as plain Rust identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

// Keywords that are not accepted as raw identifiers either.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Acronym lookup used by [`Normalizer`].
///
/// Lookups are case-insensitive. The default set is [`ACRONYMS`]; callers can
/// extend or replace it without touching the normalization rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acronyms {
    table: BTreeMap<String, String>,
}

impl Acronyms {
    /// Create an empty acronym set.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Register an acronym. Returns the previous rendering for the token, if any.
    pub fn insert(&mut self, token: &str, rendering: impl Into<String>) -> Option<String> {
        self.table.insert(token.to_lowercase(), rendering.into())
    }

    /// Get the rendering of a token, if it is a known acronym.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.table.get(&token.to_lowercase()).map(String::as_str)
    }

    /// Check if a token is a known acronym.
    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Iterate over `(token, rendering)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Acronyms {
    fn default() -> Self {
        ACRONYMS.iter().copied().collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Acronyms {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut acronyms = Self::empty();
        acronyms.extend(iter);
        acronyms
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Acronyms {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (token, rendering) in iter {
            self.insert(token.as_ref(), rendering);
        }
    }
}

/// Converts separator-delimited names into exported, acronym-aware identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    acronyms: Acronyms,
}

impl Normalizer {
    /// Create a normalizer using the given acronym set.
    pub fn new(acronyms: Acronyms) -> Self {
        Self { acronyms }
    }

    /// The acronym set used by this normalizer.
    pub fn acronyms(&self) -> &Acronyms {
        &self.acronyms
    }

    /// Normalize a name (e.g., "logical_ip" -> "LogicalIP").
    ///
    /// Empty tokens produced by leading, trailing or doubled separators are
    /// dropped.
    pub fn normalize(&self, name: &str) -> String {
        name.split(is_separator)
            .filter(|token| !token.is_empty())
            .map(|token| match self.acronyms.get(token) {
                Some(rendering) => rendering.to_string(),
                None => capitalize(token),
            })
            .collect()
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Normalize a name with the built-in acronym table.
pub fn camel_case(name: &str) -> String {
    DEFAULT_NORMALIZER.normalize(name)
}

/// Struct name for a table (e.g., "Foo_Bar" -> "FooBar").
pub fn struct_name(table: &str) -> String {
    type_ident(&camel_case(table))
}

/// Exported field name for a column (e.g., "external_ids" -> "ExternalIDs").
pub fn field_name(column: &str) -> String {
    camel_case(column)
}

/// Convert a name to snake_case (e.g., "LogicalSwitch" -> "logical_switch").
///
/// Separators collapse into a single underscore and an upper-case run is kept
/// together (`IPAddress` -> `ip_address`).
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for token in name.split(is_separator).filter(|token| !token.is_empty()) {
        if !out.is_empty() {
            out.push('_');
        }
        let chars: Vec<char> = token.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if !c.is_alphanumeric() {
                out.push('_');
                continue;
            }
            if c.is_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Check if a name is a Rust reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Rust field identifier for a column (e.g., "type" -> "r#type").
pub fn field_ident(column: &str) -> String {
    let mut ident = to_snake_case(column);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PATH_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
        ident
    } else if is_reserved(&ident) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Rust type identifier for a normalized name (e.g., "Self" -> "Self_", "9Lives" -> "_9Lives").
///
/// Normalized names are capitalized, so `Self` is the only keyword they can hit.
pub fn type_ident(name: &str) -> String {
    let mut ident = name.to_string();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PATH_KEYWORDS.contains(&ident.as_str()) || is_reserved(&ident) {
        ident.push('_');
    }
    ident
}

/// Name of the generated source file for a table (e.g., "Logical_Switch" -> "logical_switch.rs").
pub fn file_name(table: &str) -> String {
    format!("{}.rs", to_snake_case(table))
}
