use std::collections::{HashMap, HashSet};

use convert_case::{Case, Casing};

use crate::error::{ConfigError, DefError};

/// One row of a token table: the enum member to generate and the literal text it matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenEntry {
    pub token_name: String,
    pub spelling: String,
}

pub type KeywordEntry = TokenEntry;
pub type SymbolEntry = TokenEntry;

impl TokenEntry {
    pub fn new(token_name: impl Into<String>, spelling: impl Into<String>) -> TokenEntry {
        TokenEntry {
            token_name: token_name.into(),
            spelling: spelling.into(),
        }
    }
}

/// The keyword and symbol tables for one generator run.
///
/// Both tables feed the same generated enumeration, so token names must be
/// unique across the two of them.
#[derive(Clone, Debug, Default)]
pub struct TokenTables {
    pub keywords: Vec<KeywordEntry>,
    pub symbols: Vec<SymbolEntry>,
}

impl TokenTables {
    pub fn new(keywords: Vec<KeywordEntry>, symbols: Vec<SymbolEntry>) -> TokenTables {
        TokenTables { keywords, symbols }
    }

    /// Builds tables from `(token_name, spelling)` pairs.
    pub fn from_pairs(keywords: &[(&str, &str)], symbols: &[(&str, &str)]) -> TokenTables {
        TokenTables::new(to_entries(keywords), to_entries(symbols))
    }

    /// Checks everything that would otherwise only surface once the generated
    /// lexer is compiled. Symbol grouping rules are checked by
    /// [`SymbolGroups::build`](crate::SymbolGroups::build).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for entry in self.keywords.iter().chain(self.symbols.iter()) {
            if !is_identifier(&entry.token_name) {
                return Err(ConfigError::InvalidTokenName(entry.token_name.clone()));
            }
            if !names.insert(entry.token_name.as_str()) {
                return Err(ConfigError::DuplicateTokenName(entry.token_name.clone()));
            }
            validate_spelling(entry)?;
        }

        check_unique_spellings(&self.keywords)?;
        check_unique_spellings(&self.symbols)?;

        Ok(())
    }
}

fn to_entries(pairs: &[(&str, &str)]) -> Vec<TokenEntry> {
    pairs
        .iter()
        .map(|(name, spelling)| TokenEntry::new(*name, *spelling))
        .collect()
}

fn validate_spelling(entry: &TokenEntry) -> Result<(), ConfigError> {
    if entry.spelling.is_empty() {
        return Err(ConfigError::EmptySpelling(entry.token_name.clone()));
    }
    if let Some(c) = entry.spelling.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(ConfigError::UnsupportedCharacter {
            token: entry.token_name.clone(),
            character: c,
        });
    }
    Ok(())
}

fn check_unique_spellings(entries: &[TokenEntry]) -> Result<(), ConfigError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        if let Some(first) = seen.insert(&entry.spelling, &entry.token_name) {
            return Err(ConfigError::DuplicateSpelling {
                spelling: entry.spelling.clone(),
                first: first.to_string(),
                second: entry.token_name.clone(),
            });
        }
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_word(spelling: &str) -> bool {
    spelling.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name given to a table row that only lists its spelling.
pub fn default_token_name(spelling: &str) -> String {
    format!("t_{}", spelling.to_case(Case::Snake))
}

/// Parses a `.def` table: one `name: spelling` pair per line.
///
/// A line without a colon is a bare keyword spelling and gets
/// [`default_token_name`]; punctuation has no name to derive and must be named.
/// Blank lines and lines starting with `#` are skipped. Only the first colon
/// separates, so `t_assign: :=` works as expected.
pub fn parse_token_def(def_string: &str) -> Result<Vec<TokenEntry>, DefError> {
    let mut entries = Vec::new();
    for (idx, line) in def_string.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, spelling) = match line.split_once(':') {
            Some((name, spelling)) => (name.trim().to_string(), spelling.trim()),
            None if is_word(line) => (default_token_name(line), line),
            None => {
                return Err(DefError::BareSymbol {
                    line: line_number,
                    spelling: line.to_string(),
                })
            }
        };

        if name.is_empty() {
            return Err(DefError::MissingName { line: line_number });
        }
        if spelling.is_empty() {
            return Err(DefError::MissingSpelling {
                line: line_number,
                name,
            });
        }

        entries.push(TokenEntry::new(name, spelling));
    }

    Ok(entries)
}
