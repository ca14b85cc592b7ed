use crate::{error::ConfigError, token_def::SymbolEntry};

/// Symbols sharing a first character, in table order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolGroup {
    pub first: char,
    /// `(spelling, token_name)` pairs
    pub entries: Vec<(String, String)>,
}

impl SymbolGroup {
    /// The one-character symbol returned when nothing extends the match.
    pub fn default_entry(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(spelling, _)| spelling.chars().count() == 1)
            .map(|(_, name)| name.as_str())
    }

    /// Two-character entries as `(second character, token_name)`.
    pub fn extensions(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.entries.iter().filter_map(|(spelling, name)| {
            let mut chars = spelling.chars().skip(1);
            chars.next().map(|second| (second, name.as_str()))
        })
    }

    /// True when the symbol can be returned without looking at another character.
    pub fn is_direct(&self) -> bool {
        self.entries.len() == 1 && self.default_entry().is_some()
    }
}

/// First character -> group index over the symbol table.
///
/// Groups are kept in order of first appearance; lookups are linear, symbol
/// tables being a couple dozen entries at most.
#[derive(Clone, Debug, Default)]
pub struct SymbolGroups {
    groups: Vec<SymbolGroup>,
}

impl SymbolGroups {
    pub fn build(symbols: &[SymbolEntry]) -> Result<SymbolGroups, ConfigError> {
        let mut groups: Vec<SymbolGroup> = Vec::new();

        for symbol in symbols {
            let first = symbol
                .spelling
                .chars()
                .next()
                .ok_or_else(|| ConfigError::EmptySpelling(symbol.token_name.clone()))?;
            if symbol.spelling.chars().count() > 2 {
                return Err(ConfigError::SymbolTooLong {
                    token: symbol.token_name.clone(),
                    spelling: symbol.spelling.clone(),
                });
            }

            let idx = match groups.iter().position(|g| g.first == first) {
                Some(idx) => idx,
                None => {
                    groups.push(SymbolGroup {
                        first,
                        entries: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];

            // one default per group, one entry per second character
            if let Some((_, existing)) = group
                .entries
                .iter()
                .find(|(spelling, _)| *spelling == symbol.spelling)
            {
                return Err(ConfigError::DuplicateSpelling {
                    spelling: symbol.spelling.clone(),
                    first: existing.clone(),
                    second: symbol.token_name.clone(),
                });
            }

            group
                .entries
                .push((symbol.spelling.clone(), symbol.token_name.clone()));
        }

        Ok(SymbolGroups { groups })
    }

    pub fn get(&self, first: char) -> Option<&SymbolGroup> {
        self.groups.iter().find(|g| g.first == first)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a SymbolGroups {
    type Item = &'a SymbolGroup;
    type IntoIter = std::slice::Iter<'a, SymbolGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_def::TokenEntry;

    fn symbols(pairs: &[(&str, &str)]) -> Vec<SymbolEntry> {
        pairs
            .iter()
            .map(|(name, spelling)| TokenEntry::new(*name, *spelling))
            .collect()
    }

    #[test]
    fn groups_by_first_character_in_order() {
        let table = symbols(&[
            ("t_period", "."),
            ("t_colon", ":"),
            ("t_lparen", "("),
            ("t_assign", ":="),
            ("t_range", ".."),
        ]);
        let groups = SymbolGroups::build(&table).expect("valid symbols");

        let firsts: Vec<char> = groups.iter().map(|g| g.first).collect();
        assert_eq!(firsts, vec!['.', ':', '(']);

        let colon = groups.get(':').expect("colon group");
        assert_eq!(
            colon.entries,
            vec![
                (":".to_string(), "t_colon".to_string()),
                (":=".to_string(), "t_assign".to_string()),
            ]
        );
        assert_eq!(colon.default_entry(), Some("t_colon"));
        assert_eq!(colon.extensions().collect::<Vec<_>>(), vec![('=', "t_assign")]);
        assert!(!colon.is_direct());

        assert!(groups.get('(').expect("paren group").is_direct());
    }

    #[test]
    fn every_symbol_lands_in_exactly_one_group() {
        let table = symbols(&[
            ("t_lt", "<"),
            ("t_lte", "<="),
            ("t_shl", "<<"),
            ("t_neq", "!="),
            ("t_eq", "="),
        ]);
        let groups = SymbolGroups::build(&table).expect("valid symbols");

        for symbol in &table {
            let containing: Vec<_> = groups
                .iter()
                .filter(|g| g.entries.iter().any(|(_, name)| *name == symbol.token_name))
                .collect();
            assert_eq!(containing.len(), 1);
            assert_eq!(symbol.spelling.chars().next(), Some(containing[0].first));
        }
    }

    #[test]
    fn group_without_default() {
        let groups = SymbolGroups::build(&symbols(&[("t_neq", "!=")])).expect("valid symbols");
        let bang = groups.get('!').expect("bang group");
        assert_eq!(bang.default_entry(), None);
        assert!(!bang.is_direct());
    }

    #[test]
    fn rejects_invalid_groups() {
        assert!(matches!(
            SymbolGroups::build(&symbols(&[("t_ellipsis", "...")])),
            Err(ConfigError::SymbolTooLong { .. })
        ));
        assert!(matches!(
            SymbolGroups::build(&symbols(&[("t_assign", ":="), ("t_define", ":=")])),
            Err(ConfigError::DuplicateSpelling { .. })
        ));
        assert!(matches!(
            SymbolGroups::build(&symbols(&[("t_dot", "")])),
            Err(ConfigError::EmptySpelling(_))
        ));
    }
}
