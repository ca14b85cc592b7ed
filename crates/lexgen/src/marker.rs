use std::fmt;

/// Placeholder lines recognised in templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    KeywordEnum,
    SymbolEnum,
    KeywordCheck,
    KeywordDebug,
    SymbolDebug,
    SymbolCheck,
    SymbolReturn,
}

impl Marker {
    pub const ALL: [Marker; 7] = [
        Marker::KeywordEnum,
        Marker::SymbolEnum,
        Marker::KeywordCheck,
        Marker::KeywordDebug,
        Marker::SymbolDebug,
        Marker::SymbolCheck,
        Marker::SymbolReturn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::KeywordEnum => "///LEX_KEYWORDS",
            Marker::SymbolEnum => "///LEX_SYMBOLS",
            Marker::KeywordCheck => "///LEX_KEYWORD_CHECK",
            Marker::KeywordDebug => "///LEX_KEYWORD_DEBUG",
            Marker::SymbolDebug => "///LEX_SYMBOL_DEBUG",
            Marker::SymbolCheck => "///LEX_SYMBOL_CHECK",
            Marker::SymbolReturn => "///LEX_SYMBOL_RETURN",
        }
    }

    /// Matches a whole template line. Surrounding whitespace (line ending
    /// included) is ignored, anything else on the line disables the marker.
    pub fn from_line(line: &str) -> Option<Marker> {
        let trimmed = line.trim();
        Marker::ALL.into_iter().find(|m| m.as_str() == trimmed)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
