mod error;
mod expander;
mod generate;
mod marker;
mod symbol_groups;
pub mod token_def;


pub use error::{ConfigError, DefError, GenError};
pub use expander::{Expander, GenOptions};
pub use generate::{
    generate, load_tables, GenReport, GenRequest, HEADER_TEMPLATE, KEYWORDS_DEF, SOURCE_TEMPLATE,
    SYMBOLS_DEF,
};
pub use marker::Marker;
pub use symbol_groups::{SymbolGroup, SymbolGroups};
pub use token_def::{KeywordEntry, SymbolEntry, TokenEntry, TokenTables};
