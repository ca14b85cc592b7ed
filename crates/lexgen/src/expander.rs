use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::{marker::Marker, symbol_groups::SymbolGroups, token_def::TokenTables};

/// Names the generated fragments use to refer to the surrounding lexer.
#[derive(Clone, Debug)]
pub struct GenOptions {
    /// accumulated identifier text compared against keyword spellings
    pub buffer_var: String,
    /// variable the keyword check assigns to
    pub result_var: String,
    /// input stream with `get()` / `unget()`
    pub reader_var: String,
    /// returned when a group has no default and the lookahead matches nothing
    pub no_match_token: String,
    /// raw text buffer that also receives the second character of a two-character symbol
    pub capture_buffer: Option<String>,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            buffer_var: "buffer".to_string(),
            result_var: "t".to_string(),
            reader_var: "reader".to_string(),
            no_match_token: "t_none".to_string(),
            capture_buffer: None,
        }
    }
}

/// Replaces marker lines in a template with fragments generated from the token tables.
pub struct Expander<'a> {
    tables: &'a TokenTables,
    groups: &'a SymbolGroups,
    options: &'a GenOptions,
}

impl<'a> Expander<'a> {
    /// `tables` must have passed [`TokenTables::validate`] and `groups` must
    /// come from [`SymbolGroups::build`] over the same symbols. Spellings are
    /// emitted as C++ literals, which only holds for printable ASCII.
    pub fn new(
        tables: &'a TokenTables,
        groups: &'a SymbolGroups,
        options: &'a GenOptions,
    ) -> Expander<'a> {
        Expander {
            tables,
            groups,
            options,
        }
    }

    /// Copies `reader` to `writer` line by line, expanding markers.
    /// Returns how many marker lines were replaced.
    pub fn expand<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<usize> {
        let mut expanded = 0;
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            // non-UTF-8 lines can't be markers and are copied untouched
            let marker = std::str::from_utf8(&line).ok().and_then(Marker::from_line);
            match marker {
                Some(marker) => {
                    debug!("expanding {}", marker);
                    writer.write_all(self.render(marker, line_ending(&line)).as_bytes())?;
                    expanded += 1;
                }
                None => writer.write_all(&line)?,
            }
        }

        writer.flush()?;
        Ok(expanded)
    }

    pub fn expand_str(&self, template: &str) -> String {
        let mut out = Vec::new();
        self.expand(template.as_bytes(), &mut out)
            .expect("in-memory expansion cannot fail");
        String::from_utf8_lossy(&out).into_owned()
    }

    /// The block replacing one marker line, ending with `eol` like the line it replaces.
    fn render(&self, marker: Marker, eol: &str) -> String {
        let lines = self.generate(marker);
        let sep = if eol.is_empty() { "\n" } else { eol };
        let mut block = lines.join(sep);
        if !lines.is_empty() {
            block.push_str(eol);
        }
        block
    }

    pub fn generate(&self, marker: Marker) -> Vec<String> {
        match marker {
            Marker::KeywordEnum => self.keyword_enum(),
            Marker::SymbolEnum => self.symbol_enum(),
            Marker::KeywordCheck => self.keyword_check(),
            Marker::KeywordDebug => self.keyword_debug(),
            Marker::SymbolDebug => self.symbol_debug(),
            Marker::SymbolCheck => self.symbol_check(),
            Marker::SymbolReturn => self.symbol_return(),
        }
    }

    fn keyword_enum(&self) -> Vec<String> {
        self.tables
            .keywords
            .iter()
            .map(|x| format!("\t{},", x.token_name))
            .collect()
    }

    fn symbol_enum(&self) -> Vec<String> {
        self.tables
            .symbols
            .iter()
            .map(|x| format!("\t{},", x.token_name))
            .collect()
    }

    fn keyword_check(&self) -> Vec<String> {
        self.tables
            .keywords
            .iter()
            .enumerate()
            .map(|(idx, x)| {
                let clause = if idx == 0 { "if" } else { "else if" };
                format!(
                    "\t\t\t{} ({} == \"{}\") {} = {};",
                    clause,
                    self.options.buffer_var,
                    x.spelling.escape_default(),
                    self.options.result_var,
                    x.token_name
                )
            })
            .collect()
    }

    fn keyword_debug(&self) -> Vec<String> {
        self.tables.keywords.iter().map(|x| debug_case(&x.token_name, &x.spelling)).collect()
    }

    fn symbol_debug(&self) -> Vec<String> {
        self.tables.symbols.iter().map(|x| debug_case(&x.token_name, &x.spelling)).collect()
    }

    fn symbol_check(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| format!("\t\tcase '{}': return true;", g.first.escape_default()))
            .collect()
    }

    fn symbol_return(&self) -> Vec<String> {
        let reader = &self.options.reader_var;
        let mut lines = Vec::new();

        for group in self.groups {
            let first = group.first.escape_default();

            if group.is_direct() {
                if let Some(name) = group.default_entry() {
                    lines.push(format!("\t\tcase '{}': return {};", first, name));
                }
                continue;
            }

            lines.push(format!("\t\tcase '{}': {{", first));
            lines.push(format!("\t\t\tchar c2 = {}.get();", reader));

            for (idx, (second, name)) in group.extensions().enumerate() {
                let condition = format!("if (c2 == '{}') {{", second.escape_default());
                if idx == 0 {
                    lines.push(format!("\t\t\t{}", condition));
                } else {
                    lines.push(format!("\t\t\t}} else {}", condition));
                }
                if let Some(capture) = &self.options.capture_buffer {
                    lines.push(format!("\t\t\t\t{} += c2;", capture));
                }
                lines.push(format!("\t\t\t\treturn {};", name));
            }

            let fallback = match group.default_entry() {
                Some(name) => name,
                None => {
                    warn!(
                        "symbols starting with {:?} have no one-character default, unmatched input returns {}",
                        group.first, self.options.no_match_token
                    );
                    self.options.no_match_token.as_str()
                }
            };
            lines.push("\t\t\t} else {".to_string());
            lines.push(format!("\t\t\t\t{}.unget();", reader));
            lines.push(format!("\t\t\t\treturn {};", fallback));
            lines.push("\t\t\t}".to_string());
            lines.push("\t\t} break;".to_string());
        }

        lines
    }
}

fn debug_case(token_name: &str, spelling: &str) -> String {
    format!(
        "\t\tcase {}: std::cout << \"{}\" << std::endl; break;",
        token_name,
        spelling.escape_default()
    )
}

fn line_ending(line: &[u8]) -> &'static str {
    if line.ends_with(b"\r\n") {
        "\r\n"
    } else if line.ends_with(b"\n") {
        "\n"
    } else {
        ""
    }
}
