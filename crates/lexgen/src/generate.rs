use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::GenError,
    expander::{Expander, GenOptions},
    symbol_groups::SymbolGroups,
    token_def::{parse_token_def, TokenEntry, TokenTables},
};

pub const HEADER_TEMPLATE: &str = "lex.hpp";
pub const SOURCE_TEMPLATE: &str = "lex.cpp";
pub const TEMPLATES: [&str; 2] = [HEADER_TEMPLATE, SOURCE_TEMPLATE];

pub const KEYWORDS_DEF: &str = "keywords.def";
pub const SYMBOLS_DEF: &str = "symbols.def";

/// Everything one generator run needs.
#[derive(Clone, Debug)]
pub struct GenRequest {
    pub template_dir: PathBuf,
    pub out_dir: PathBuf,
    pub tables: TokenTables,
    pub options: GenOptions,
}

#[derive(Debug)]
pub struct GenReport {
    /// `(output path, markers expanded)` per template
    pub outputs: Vec<(PathBuf, usize)>,
}

/// Reads `keywords.def` and `symbols.def` from `config_dir`.
pub fn load_tables(config_dir: &Path) -> Result<TokenTables, GenError> {
    let keywords = load_def(&config_dir.join(KEYWORDS_DEF))?;
    let symbols = load_def(&config_dir.join(SYMBOLS_DEF))?;
    info!(
        "loaded {} keywords and {} symbols from {}",
        keywords.len(),
        symbols.len(),
        config_dir.display()
    );

    Ok(TokenTables::new(keywords, symbols))
}

fn load_def(path: &Path) -> Result<Vec<TokenEntry>, GenError> {
    let def_string = fs::read_to_string(path).map_err(GenError::io(path))?;
    parse_token_def(&def_string).map_err(|source| GenError::Def {
        path: path.to_path_buf(),
        source,
    })
}

/// Validates the tables, then expands both templates into `out_dir`.
///
/// Nothing is written if the tables are invalid. Outputs are only moved into
/// place once every template has expanded, so a failed run leaves the
/// previous pair untouched and no temporary files behind.
pub fn generate(request: &GenRequest) -> Result<GenReport, GenError> {
    request.tables.validate()?;
    let groups = SymbolGroups::build(&request.tables.symbols)?;
    fs::create_dir_all(&request.out_dir).map_err(GenError::io(&request.out_dir))?;
    check_dirs(&request.template_dir, &request.out_dir)?;

    // open every template before writing anything
    let templates = TEMPLATES
        .into_iter()
        .map(|name| {
            let path = request.template_dir.join(name);
            File::open(&path)
                .map(|file| (name, file))
                .map_err(GenError::io(&path))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expander = Expander::new(&request.tables, &groups, &request.options);

    // both outputs are committed together or not at all
    let mut pending = Vec::new();
    for (name, template) in templates {
        let out_path = request.out_dir.join(name);
        let (output, expanded) = expand_file(&expander, template, &out_path)?;
        pending.push((output, expanded));
    }
    for (output, _) in pending.iter_mut() {
        output.finish()?;
    }

    let mut outputs = Vec::new();
    for (output, expanded) in pending {
        let out_path = output.commit()?;
        info!(
            "wrote {} ({} markers expanded)",
            out_path.display(),
            expanded
        );
        outputs.push((out_path, expanded));
    }

    Ok(GenReport { outputs })
}

fn check_dirs(template_dir: &Path, out_dir: &Path) -> Result<(), GenError> {
    let template_dir = template_dir
        .canonicalize()
        .map_err(GenError::io(template_dir))?;
    let out_dir = out_dir.canonicalize().map_err(GenError::io(out_dir))?;
    if template_dir == out_dir {
        return Err(GenError::OutputIsTemplateDir(out_dir));
    }
    Ok(())
}

fn expand_file(
    expander: &Expander,
    template: File,
    out_path: &Path,
) -> Result<(PartialOutput, usize), GenError> {
    let output = PartialOutput::create(out_path)?;
    let mut writer = BufWriter::new(&output.file);
    let expanded = expander
        .expand(BufReader::new(template), &mut writer)
        .map_err(GenError::io(&output.tmp_path))?;
    drop(writer);

    Ok((output, expanded))
}

/// Output written to a temporary sibling and renamed into place on commit.
/// Dropping it uncommitted deletes the temporary file.
struct PartialOutput {
    file: File,
    tmp_path: PathBuf,
    final_path: PathBuf,
    committed: bool,
}

impl PartialOutput {
    fn create(final_path: &Path) -> Result<PartialOutput, GenError> {
        let mut tmp_name = final_path
            .file_name()
            .map(|x| x.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = final_path.with_file_name(tmp_name);
        let file = File::create(&tmp_path).map_err(GenError::io(&tmp_path))?;

        Ok(PartialOutput {
            file,
            tmp_path,
            final_path: final_path.to_path_buf(),
            committed: false,
        })
    }

    fn finish(&mut self) -> Result<(), GenError> {
        self.file.flush().map_err(GenError::io(&self.tmp_path))?;
        self.file.sync_all().map_err(GenError::io(&self.tmp_path))
    }

    fn commit(mut self) -> Result<PathBuf, GenError> {
        fs::rename(&self.tmp_path, &self.final_path).map_err(GenError::io(&self.final_path))?;
        self.committed = true;
        Ok(self.final_path.clone())
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}
