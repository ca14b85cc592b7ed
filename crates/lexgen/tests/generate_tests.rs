use std::{
    fs,
    path::{Path, PathBuf},
};

use lexgen::{
    generate, load_tables, ConfigError, GenError, GenOptions, GenRequest, TokenTables,
    HEADER_TEMPLATE, SOURCE_TEMPLATE,
};
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("crate lives in <workspace>/crates")
        .join("data")
}

fn request(tables: TokenTables, out_dir: &Path) -> GenRequest {
    GenRequest {
        template_dir: data_dir().join("templates"),
        out_dir: out_dir.to_path_buf(),
        tables,
        options: GenOptions::default(),
    }
}

fn sample_tables() -> TokenTables {
    TokenTables::from_pairs(
        &[("t_module", "module"), ("t_return", "return")],
        &[("t_period", "."), ("t_colon", ":"), ("t_assign", ":=")],
    )
}

#[test]
fn test_end_to_end() {
    let out = TempDir::new().expect("tempdir");
    let report = generate(&request(sample_tables(), out.path())).expect("generation succeeds");

    let counts: Vec<usize> = report.outputs.iter().map(|(_, n)| *n).collect();
    assert_eq!(counts, vec![2, 5]);

    let header = fs::read_to_string(out.path().join(HEADER_TEMPLATE)).expect("header written");
    assert!(header.contains(
        "    t_none,\n\n\tt_module,\n\tt_return,\n\n\tt_period,\n\tt_colon,\n\tt_assign,\n\n    t_id,\n"
    ));
    assert!(!header.contains("///LEX_"));

    let source = fs::read_to_string(out.path().join(SOURCE_TEMPLATE)).expect("source written");
    assert!(source.contains(
        "\t\t\tif (buffer == \"module\") t = t_module;\n\t\t\telse if (buffer == \"return\") t = t_return;\n            else if (is_integer()) {"
    ));
    assert!(source.contains("\t\tcase '.': return t_period;\n\t\tcase ':': {\n"));
    assert!(source.contains(
        "\t\t\tif (c2 == '=') {\n\t\t\t\treturn t_assign;\n\t\t\t} else {\n\t\t\t\treader.unget();\n\t\t\t\treturn t_colon;\n"
    ));
    assert!(!source.contains("///LEX_"));

    // nothing left over from the temporary outputs
    let mut names: Vec<_> = fs::read_dir(out.path())
        .expect("read out dir")
        .map(|x| x.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![SOURCE_TEMPLATE, HEADER_TEMPLATE]);
}

#[test]
fn test_bundled_tables() {
    let tables = load_tables(&data_dir().join("tables")).expect("bundled tables load");
    assert_eq!(tables.keywords.len(), 12);
    assert_eq!(tables.keywords[10].token_name, "t_void");
    assert_eq!(tables.symbols.len(), 7);

    let out = TempDir::new().expect("tempdir");
    generate(&request(tables, out.path())).expect("generation succeeds");
    let source = fs::read_to_string(out.path().join(SOURCE_TEMPLATE)).expect("source written");
    assert!(source.contains("\t\t\telse if (buffer == \"int\") t = t_int;\n"));
    assert!(source.contains("\t\tcase '@': return true;\n"));
}

#[test]
fn test_idempotent() {
    let first = TempDir::new().expect("tempdir");
    let second = TempDir::new().expect("tempdir");
    generate(&request(sample_tables(), first.path())).expect("first run");
    generate(&request(sample_tables(), second.path())).expect("second run");
    generate(&request(sample_tables(), second.path())).expect("rerun over existing output");

    for name in [HEADER_TEMPLATE, SOURCE_TEMPLATE] {
        let a = fs::read(first.path().join(name)).expect("first output");
        let b = fs::read(second.path().join(name)).expect("second output");
        assert_eq!(a, b);
    }
}

#[test]
fn test_invalid_tables_write_nothing() {
    let out = TempDir::new().expect("tempdir");
    let tables = TokenTables::from_pairs(&[], &[("t_colon", ":"), ("t_also_colon", ":")]);
    let err = generate(&request(tables, out.path())).expect_err("duplicate spelling");
    assert!(matches!(
        err,
        GenError::Config(ConfigError::DuplicateSpelling { .. })
    ));
    assert_eq!(fs::read_dir(out.path()).expect("read out dir").count(), 0);
}

#[test]
fn test_missing_template() {
    let templates = TempDir::new().expect("tempdir");
    fs::write(templates.path().join(HEADER_TEMPLATE), "///LEX_KEYWORDS\n").expect("write header");
    let out = TempDir::new().expect("tempdir");

    let mut req = request(sample_tables(), out.path());
    req.template_dir = templates.path().to_path_buf();
    let err = generate(&req).expect_err("source template is missing");
    match err {
        GenError::Io { path, .. } => assert!(path.ends_with(SOURCE_TEMPLATE)),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(fs::read_dir(out.path()).expect("read out dir").count(), 0);
}

#[test]
fn test_refuses_to_overwrite_templates() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(HEADER_TEMPLATE), "///LEX_KEYWORDS\n").expect("write header");
    fs::write(dir.path().join(SOURCE_TEMPLATE), "///LEX_SYMBOLS\n").expect("write source");

    let mut req = request(sample_tables(), dir.path());
    req.template_dir = dir.path().to_path_buf();
    assert!(matches!(
        generate(&req),
        Err(GenError::OutputIsTemplateDir(_))
    ));
    let header = fs::read_to_string(dir.path().join(HEADER_TEMPLATE)).expect("header intact");
    assert_eq!(header, "///LEX_KEYWORDS\n");
}

#[test]
fn test_load_tables_reports_bad_line() {
    let config = TempDir::new().expect("tempdir");
    fs::write(config.path().join("keywords.def"), "t_if: if\nt_else:\n").expect("write keywords");
    fs::write(config.path().join("symbols.def"), "t_dot: .\n").expect("write symbols");

    match load_tables(config.path()) {
        Err(GenError::Def { path, source }) => {
            assert!(path.ends_with("keywords.def"));
            assert_eq!(source.to_string(), "line 2: token `t_else` has no spelling");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_failed_output_keeps_previous_pair() {
    let out = TempDir::new().expect("tempdir");
    fs::write(out.path().join(HEADER_TEMPLATE), "OLD HEADER").expect("write old header");
    fs::write(out.path().join(SOURCE_TEMPLATE), "OLD SOURCE").expect("write old source");
    // the header expands into its temporary file, then the source can't be created
    fs::create_dir(out.path().join(format!("{}.tmp", SOURCE_TEMPLATE))).expect("block source");

    let err = generate(&request(sample_tables(), out.path())).expect_err("source output blocked");
    match err {
        GenError::Io { path, .. } => {
            assert!(path.ends_with(format!("{}.tmp", SOURCE_TEMPLATE)))
        }
        other => panic!("unexpected error {:?}", other),
    }

    let header = fs::read_to_string(out.path().join(HEADER_TEMPLATE)).expect("header kept");
    let source = fs::read_to_string(out.path().join(SOURCE_TEMPLATE)).expect("source kept");
    assert_eq!(header, "OLD HEADER");
    assert_eq!(source, "OLD SOURCE");
    assert!(!out.path().join(format!("{}.tmp", HEADER_TEMPLATE)).exists());
}
