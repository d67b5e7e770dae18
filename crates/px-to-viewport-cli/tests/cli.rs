use std::fs;
use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use px_to_viewport_cli::{load_options, run, Args, Summary};

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, contents).unwrap();
  path
}

#[test]
fn parses_arguments() {
  let args = Args::parse_from(["px2vw", "--config", "px2vw.json", "-o", "dist", "a.css", "b.css"]);

  assert_eq!(args.config, Some(PathBuf::from("px2vw.json")));
  assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
  assert_eq!(args.files, vec![PathBuf::from("a.css"), PathBuf::from("b.css")]);
}

#[test]
fn requires_at_least_one_file() {
  assert!(Args::try_parse_from(["px2vw"]).is_err());
}

#[test]
fn writes_to_stdout_without_out_dir() {
  let dir = tempfile::tempdir().unwrap();
  let a = write(&dir, "a.css", ".a { width: 32px }");
  let b = write(&dir, "b.css", ".b { height: 16px }\n");
  let args = Args {
    config: None,
    out_dir: None,
    files: vec![a, b],
  };
  let mut stdout = Vec::new();

  let summary = run(&args, &mut stdout).unwrap();

  assert_eq!(
    String::from_utf8(stdout).unwrap(),
    ".a { width: 10vw }\n.b { height: 5vw }\n"
  );
  assert_eq!(
    summary,
    Summary {
      files: 2,
      warnings: 0
    }
  );
}

#[test]
fn writes_into_out_dir_with_config() {
  let dir = tempfile::tempdir().unwrap();
  let config = write(
    &dir,
    "px2vw.json",
    r#"{ "viewportWidth": 750, "landscape": true, "landscapeWidth": 1000 }"#,
  );
  let input = write(&dir, "main.css", ".rule { font-size: 30px }");
  let out_dir = dir.path().join("dist");
  let args = Args {
    config: Some(config),
    out_dir: Some(out_dir.clone()),
    files: vec![input],
  };
  let mut stdout = Vec::new();

  run(&args, &mut stdout).unwrap();

  assert!(stdout.is_empty());
  assert_eq!(
    fs::read_to_string(out_dir.join("main.css")).unwrap(),
    ".rule { font-size: 4vw }@media (orientation: landscape) {.rule { font-size: 3vw } }"
  );
}

#[test]
fn exclude_patterns_see_the_file_path() {
  let dir = tempfile::tempdir().unwrap();
  let config = write(&dir, "px2vw.json", r#"{ "exclude": "vendor" }"#);
  let input = write(&dir, "vendor.css", ".a { width: 32px }");
  let args = Args {
    config: Some(config),
    out_dir: None,
    files: vec![input],
  };
  let mut stdout = Vec::new();

  run(&args, &mut stdout).unwrap();

  assert_eq!(String::from_utf8(stdout).unwrap(), ".a { width: 32px }\n");
}

#[test]
fn counts_warnings() {
  let dir = tempfile::tempdir().unwrap();
  let input = write(
    &dir,
    "main.css",
    ".a {\n  width: 32px;\n  /* px-to-viewport-ignore */\n}\n",
  );
  let args = Args {
    config: None,
    out_dir: None,
    files: vec![input],
  };

  let summary = run(&args, &mut Vec::new()).unwrap();

  assert_eq!(summary.warnings, 1);
}

#[test]
fn reports_missing_files() {
  let dir = tempfile::tempdir().unwrap();
  let missing = dir.path().join("missing.css");
  let args = Args {
    config: None,
    out_dir: None,
    files: vec![missing.clone()],
  };

  let error = run(&args, &mut Vec::new()).unwrap_err();

  assert_eq!(
    error.to_string(),
    format!("Failed to read {}", missing.display())
  );
}

#[test]
fn reports_invalid_config() {
  let dir = tempfile::tempdir().unwrap();
  let config = write(&dir, "px2vw.json", r#"{ "include": 1 }"#);

  let error = load_options(Some(&config)).unwrap_err();

  assert_eq!(
    error.to_string(),
    format!("Invalid config {}", config.display())
  );
  assert_eq!(
    error.root_cause().to_string(),
    "options.include should be RegExp or Array of RegExp."
  );
}

#[test]
fn reports_syntax_errors_with_the_file_name() {
  let dir = tempfile::tempdir().unwrap();
  let input = write(&dir, "broken.css", ".a { width: 1px");
  let args = Args {
    config: None,
    out_dir: None,
    files: vec![input.clone()],
  };

  let error = run(&args, &mut Vec::new()).unwrap_err();

  assert_eq!(
    format!("{:#}", error),
    format!(
      "Failed to convert {0}: {0}:1:4: Unclosed block",
      input.display()
    )
  );
}
