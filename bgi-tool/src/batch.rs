use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bgi_script::{Script, ScriptOptions};
use rayon::prelude::*;
use serde::Serialize;

/// A file, or every extension-less file directly inside a folder.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&path.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .flatten()
        .filter(|p| p.is_file() && p.extension().is_none())
        .collect();
    files.sort();
    Ok(files)
}

fn dir_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes `<file>.txt`; returns the number of exported records.
pub fn export_one(path: &Path, options: &ScriptOptions, all: bool) -> Result<usize> {
    let txt = path.with_extension("txt");
    let mut script = Script::with_options(options.clone());
    script.load(path).with_context(|| format!("load {}", path.display()))?;
    let count = script
        .export_strings(&txt, all)
        .with_context(|| format!("export {}", txt.display()))?;
    Ok(count)
}

/// Applies `<file>.txt` and writes `<dir>/<rebuild_dir>/<file>`.
pub fn rebuild_one(path: &Path, options: &ScriptOptions, rebuild_dir: &str) -> Result<PathBuf> {
    let txt = path.with_extension("txt");
    let name = path.file_name().with_context(|| format!("not a file: {}", path.display()))?;
    let out_dir = dir_of(path).join(rebuild_dir);
    let output = out_dir.join(name);

    let mut script = Script::with_options(options.clone());
    script.load(path).with_context(|| format!("load {}", path.display()))?;
    let applied = script
        .import_strings(&txt)
        .with_context(|| format!("import {}", txt.display()))?;
    log::debug!("{}: {} translated lines", path.display(), applied);

    fs::create_dir_all(&out_dir)?;
    script.save(&output).with_context(|| format!("save {}", output.display()))?;
    Ok(output)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Export { all: bool },
    Rebuild,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub failed: usize,
}

/// Runs `job` over every input in parallel. A failing file is logged and
/// does not stop the others.
pub fn run(inputs: &[PathBuf], job: Job, options: &ScriptOptions, rebuild_dir: &str) -> Summary {
    let failed = inputs
        .par_iter()
        .map(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            let result = match job {
                Job::Export { all } => {
                    log::info!("Exporting text from {}", name);
                    export_one(path, options, all).map(|n| log::debug!("{}: {} records", name, n))
                }
                Job::Rebuild => {
                    log::info!("Rebuilding script {}", name);
                    rebuild_one(path, options, rebuild_dir)
                        .map(|out| log::debug!("{}: wrote {}", name, out.display()))
                }
            };
            if let Err(e) = &result {
                log::error!("{}: {:#}", path.display(), e);
            }
            result.is_err()
        })
        .filter(|&failed| failed)
        .count();

    Summary { total: inputs.len(), failed }
}

#[derive(Debug, Serialize)]
pub struct StringEntry {
    pub offset: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ScriptInfo {
    pub file: String,
    pub version: String,
    pub import_size: usize,
    pub code_size: usize,
    pub string_size: usize,
    pub strings: Vec<StringEntry>,
}

pub fn inspect(path: &Path, options: &ScriptOptions) -> Result<ScriptInfo> {
    let mut script = Script::with_options(options.clone());
    script.load(path).with_context(|| format!("load {}", path.display()))?;
    let sections = script.sections()?;

    Ok(ScriptInfo {
        file: path.display().to_string(),
        version: sections.version.clone(),
        import_size: sections.import.len(),
        code_size: sections.code.len(),
        string_size: sections.strings.len(),
        strings: script
            .strings()?
            .into_iter()
            .map(|r| StringEntry { offset: format!("{:08X}", r.offset), text: r.text })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgi_script::test::ScriptBuilder;

    // Shift-JIS "猫"
    const NEKO: &[u8] = &[0x94, 0x4C];

    fn write_script(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let bytes = ScriptBuilder::new().load(NEKO).load(b"se01").build();
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn folder_inputs_skip_files_with_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "b");
        write_script(dir.path(), "a");
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let got = collect_inputs(dir.path()).unwrap();
        assert_eq!(got, vec![dir.path().join("a"), dir.path().join("b")]);
    }

    #[test]
    fn export_then_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "scene");
        let options = ScriptOptions::default();

        assert_eq!(export_one(&path, &options, false).unwrap(), 1);
        let txt = fs::read_to_string(dir.path().join("scene.txt")).unwrap();
        assert!(txt.contains("◆00000004◆猫"));

        fs::write(dir.path().join("scene.txt"), txt.replace("◆00000004◆猫", "◆00000004◆cat")).unwrap();
        let out = rebuild_one(&path, &options, "rebuild").unwrap();
        assert_eq!(out, dir.path().join("rebuild").join("scene"));

        let info = inspect(&out, &ScriptOptions { source_nls: bgi_nls::Encoding::Utf8, ..options }).unwrap();
        let texts: Vec<_> = info.strings.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["cat", "se01"]);
        assert_eq!(info.strings[0].offset, "00000004");
    }

    #[test]
    fn failures_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_script(dir.path(), "good");
        let bad = dir.path().join("bad");
        fs::write(&bad, b"NotAScript\0").unwrap();

        let summary = run(&[good, bad], Job::Export { all: true }, &ScriptOptions::default(), "rebuild");
        assert_eq!(summary, Summary { total: 2, failed: 1 });
        assert!(dir.path().join("good.txt").exists());
    }

    #[test]
    fn rebuild_without_translation_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "scene");
        assert!(rebuild_one(&path, &ScriptOptions::default(), "rebuild").is_err());
        assert!(!dir.path().join("rebuild").exists());
    }
}
