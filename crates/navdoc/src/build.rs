//! The `build` and `summary` commands: read declaration records, collect,
//! serialize, write. All I/O lives here; the engine stays pure.

use std::fs;

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use navdoc_engine::{serialize, CollectOutcome, Collector, EntryOrder, RawDecl, SidebarIndex};
use walkdir::WalkDir;

pub fn run_build(
    input: &Utf8Path,
    output: Option<&Utf8PathBuf>,
    split: bool,
    order: EntryOrder,
    deny_warnings: bool,
) -> Result<()> {
    let decls = read_decls(input)?;
    let outcome = Collector::new().with_entry_order(order).collect(decls);
    report_warnings(&outcome);

    if split {
        let Some(out_dir) = output else {
            bail!("--split requires --output");
        };
        write_split(&outcome.index, out_dir)?;
    } else {
        let batch = serialize::serialize_all(&outcome.index);
        for failure in &batch.failures {
            eprintln!("{} {failure}", "Error:".red());
        }
        match output {
            Some(path) => {
                fs::write(path, format!("{}\n", batch.json))
                    .with_context(|| format!("writing {path}"))?;
                println!("Wrote sidebar index to {path}");
            }
            None => println!("{}", batch.json),
        }
        if !batch.failures.is_empty() {
            bail!("{} module(s) failed to serialize", batch.failures.len());
        }
    }

    if deny_warnings && outcome.has_warnings() {
        bail!(
            "{} warning(s) recorded with --deny-warnings",
            outcome.warnings.len()
        );
    }
    Ok(())
}

pub fn run_summary(input: &Utf8Path) -> Result<()> {
    let decls = read_decls(input)?;
    let outcome = Collector::new().collect(decls);
    report_warnings(&outcome);

    println!("Sidebar Index Summary");
    println!("=====================");
    println!();
    println!(
        "Modules: {}  Entries: {}",
        outcome.index.len(),
        outcome.index.entry_count()
    );
    println!();

    for module in outcome.index.modules() {
        println!("{}", module.path().to_string().bold());
        for section in module.sections() {
            println!(
                "  {}s ({}):",
                section.kind.display_name(),
                section.entries.len()
            );
            for entry in section.entries.iter().take(10) {
                let preview = summary_preview(&entry.summary);
                if preview.is_empty() {
                    println!("    - {}", entry.name);
                } else {
                    println!("    - {} - {preview}", entry.name);
                }
            }
            if section.entries.len() > 10 {
                println!("    ... and {} more", section.entries.len() - 10);
            }
        }
        println!();
    }
    Ok(())
}

fn summary_preview(summary: &str) -> String {
    if summary.chars().count() > 60 {
        let truncated: String = summary.chars().take(60).collect();
        format!("{truncated}...")
    } else {
        summary.to_string()
    }
}

fn report_warnings(outcome: &CollectOutcome) {
    for warning in &outcome.warnings {
        eprintln!("{} {warning}", "Warning:".yellow());
    }
    if outcome.has_warnings() {
        eprintln!(
            "{} declaration(s) skipped or deduplicated",
            outcome.warnings.len()
        );
    }
}

/// Write one `<module path>/sidebar.json` per module. A module whose
/// invariant check fails is reported and skipped; the others still land.
fn write_split(index: &SidebarIndex, out_dir: &Utf8Path) -> Result<()> {
    let mut failed = 0usize;
    for module in index.modules() {
        let json = match serialize::module_to_json_string(module) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("{} {err}", "Error:".red());
                failed += 1;
                continue;
            }
        };
        let dir = out_dir.join(module.path().as_slash_path());
        fs::create_dir_all(&dir).with_context(|| format!("creating {dir}"))?;
        let file = dir.join("sidebar.json");
        fs::write(&file, format!("{json}\n")).with_context(|| format!("writing {file}"))?;
    }

    println!(
        "Wrote {} module sidebar(s) to {out_dir}",
        index.len() - failed
    );
    if failed > 0 {
        bail!("{failed} module(s) failed to serialize");
    }
    Ok(())
}

fn read_decls(path: &Utf8Path) -> Result<Vec<RawDecl>> {
    if path.is_dir() {
        let mut files = collect_decl_files(path);
        if files.is_empty() {
            bail!("no .json or .jsonl declaration files under {path}");
        }
        files.sort();

        let mut decls = Vec::new();
        for file in &files {
            match read_decl_file(file) {
                Ok(mut batch) => decls.append(&mut batch),
                Err(err) => eprintln!("{} skipping {file}: {err:#}", "Warning:".yellow()),
            }
        }
        Ok(decls)
    } else if path.is_file() {
        read_decl_file(path)
    } else {
        bail!("input path does not exist: {path}");
    }
}

fn collect_decl_files(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "json" || ext == "jsonl")
        })
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
        .collect()
}

fn read_decl_file(path: &Utf8Path) -> Result<Vec<RawDecl>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    if path.extension() == Some("jsonl") {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).with_context(|| format!("parsing {path}")))
            .collect()
    } else {
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navdoc_engine::{ItemKind, ModulePath};

    const DECLS: &str = r#"[
        {"module_path": "lib", "kind": "struct", "name": "CallBuilder", "summary": "Builds up a cross contract call."},
        {"module_path": "lib", "kind": "fn", "name": "build_call", "summary": ""},
        {"module_path": "lib::seal", "kind": "fn", "name": "call", "summary": ""}
    ]"#;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn build_writes_single_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = utf8(&dir.path().join("decls.json"));
        let output = utf8(&dir.path().join("index.json"));
        fs::write(&input, DECLS).unwrap();

        run_build(&input, Some(&output), false, EntryOrder::Lexicographic, true).unwrap();

        let artifact = fs::read_to_string(&output).unwrap();
        assert!(artifact.contains("\"lib::seal\""));
        assert!(artifact.contains("\"CallBuilder\""));
        assert!(artifact.ends_with("}\n"));
    }

    #[test]
    fn build_split_writes_per_module_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = utf8(&dir.path().join("decls.json"));
        let out_dir = utf8(&dir.path().join("docs"));
        fs::write(&input, DECLS).unwrap();

        run_build(&input, Some(&out_dir), true, EntryOrder::Lexicographic, true).unwrap();

        assert!(out_dir.join("lib/sidebar.json").is_file());
        assert!(out_dir.join("lib/seal/sidebar.json").is_file());
    }

    #[test]
    fn deny_warnings_fails_on_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let input = utf8(&dir.path().join("decls.json"));
        fs::write(
            &input,
            r#"[
                {"module_path": "lib", "kind": "fn", "name": "dup", "summary": ""},
                {"module_path": "lib", "kind": "fn", "name": "dup", "summary": ""}
            ]"#,
        )
        .unwrap();

        let err = run_build(&input, None, false, EntryOrder::Lexicographic, true);
        assert!(err.is_err());

        // Without --deny-warnings the same input succeeds.
        run_build(&input, None, false, EntryOrder::Lexicographic, false).unwrap();
    }

    #[test]
    fn jsonl_input_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let input = utf8(&dir.path().join("decls.jsonl"));
        fs::write(
            &input,
            "{\"module_path\": \"lib\", \"kind\": \"fn\", \"name\": \"a\", \"summary\": \"\"}\n\
             {\"module_path\": \"lib\", \"kind\": \"fn\", \"name\": \"b\", \"summary\": \"\"}\n",
        )
        .unwrap();

        let decls = read_decls(&input).unwrap();
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn directory_input_aggregates_files_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(
            root.join("b.json"),
            r#"[{"module_path": "lib", "kind": "fn", "name": "from_b", "summary": ""}]"#,
        )
        .unwrap();
        fs::write(
            root.join("a.json"),
            r#"[{"module_path": "lib", "kind": "fn", "name": "from_a", "summary": ""}]"#,
        )
        .unwrap();
        fs::write(root.join("ignored.txt"), "not a declaration file").unwrap();

        let decls = read_decls(&root).unwrap();
        let outcome = Collector::new()
            .with_entry_order(EntryOrder::Declaration)
            .collect(decls);
        let module = outcome
            .index
            .get(&ModulePath::parse("lib").unwrap())
            .unwrap();
        let names: Vec<_> = module
            .entries_of(ItemKind::Function)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["from_a", "from_b"]);
    }
}
