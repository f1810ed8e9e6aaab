//! End-to-end builds over scratch trees. Files are compared keyed by path, never by order.

use clap::Parser;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tca::engine::{Cli, handle_run, resolve_output_path};
use tca::pipeline::collect_entries;
use tca::utils::{MAX_FILE_SIZE, apply_file_to_opts};
use tca::{Atlas, AtlasOpts, Opts, Trigram, build_atlas, check_destination, write_atlas};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn by_path(atlas: &Atlas) -> HashMap<PathBuf, (BTreeSet<Trigram>, String)> {
    atlas
        .files
        .iter()
        .map(|e| (e.path.clone(), (e.trigrams.clone(), e.mtime.clone())))
        .collect()
}

fn paths(atlas: &Atlas) -> BTreeSet<PathBuf> {
    atlas.files.iter().map(|e| e.path.clone()).collect()
}

fn build(root: &Path) -> Atlas {
    build_atlas(root, &AtlasOpts::default()).unwrap()
}

// --- scenarios ---

#[test]
fn test_single_go_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "hello.go", b"abc");

    let atlas = build(dir.path());
    assert_eq!(atlas.files.len(), 1);
    let entry = atlas.get(&path).unwrap();
    assert_eq!(entry.trigrams, BTreeSet::from([*b"abc"]));
    assert_eq!(atlas.metadata.file_count, 1);
    assert_eq!(atlas.metadata.version, "1.0");
}

#[test]
fn test_markdown_dedup() {
    let dir = tempdir().unwrap();
    write(dir.path(), "notes.md", b"aabb");

    let atlas = build(dir.path());
    assert_eq!(atlas.files.len(), 1);
    assert_eq!(atlas.files[0].trigrams, BTreeSet::from([*b"aab", *b"abb"]));
}

#[test]
fn test_vendor_dir_excluded() {
    let dir = tempdir().unwrap();
    write(dir.path(), "vendor/lib.go", b"package lib");
    let kept = write(dir.path(), "main.go", b"package main");

    let atlas = build(dir.path());
    assert_eq!(paths(&atlas), BTreeSet::from([kept]));
}

/// Root with `x.go`, `sub/y.go`, a link back to the root and a dangling link.
#[cfg(unix)]
fn tree_with_bad_links(root: &Path) -> BTreeSet<PathBuf> {
    let x = write(root, "x.go", b"package x");
    let y = write(root, "sub/y.go", b"package y");
    std::os::unix::fs::symlink(root, root.join("loop")).unwrap();
    std::os::unix::fs::symlink(root.join("missing.go"), root.join("dangling.go")).unwrap();
    BTreeSet::from([x, y])
}

#[cfg(unix)]
#[test]
fn test_traversal_errors_tolerated_following_links() {
    use tca::pipeline::{run_pipeline, shutdown_pipeline_handles};

    for parallel_walk in [false, true] {
        let dir = tempdir().unwrap();
        let expected = tree_with_bad_links(dir.path());
        let opts = Opts {
            follow_links: true,
            parallel_walk,
            ..Opts::default()
        };

        let handles = run_pipeline(dir.path(), &opts).unwrap();
        let found: BTreeSet<PathBuf> = handles.entry_rx.iter().map(|e| e.path).collect();
        let (counted, fed) = shutdown_pipeline_handles(
            handles.count_handle,
            handles.walk_handle,
            handles.worker_handles,
        )
        .unwrap();

        assert_eq!(found, expected, "parallel_walk={parallel_walk}");
        assert_eq!(counted, 2, "parallel_walk={parallel_walk}");
        assert_eq!(fed, 2, "parallel_walk={parallel_walk}");
        let errors = handles.walk_errors.lock().unwrap();
        assert!(!errors.is_empty(), "parallel_walk={parallel_walk}");

        let atlas = build_atlas(
            dir.path(),
            &AtlasOpts {
                follow_links: true,
                parallel_walk,
                ..AtlasOpts::default()
            },
        )
        .unwrap();
        assert_eq!(paths(&atlas), expected);
        assert_eq!(atlas.metadata.file_count, atlas.files.len());
    }
}

#[cfg(unix)]
#[test]
fn test_strict_mode_reports_but_does_not_abort() {
    for parallel_walk in [false, true] {
        let dir = tempdir().unwrap();
        let expected = tree_with_bad_links(dir.path());
        let opts = AtlasOpts {
            follow_links: true,
            parallel_walk,
            strict: true,
            ..AtlasOpts::default()
        };

        let atlas = build_atlas(dir.path(), &opts).unwrap();
        assert_eq!(paths(&atlas), expected, "parallel_walk={parallel_walk}");
        assert_eq!(atlas.metadata.file_count, 2);

        let (entries, counted) = collect_entries(dir.path(), &Opts::from(&opts)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(counted, 2);
    }
}

#[test]
fn test_excluded_dirs_any_depth_both_walks() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/b/node_modules/c/index.js", b"module.exports = 1");
    write(dir.path(), "x/.git/y/z.json", b"{}\n{}");
    write(dir.path(), "deep/vendor/more/lib.go", b"package lib");
    let kept = write(dir.path(), "a/b/c/keep.js", b"let x = 1;");

    for parallel_walk in [false, true] {
        let opts = AtlasOpts {
            parallel_walk,
            ..Default::default()
        };
        let atlas = build_atlas(dir.path(), &opts).unwrap();
        assert_eq!(paths(&atlas), BTreeSet::from([kept.clone()]), "parallel={parallel_walk}");
    }
}

#[test]
fn test_ignore_file_excludes_markdown() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".tcaignore", b"# no docs\n*.md\n");
    write(dir.path(), "README.md", b"# readme");
    write(dir.path(), "docs/guide.md", b"guide text");
    let kept = write(dir.path(), "docs/conf.yaml", b"a: 1");

    let atlas = build(dir.path());
    assert_eq!(paths(&atlas), BTreeSet::from([kept]));
}

#[test]
fn test_size_ceiling_boundary() {
    let dir = tempdir().unwrap();
    let at = write(dir.path(), "at.json", &vec![b' '; MAX_FILE_SIZE as usize]);
    write(dir.path(), "over.json", &vec![b' '; 11 * 1024 * 1024]);

    let atlas = build(dir.path());
    assert_eq!(paths(&atlas), BTreeSet::from([at]));
    assert_eq!(atlas.files[0].trigrams, BTreeSet::from([*b"   "]));
}

// --- invariants ---

#[test]
fn test_file_count_matches_files_and_count_pass() {
    let dir = tempdir().unwrap();
    for i in 0..250 {
        write(dir.path(), &format!("d{}/f{}.go", i % 7, i), format!("package p{i}").as_bytes());
    }
    write(dir.path(), "skip.rs", b"fn main() {}");

    let atlas = build(dir.path());
    assert_eq!(atlas.files.len(), 250);
    assert_eq!(atlas.metadata.file_count, atlas.files.len());

    let (entries, counted) = collect_entries(dir.path(), &Opts::default()).unwrap();
    assert_eq!(entries.len(), 250);
    assert_eq!(counted, 250);
}

#[test]
fn test_empty_tree() {
    let dir = tempdir().unwrap();
    let atlas = build(dir.path());
    assert!(atlas.files.is_empty());
    assert_eq!(atlas.metadata.file_count, 0);
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.go", b"package a\nfunc A() {}\n");
    write(dir.path(), "b/c.ts", b"export const c = 3;");
    write(dir.path(), "b/d.css", b"body { margin: 0 }");

    let first = by_path(&build(dir.path()));
    let second = by_path(&build(dir.path()));
    assert_eq!(first, second);
}

#[test]
fn test_worker_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        write(dir.path(), &format!("f{i}.py"), format!("x = {i}\ny = {}\n", i * i).as_bytes());
    }
    let one = build_atlas(
        dir.path(),
        &AtlasOpts {
            num_workers: Some(1),
            ..Default::default()
        },
    )
    .unwrap();
    let many = build_atlas(
        dir.path(),
        &AtlasOpts {
            num_workers: Some(16),
            ..Default::default()
        },
    )
    .unwrap();
    let strip = |m: HashMap<PathBuf, (BTreeSet<Trigram>, String)>| {
        m.into_iter().map(|(p, (t, _))| (p, t)).collect::<HashMap<_, _>>()
    };
    assert_eq!(strip(by_path(&one)), strip(by_path(&many)));
}

#[test]
fn test_custom_extensions_and_limit() {
    let dir = tempdir().unwrap();
    let rs = write(dir.path(), "src/lib.rs", b"pub fn f() {}");
    write(dir.path(), "src/big.rs", &[b'a'; 64]);
    write(dir.path(), "main.go", b"package main");

    let opts = AtlasOpts {
        extensions: vec!["rs".to_string()],
        max_file_size: Some(32),
        ..Default::default()
    };
    let atlas = build_atlas(dir.path(), &opts).unwrap();
    assert_eq!(paths(&atlas), BTreeSet::from([rs]));
}

#[test]
fn test_missing_root_is_error() {
    let dir = tempdir().unwrap();
    assert!(build_atlas(&dir.path().join("nope"), &AtlasOpts::default()).is_err());
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_skipped() {
    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing.go"), dir.path().join("link.go")).unwrap();
    let kept = write(dir.path(), "real.go", b"package real");

    let atlas = build(dir.path());
    assert_eq!(paths(&atlas), BTreeSet::from([kept]));
}

// --- progress ---

#[test]
fn test_progress_updates_from_many_threads_all_counted() {
    use tca::engine::progress::{
        ProgressBarConfig, create_progress_bar, progress_callback, update_progress_bar,
    };

    let bar = create_progress_bar(ProgressBarConfig::new(400, "test", kdam::Animation::Classic));
    let threads: Vec<_> = (0..4)
        .map(|_| {
            let bar = bar.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    update_progress_bar(&bar, 1);
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }
    assert_eq!(bar.lock().unwrap().counter, 400);

    let cb = progress_callback(&Some(bar.clone())).unwrap();
    cb(5);
    assert_eq!(bar.lock().unwrap().counter, 405);
}

// --- persistence ---

#[test]
fn test_written_document_schema() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/main.go", b"package main\n");
    write(dir.path(), "web/app.js", b"console.log(1)");
    let out = tempdir().unwrap();
    let dest = out.path().join("atlas.json");

    let atlas = build(dir.path());
    write_atlas(&atlas, &dest).unwrap();
    assert!(!out.path().join("atlas.json.tmp").exists());

    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&dest).unwrap()).unwrap();
    let files = v["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(v["metadata"]["version"], "1.0");
    assert_eq!(v["metadata"]["file_count"], 2);
    assert!(v["metadata"]["created"].as_str().is_some_and(|s| !s.is_empty()));
    for f in files {
        let trigrams = f["trigrams"].as_array().unwrap();
        let unique: BTreeSet<&str> = trigrams.iter().map(|t| t.as_str().unwrap()).collect();
        assert_eq!(unique.len(), trigrams.len());
        assert!(unique.iter().all(|t| t.len() == 3));
        assert!(f["mtime"].as_str().is_some());
        assert!(f["path"].as_str().is_some());
    }
}

#[test]
fn test_overwrite_guard() {
    let dir = tempdir().unwrap();
    let dest = write(dir.path(), "existing.json", b"{}");
    assert!(check_destination(&dest, false).is_err());
    assert!(check_destination(&dest, true).is_ok());
    assert!(check_destination(&dir.path().join("fresh.json"), false).is_ok());
}

#[test]
fn test_destination_not_indexed() {
    let dir = tempdir().unwrap();
    let kept = write(dir.path(), "a.json", b"{\"a\": 1}");
    let dest = write(dir.path(), "out.json", b"{\"files\": []}");

    let opts = Opts {
        output: Some(dest),
        ..Default::default()
    };
    let (entries, _) = collect_entries(dir.path(), &opts).unwrap();
    let found: BTreeSet<PathBuf> = entries.into_iter().map(|e| e.path).collect();
    assert_eq!(found, BTreeSet::from([kept]));
}

#[test]
fn test_default_output_name() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("myproj");
    std::fs::create_dir(&project).unwrap();

    let dest = resolve_output_path(&project, None).unwrap();
    let name = dest.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("myproj-atlas-"), "{name}");
    assert!(name.ends_with(".json"));
    assert_eq!(name.len(), "myproj-atlas-YYYY-MM-DD.json".len());
    assert_eq!(dest.parent().unwrap(), project);

    let explicit = resolve_output_path(&project, Some(Path::new("x.json"))).unwrap();
    assert_eq!(explicit, project.join("x.json"));
}

// --- config file ---

#[test]
fn test_config_file_applies() {
    let file = tca::utils::tca_toml::parse_tca_toml(
        "[settings]\nworkers = 2\nextensions = [\"rs\"]\nexclude_dirs = [\"target\"]\nstrict = true\n",
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.num_workers, 2);
    assert_eq!(opts.extensions, vec!["rs".to_string()]);
    assert_eq!(opts.exclude_dirs, vec!["target".to_string()]);
    assert!(opts.strict);
    assert!(!opts.force);
}

#[test]
fn test_config_file_unknown_key_rejected() {
    assert!(tca::utils::tca_toml::parse_tca_toml("[settings]\nbogus = 1\n").is_err());
}

// --- command surface ---

#[test]
fn test_cli_build_and_force() {
    let dir = tempdir().unwrap();
    write(dir.path(), "main.go", b"package main");
    let root = dir.path().to_str().unwrap();

    let cli = Cli::try_parse_from(["tca", "build", root, "--output", "atlas.json"]).unwrap();
    handle_run(&cli).unwrap();
    let dest = dir.path().join("atlas.json");
    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&dest).unwrap()).unwrap();
    assert_eq!(v["metadata"]["file_count"], 1);

    // refuses to clobber, then overwrites with --force without indexing itself
    assert!(handle_run(&cli).is_err());
    let forced =
        Cli::try_parse_from(["tca", "build", root, "--output", "atlas.json", "--force"]).unwrap();
    handle_run(&forced).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&dest).unwrap()).unwrap();
    assert_eq!(v["metadata"]["file_count"], 1);
}

#[test]
fn test_cli_search_and_update_not_implemented() {
    let search = Cli::try_parse_from(["tca", "search", "needle"]).unwrap();
    assert!(handle_run(&search).is_err());
    let update = Cli::try_parse_from(["tca", "update", "."]).unwrap();
    assert!(handle_run(&update).is_err());
}
