use anyhow::{bail, Context, Result};
use planner_core::Project;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed key-value store for project snapshots: one `<key>.json`
/// file per key, created on first save.
pub fn save(dir: &Path, key: &str, project: &Project) -> Result<PathBuf> {
    validate_key(key)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("creating store directory {}", dir.display()))?;
    let path = dir.join(format!("{key}.json"));
    let json = serde_json::to_string_pretty(project)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn load(dir: &Path, key: &str) -> Result<Project> {
    validate_key(key)?;
    let path = dir.join(format!("{key}.json"));
    let content = fs::read_to_string(&path)
        .with_context(|| format!("no project saved under key '{key}' in {}", dir.display()))?;
    let project =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(project)
}

/// Keys name files directly, so anything path-like is rejected.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        bail!("invalid store key '{key}': use a plain name without path separators");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::Piece;

    fn temp_store(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("planner-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = temp_store("roundtrip");
        let mut project = Project::default();
        project
            .add_piece(Piece {
                id: "shelf".into(),
                width: 60.0,
                height: 45.0,
                quantity: 4,
                color: None,
            })
            .unwrap();

        save(&dir, "workbench", &project).unwrap();
        let loaded = load(&dir, "workbench").unwrap();

        assert_eq!(loaded.pieces.len(), 1);
        assert_eq!(loaded.pieces[0].id, "shelf");
        assert_eq!(loaded.pieces[0].quantity, 4);
        assert_eq!(loaded.params.cut_thickness, 0.3);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_unknown_key_errors() {
        let dir = temp_store("missing");
        assert!(load(&dir, "nothing-here").is_err());
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = temp_store("keys");
        let project = Project::default();
        assert!(save(&dir, "../escape", &project).is_err());
        assert!(save(&dir, "a/b", &project).is_err());
        assert!(save(&dir, "", &project).is_err());
    }
}
