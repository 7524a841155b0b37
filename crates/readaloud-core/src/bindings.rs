//! TypeScript bindings for the events a browser UI consumes.

use crate::profile::PlatformClass;
use crate::publisher::{ChapterChangedEvent, PositionEvent, Progress, ReaderEvent};
use crate::state::{PlaybackPosition, PlaybackState};
use std::fs;
use std::path::Path;
use ts_rs::TS;

/// Write `T` to `out_dir` and return its `index.ts` re-export line.
fn export_type<T: TS + 'static>(out_dir: &Path) -> Result<String, String> {
    T::export_all_to(out_dir).map_err(|err| err.to_string())?;
    let name = T::name();
    Ok(format!("export type {{ {name} }} from \"./{name}\";\n"))
}

/// Regenerate every `.ts` file in `out_dir`, plus an `index.ts` re-export.
pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    let index: String = [
        export_type::<Progress>(out_dir)?,
        export_type::<PositionEvent>(out_dir)?,
        export_type::<ChapterChangedEvent>(out_dir)?,
        export_type::<ReaderEvent>(out_dir)?,
        export_type::<PlaybackState>(out_dir)?,
        export_type::<PlaybackPosition>(out_dir)?,
        export_type::<PlatformClass>(out_dir)?,
    ]
    .concat();

    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, index)
        .map_err(|err| format!("Failed to write {}: {err}", index_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_index_and_drops_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Stale.ts"), "export type Stale = never;").unwrap();

        export_ts_bindings(dir.path()).unwrap();

        assert!(!dir.path().join("Stale.ts").exists());
        assert!(dir.path().join("PositionEvent.ts").exists());
        let index = fs::read_to_string(dir.path().join("index.ts")).unwrap();
        assert!(index.contains(r#"export type { ReaderEvent } from "./ReaderEvent";"#));
        assert_eq!(index.lines().count(), 7);
    }
}
