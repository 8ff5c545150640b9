use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Remove each file that exists; already-missing files are not an error
///
/// Returns the paths that were actually deleted.
pub fn remove_files<I, P>(paths: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut removed = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed {:?}", path);
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}
