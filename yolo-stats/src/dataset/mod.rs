//! Directory scanners for the image and label trees of a dataset.

mod image;
mod label;

pub use self::image::*;
pub use label::*;

use crate::common::*;

/// List the entries of a directory sorted by file name.
pub(crate) fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let paths: Vec<_> = fs::read_dir(dir)
        .map_err(|err| Error::directory(dir, err))?
        .map(|entry| -> Result<_> {
            let entry = entry.map_err(|err| Error::directory(dir, err))?;
            Ok(entry.path())
        })
        .collect::<Result<_>>()?;
    Ok(paths.into_iter().sorted().collect())
}
