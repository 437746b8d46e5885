use super::list_dir;
use crate::{
    common::*,
    config::{ClassId, Classes},
    stats::ClassCounts,
};

/// Derive the label directory from an image directory.
///
/// Every occurrence of `images` in the path is replaced with `labels`,
/// following the layout of YOLO datasets. Other bytes of the path, including
/// non-UTF-8 ones, are kept as is.
pub fn label_dir_for(image_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(replace_images(image_dir.as_ref().as_os_str()))
}

#[cfg(unix)]
fn replace_images(path: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt as _, OsStringExt as _};

    const FROM: &[u8] = b"images";
    const TO: &[u8] = b"labels";

    let mut rest = path.as_bytes();
    let mut bytes = Vec::with_capacity(rest.len());

    while let Some((&first, tail)) = rest.split_first() {
        if rest.starts_with(FROM) {
            bytes.extend_from_slice(TO);
            rest = &rest[FROM.len()..];
        } else {
            bytes.push(first);
            rest = tail;
        }
    }

    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn replace_images(path: &OsStr) -> OsString {
    OsString::from(path.to_string_lossy().replace("images", "labels"))
}

/// Check if a token is a decimal integer, possibly too large for any
/// integer type.
fn is_integer(token: &str) -> bool {
    let digits = token
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse the class id of a label line.
///
/// Returns `None` for a blank line. `line_num` is 1-based and only used in
/// error messages.
pub fn parse_class_id(
    line: &str,
    path: &Path,
    line_num: usize,
    classes: &Classes,
) -> Result<Option<ClassId>, ParseError> {
    let token = match line.split_whitespace().next() {
        Some(token) => token,
        None => return Ok(None),
    };

    let id = match token.parse::<i64>() {
        Ok(class_id) => ClassId::try_from(class_id)
            .ok()
            .filter(|&id| classes.contains(id)),
        // out of i64 range, so never a configured class
        Err(_) if is_integer(token) => None,
        Err(_) => {
            return Err(ParseError::InvalidClassId {
                path: path.to_owned(),
                line: line_num,
                token: token.to_owned(),
            })
        }
    };

    let id = id.ok_or_else(|| ParseError::UnknownClass {
        path: path.to_owned(),
        line: line_num,
        class_id: token.to_owned(),
    })?;

    Ok(Some(id))
}

/// Count the objects per class in a single label file.
pub fn count_label_file(
    path: impl AsRef<Path>,
    classes: &Classes,
    counts: &mut ClassCounts,
) -> Result<()> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path).map_err(|err| Error::directory(path, err))?);

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| Error::directory(path, err))?;
        if let Some(id) = parse_class_id(&line, path, index + 1, classes)? {
            counts.increment(id);
        }
    }

    Ok(())
}

/// Count the objects per class in every file of a label directory.
///
/// Every configured class gets a count, even if it never appears.
pub fn count_labels(label_dir: impl AsRef<Path>, classes: &Classes) -> Result<ClassCounts> {
    let label_dir = label_dir.as_ref();
    let mut counts = ClassCounts::zeros(classes);

    for path in list_dir(label_dir)? {
        if path.is_dir() {
            debug!("skip directory '{}'", path.display());
            continue;
        }
        count_label_file(&path, classes, &mut counts)?;
    }

    debug!(
        "found {} objects in '{}'",
        counts.total(),
        label_dir.display()
    );
    Ok(counts)
}
