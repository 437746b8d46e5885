use super::list_dir;
use crate::common::*;
use ::image::GenericImageView as _;

/// The height and width of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub h: u32,
    pub w: u32,
}

impl PixelSize {
    pub fn new(h: u32, w: u32) -> Self {
        Self { h, w }
    }
}

/// The method to obtain the size of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeProbe {
    /// Decode the whole image. Files failing to decode are not images.
    Decode,
    /// Read the image header only. Truncated images with an intact header
    /// are still counted.
    Header,
}

impl Default for SizeProbe {
    fn default() -> Self {
        Self::Decode
    }
}

impl SizeProbe {
    /// Get the image size, or `None` if the file is not a recognized image.
    pub fn probe(&self, path: &Path) -> Option<PixelSize> {
        match self {
            Self::Decode => {
                let image = ::image::io::Reader::open(path)
                    .ok()?
                    .with_guessed_format()
                    .ok()?
                    .decode()
                    .ok()?;
                let (w, h) = image.dimensions();
                Some(PixelSize::new(h, w))
            }
            Self::Header => {
                let ::imagesize::ImageSize { width, height } = ::imagesize::size(path).ok()?;
                Some(PixelSize::new(
                    u32::try_from(height).ok()?,
                    u32::try_from(width).ok()?,
                ))
            }
        }
    }
}

impl FromStr for SizeProbe {
    type Err = OptionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "decode" => Ok(Self::Decode),
            "header" => Ok(Self::Header),
            _ => Err(OptionError {
                kind: "size probe",
                value: text.to_owned(),
                expected: "decode, header",
            }),
        }
    }
}

/// Pixel sizes of the images found in one or more directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSizes {
    pub widths: Vec<u32>,
    pub heights: Vec<u32>,
}

impl ImageSizes {
    pub fn push(&mut self, size: PixelSize) {
        self.widths.push(size.w);
        self.heights.push(size.h);
    }

    pub fn extend(&mut self, other: &ImageSizes) {
        self.widths.extend_from_slice(&other.widths);
        self.heights.extend_from_slice(&other.heights);
    }

    pub fn count(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn width_sum(&self) -> u64 {
        self.widths.iter().map(|&w| w as u64).sum()
    }

    pub fn height_sum(&self) -> u64 {
        self.heights.iter().map(|&h| h as u64).sum()
    }

    /// The mean width and height. Both are zero if there is no image.
    pub fn mean_size(&self) -> (f64, f64) {
        mean_size(self.width_sum(), self.height_sum(), self.count())
    }
}

/// Compute the mean width and height from pixel sums.
pub fn mean_size(width_sum: u64, height_sum: u64, count: usize) -> (f64, f64) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let count = count as f64;
    (width_sum as f64 / count, height_sum as f64 / count)
}

/// Collect the sizes of the images in a directory.
///
/// Entries are visited in file name order. Sub-directories and files that
/// the probe does not recognize as images are skipped silently.
pub fn scan_image_dir(dir: impl AsRef<Path>, probe: SizeProbe) -> Result<ImageSizes> {
    let dir = dir.as_ref();
    let mut sizes = ImageSizes::default();

    for path in list_dir(dir)? {
        if !path.is_file() {
            debug!("skip non-file entry '{}'", path.display());
            continue;
        }

        match probe.probe(&path) {
            Some(size) => sizes.push(size),
            None => debug!("skip non-image file '{}'", path.display()),
        }
    }

    debug!("found {} images in '{}'", sizes.count(), dir.display());
    Ok(sizes)
}
