//! Per-split and dataset-wide statistics.

use crate::{
    common::*,
    config::{ClassId, Classes, DatasetConfig, Split},
    dataset::{count_labels, label_dir_for, mean_size, scan_image_dir, ImageSizes, SizeProbe},
};

/// Object counts keyed by class id.
///
/// The keys are exactly the configured classes in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts(IndexMap<ClassId, usize>);

impl ClassCounts {
    /// Zero counts for every class.
    pub fn zeros(classes: &Classes) -> Self {
        Self(classes.ids().map(|id| (id, 0)).collect())
    }

    /// Add one object to a class. The class must be one of the initial
    /// classes, as ids parsed by [parse_class_id](crate::dataset::parse_class_id) are.
    pub(crate) fn increment(&mut self, id: ClassId) {
        debug_assert!(self.0.contains_key(&id), "class id {} is not counted", id);
        if let Some(count) = self.0.get_mut(&id) {
            *count += 1;
        }
    }

    /// Add up the counts of another record with the same classes.
    pub(crate) fn merge(&mut self, other: &ClassCounts) {
        other.0.iter().for_each(|(id, &count)| {
            debug_assert!(self.0.contains_key(id), "class id {} is not counted", id);
            if let Some(total) = self.0.get_mut(id) {
                *total += count;
            }
        });
    }

    pub fn get(&self, id: ClassId) -> Option<usize> {
        self.0.get(&id).copied()
    }

    /// The number of objects over all classes.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, usize)> + '_ {
        self.0.iter().map(|(&id, &count)| (id, count))
    }
}

/// The statistics of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitStats {
    pub mean_width: f64,
    pub mean_height: f64,
    pub image_count: usize,
    pub class_counts: ClassCounts,
    /// Always equals the sum of `class_counts`.
    pub total_individuals: usize,
}

impl SplitStats {
    fn new(
        (mean_width, mean_height): (f64, f64),
        image_count: usize,
        class_counts: ClassCounts,
    ) -> Self {
        Self {
            mean_width,
            mean_height,
            image_count,
            total_individuals: class_counts.total(),
            class_counts,
        }
    }
}

/// The name of a statistics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitName {
    Train,
    Val,
    Test,
    Total,
}

impl SplitName {
    /// Records in report order.
    pub const ALL: [SplitName; 4] = [
        SplitName::Train,
        SplitName::Val,
        SplitName::Test,
        SplitName::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Val => "val",
            SplitName::Test => "test",
            SplitName::Total => "total",
        }
    }

    /// The capitalized name.
    pub fn title(&self) -> &'static str {
        match self {
            SplitName::Train => "Train",
            SplitName::Val => "Val",
            SplitName::Test => "Test",
            SplitName::Total => "Total",
        }
    }
}

impl From<Split> for SplitName {
    fn from(split: Split) -> Self {
        match split {
            Split::Train => SplitName::Train,
            Split::Val => SplitName::Val,
            Split::Test => SplitName::Test,
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The statistics of a whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub train: SplitStats,
    pub val: SplitStats,
    pub test: SplitStats,
    pub total: SplitStats,
}

impl DatasetStats {
    pub fn get(&self, name: SplitName) -> &SplitStats {
        match name {
            SplitName::Train => &self.train,
            SplitName::Val => &self.val,
            SplitName::Test => &self.test,
            SplitName::Total => &self.total,
        }
    }

    /// Iterate over records in report order.
    pub fn iter(&self) -> impl Iterator<Item = (SplitName, &SplitStats)> + '_ {
        SplitName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

/// How the mean image size of the `total` record is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotalSizes {
    /// Scan all image directories again after the per-split pass.
    Rescan,
    /// Reuse the pixel sums collected in the per-split pass.
    Reuse,
}

impl Default for TotalSizes {
    fn default() -> Self {
        Self::Rescan
    }
}

impl FromStr for TotalSizes {
    type Err = OptionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "rescan" => Ok(Self::Rescan),
            "reuse" => Ok(Self::Reuse),
            _ => Err(OptionError {
                kind: "total size mode",
                value: text.to_owned(),
                expected: "rescan, reuse",
            }),
        }
    }
}

/// Options of [analyze].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub probe: SizeProbe,
    pub total_sizes: TotalSizes,
}

/// Compute the statistics of every split and of the dataset as a whole.
///
/// The first error aborts the analysis.
pub fn analyze(config: &DatasetConfig, options: &AnalyzeOptions) -> Result<DatasetStats> {
    let AnalyzeOptions { probe, total_sizes } = *options;
    let classes = &config.names;

    let mut total_counts = ClassCounts::zeros(classes);
    let mut total_image_count = 0;
    let mut all_sizes = ImageSizes::default();

    // per-split pass
    let mut split_pass = |split: Split| -> Result<SplitStats> {
        let image_dir = config.image_dir(split);
        let label_dir = label_dir_for(image_dir);
        info!(
            "analyzing {} split at '{}' and '{}'",
            split,
            image_dir.display(),
            label_dir.display()
        );

        let sizes = scan_image_dir(image_dir, probe)?;
        let class_counts = count_labels(&label_dir, classes)?;

        total_image_count += sizes.count();
        total_counts.merge(&class_counts);
        if total_sizes == TotalSizes::Reuse {
            all_sizes.extend(&sizes);
        }

        Ok(SplitStats::new(
            sizes.mean_size(),
            sizes.count(),
            class_counts,
        ))
    };
    let train = split_pass(Split::Train)?;
    let val = split_pass(Split::Val)?;
    let test = split_pass(Split::Test)?;

    // total size pass
    if total_sizes == TotalSizes::Rescan {
        info!("scanning all image directories for the total image size");
        for split in Split::ALL {
            all_sizes.extend(&scan_image_dir(config.image_dir(split), probe)?);
        }
    }

    let total = SplitStats::new(
        mean_size(
            all_sizes.width_sum(),
            all_sizes.height_sum(),
            all_sizes.count(),
        ),
        total_image_count,
        total_counts,
    );

    Ok(DatasetStats {
        train,
        val,
        test,
        total,
    })
}
