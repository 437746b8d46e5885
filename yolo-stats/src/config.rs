//! Dataset configuration format.

use crate::common::*;

/// The class identifier found in the first column of a label line.
pub type ClassId = usize;

/// The dataset splits declared in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dataset configuration.
///
/// It accepts the `data.yaml` file used to train YOLO detectors. Keys
/// other than the ones below are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Image directory of the training split.
    pub train: PathBuf,
    /// Image directory of the validation split.
    pub val: PathBuf,
    /// Image directory of the test split.
    pub test: PathBuf,
    /// Class names keyed by class id.
    pub names: Classes,
}

impl DatasetConfig {
    /// Load the configuration from a YAML or JSON5 file.
    ///
    /// Files ending with `.json5` or `.json` are parsed as JSON5, and the
    /// rest are parsed as YAML.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let config: Self = match extension.as_deref() {
            Some("json5") | Some("json") => {
                json5::from_str(&text).map_err(|source| ConfigError::Json5 {
                    path: path.to_owned(),
                    source,
                })?
            }
            _ => serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_owned(),
                source,
            })?,
        };

        config.check();
        Ok(config)
    }

    /// The image directory of a split.
    pub fn image_dir(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    fn check(&self) {
        if self.names.is_empty() {
            warn!("no classes are declared in the configuration");
        }

        let duplicates: Vec<_> = self
            .names
            .iter()
            .map(|(_, name)| name)
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            warn!("duplicated class names found: {:?}", duplicates);
        }
    }
}

/// Class names keyed by class id, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classes(IndexMap<ClassId, String>);

impl Classes {
    /// Build from names indexed by position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            names
                .into_iter()
                .enumerate()
                .map(|(id, name)| (id, name.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> + '_ {
        self.0.iter().map(|(&id, name)| (id, name.as_str()))
    }
}

impl FromIterator<(ClassId, String)> for Classes {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (ClassId, String)>,
    {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Classes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Names {
            Sequence(Vec<String>),
            Mapping(IndexMap<ClassKey, String>),
        }

        // YAML keys are integers while JSON5 keys are always strings.
        #[derive(Deserialize, PartialEq, Eq, Hash)]
        #[serde(untagged)]
        enum ClassKey {
            Int(i64),
            Text(String),
        }

        let classes = match Names::deserialize(deserializer)? {
            Names::Sequence(names) => Classes::from_names(names),
            Names::Mapping(mapping) => {
                let mut classes = IndexMap::with_capacity(mapping.len());

                for (key, name) in mapping {
                    let id = match &key {
                        ClassKey::Int(id) => usize::try_from(*id).ok(),
                        ClassKey::Text(text) => text.trim().parse().ok(),
                    };
                    let id = id.ok_or_else(|| {
                        let key = match key {
                            ClassKey::Int(id) => id.to_string(),
                            ClassKey::Text(text) => text,
                        };
                        D::Error::custom(format!(
                            "invalid class id '{}', expect a non-negative integer",
                            key
                        ))
                    })?;

                    if classes.insert(id, name).is_some() {
                        return Err(D::Error::custom(format!(
                            "class id {} is declared more than once",
                            id
                        )));
                    }
                }

                Classes(classes)
            }
        };

        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, file_name: &str, text: &str) -> PathBuf {
        let path = dir.join(file_name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn load_yaml_with_name_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "data.yaml",
            "train: data/images/train\nval: data/images/val\ntest: data/images/test\nnc: 2\nnames: [cat, dog]\n",
        );

        let config = DatasetConfig::open(&path).unwrap();
        assert_eq!(config.image_dir(Split::Train), Path::new("data/images/train"));
        assert_eq!(config.image_dir(Split::Val), Path::new("data/images/val"));
        assert_eq!(config.image_dir(Split::Test), Path::new("data/images/test"));
        assert_eq!(config.names, Classes::from_names(["cat", "dog"]));
    }

    #[test]
    fn load_yaml_with_name_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "data.yml",
            "train: a\nval: b\ntest: c\nnames:\n  3: truck\n  0: person\n  1: bicycle\n",
        );

        let config = DatasetConfig::open(&path).unwrap();
        let classes: Vec<_> = config.names.iter().collect();
        assert_eq!(classes, vec![(3, "truck"), (0, "person"), (1, "bicycle")]);
        assert!(!config.names.contains(2));
    }

    #[test]
    fn load_json5() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "data.json5",
            r#"{
                // splits
                train: "a/images",
                val: "b/images",
                test: "c/images",
                names: { "0": "cat", "1": "dog" },
            }"#,
        );

        let config = DatasetConfig::open(&path).unwrap();
        assert_eq!(config.names.name(0), Some("cat"));
        assert_eq!(config.names.name(1), Some("dog"));
        assert_eq!(config.names.len(), 2);
    }

    #[test]
    fn missing_field_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "data.yaml", "train: a\nval: b\nnames: [cat]\n");

        let err = DatasetConfig::open(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Yaml { .. })));
    }

    #[test]
    fn negative_class_id_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "data.yaml",
            "train: a\nval: b\ntest: c\nnames:\n  -1: cat\n",
        );

        let err = DatasetConfig::open(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetConfig::open(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Io { .. })));
    }
}
