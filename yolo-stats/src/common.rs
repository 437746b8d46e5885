pub use crate::error::{ConfigError, Error, OptionError, ParseError, Result};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use serde::{Deserialize, Deserializer};
pub use std::{
    convert::TryFrom,
    ffi::{OsStr, OsString},
    fmt,
    fs::{self, File},
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};
