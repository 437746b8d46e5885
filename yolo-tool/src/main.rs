use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use prettytable::{cell, row, Table};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use yolo_stats::{
    analyze, label_dir_for, AnalyzeOptions, DatasetConfig, ReportFormat, SizeProbe, Split,
    TableReport, TextReport, TotalSizes,
};

#[derive(Debug, Clone, Parser)]
/// Inspect YOLO datasets and summarize their images and labels.
enum Opts {
    /// Show the splits and classes declared in a dataset configuration.
    Info {
        /// configuration file
        config_file: PathBuf,
    },
    /// Compute image sizes and object counts per split.
    Stats {
        /// configuration file
        config_file: PathBuf,
        /// report format, either "text" or "table"
        #[clap(long, default_value = "text")]
        format: ReportFormat,
        /// image size probe, either "decode" or "header"
        #[clap(long, default_value = "decode")]
        probe: SizeProbe,
        /// how the total mean image size is computed, either "rescan" or "reuse"
        #[clap(long, default_value = "rescan")]
        total_sizes: TotalSizes,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(Opts::parse(), &mut out)?;
    out.flush()?;

    Ok(())
}

fn run(opts: Opts, out: &mut dyn Write) -> Result<()> {
    match opts {
        Opts::Info { config_file } => {
            info(config_file, out)?;
        }
        Opts::Stats {
            config_file,
            format,
            probe,
            total_sizes,
        } => {
            stats(
                config_file,
                format,
                AnalyzeOptions { probe, total_sizes },
                out,
            )?;
        }
    }

    Ok(())
}

fn load_config(config_file: &Path) -> Result<DatasetConfig> {
    DatasetConfig::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))
}

fn info(config_file: impl AsRef<Path>, out: &mut dyn Write) -> Result<()> {
    let config = load_config(config_file.as_ref())?;

    // print split directories
    {
        let mut table = Table::new();
        table.add_row(row!["split", "image dir", "label dir"]);

        Split::ALL.into_iter().for_each(|split| {
            let image_dir = config.image_dir(split);
            table.add_row(row![
                split,
                image_dir.display(),
                label_dir_for(image_dir).display(),
            ]);
        });

        table.print(&mut *out)?;
    }

    // print classes
    {
        let mut table = Table::new();
        table.add_row(row!["class id", "name"]);

        config.names.iter().for_each(|(id, name)| {
            table.add_row(row![id, name]);
        });

        table.print(&mut *out)?;
    }

    Ok(())
}

fn stats(
    config_file: impl AsRef<Path>,
    format: ReportFormat,
    options: AnalyzeOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let config_file = config_file.as_ref();
    let config = load_config(config_file)?;

    info!("analyzing dataset from '{}'", config_file.display());
    let stats = analyze(&config, &options).context("failed to analyze dataset")?;

    match format {
        ReportFormat::Text => {
            write!(out, "{}", TextReport::new(&stats, &config.names))?;
        }
        ReportFormat::Table => {
            TableReport::new(&stats, &config.names).table().print(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    fn make_dataset() -> Result<(TempDir, PathBuf)> {
        let root = tempfile::tempdir()?;
        for split in Split::ALL {
            let image_dir = root.path().join("images").join(split.as_str());
            let label_dir = root.path().join("labels").join(split.as_str());
            fs::create_dir_all(&image_dir)?;
            fs::create_dir_all(&label_dir)?;
            RgbImage::new(40, 20).save(image_dir.join("0001.png"))?;
            fs::write(label_dir.join("0001.txt"), "0 0.5 0.5 0.1 0.1\n1 0.2 0.2 0.1 0.1\n")?;
        }

        let images = root.path().join("images");
        let config_file = root.path().join("data.yaml");
        fs::write(
            &config_file,
            format!(
                "train: {}\nval: {}\ntest: {}\nnames: [cat, dog]\n",
                images.join("train").display(),
                images.join("val").display(),
                images.join("test").display(),
            ),
        )?;

        Ok((root, config_file))
    }

    fn run_args(args: &[&str]) -> Result<String> {
        let opts = Opts::try_parse_from(args)?;
        let mut out = vec![];
        run(opts, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parse_stats_options() -> Result<()> {
        let opts = Opts::try_parse_from([
            "yolo-tool",
            "stats",
            "data.yaml",
            "--format",
            "table",
            "--probe",
            "header",
            "--total-sizes",
            "reuse",
        ])?;

        match opts {
            Opts::Stats {
                config_file,
                format,
                probe,
                total_sizes,
            } => {
                assert_eq!(config_file, Path::new("data.yaml"));
                assert_eq!(format, ReportFormat::Table);
                assert_eq!(probe, SizeProbe::Header);
                assert_eq!(total_sizes, TotalSizes::Reuse);
            }
            _ => panic!("expect the stats subcommand"),
        }

        let opts = Opts::try_parse_from(["yolo-tool", "stats", "data.yaml"])?;
        match opts {
            Opts::Stats {
                format,
                probe,
                total_sizes,
                ..
            } => {
                assert_eq!(format, ReportFormat::Text);
                assert_eq!(probe, SizeProbe::Decode);
                assert_eq!(total_sizes, TotalSizes::Rescan);
            }
            _ => panic!("expect the stats subcommand"),
        }

        Ok(())
    }

    #[test]
    fn reject_unknown_option_value() {
        let result =
            Opts::try_parse_from(["yolo-tool", "stats", "data.yaml", "--format", "json"]);
        assert!(result.is_err());
    }

    #[test]
    fn stats_text_report() -> Result<()> {
        let (_root, config_file) = make_dataset()?;
        let config_file = config_file.to_str().unwrap();

        let text = run_args(&["yolo-tool", "stats", config_file])?;
        assert!(text.starts_with("Dataset statistics:"));
        assert!(text.contains("Train set:"));
        assert!(text.contains("  Mean image size: 40 x 20"));
        assert!(text.contains("Total set:"));
        assert!(text.contains("  Total images: 3"));
        assert!(text.contains("    Class cat: 3"));
        assert!(text.contains("    Class dog: 3"));

        Ok(())
    }

    #[test]
    fn stats_table_report() -> Result<()> {
        let (_root, config_file) = make_dataset()?;
        let config_file = config_file.to_str().unwrap();

        let text = run_args(&[
            "yolo-tool",
            "stats",
            config_file,
            "--format",
            "table",
            "--total-sizes",
            "reuse",
        ])?;
        assert!(text.contains("mean width"));
        assert!(text.contains("cat"));
        assert!(text.contains("dog"));
        assert!(text.contains("total"));
        assert!(text.contains("40.00"));

        Ok(())
    }

    #[test]
    fn info_lists_splits_and_classes() -> Result<()> {
        let (root, config_file) = make_dataset()?;
        let config_file = config_file.to_str().unwrap();

        let text = run_args(&["yolo-tool", "info", config_file])?;
        let label_dir = root.path().join("labels").join("val");
        assert!(text.contains(&label_dir.display().to_string()));
        assert!(text.contains("class id"));
        assert!(text.contains("cat"));
        assert!(text.contains("dog"));

        Ok(())
    }

    #[test]
    fn missing_config_is_error() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config_file = root.path().join("absent.yaml");
        let config_file = config_file.to_str().unwrap();

        assert!(run_args(&["yolo-tool", "stats", config_file]).is_err());
        assert!(run_args(&["yolo-tool", "info", config_file]).is_err());

        Ok(())
    }
}
