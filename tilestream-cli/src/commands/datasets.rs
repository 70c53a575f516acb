//! `tilestream datasets` command.

use tilestream::config::{ConfigFile, DatasetSettings, DatasetSource};

use crate::error::CliError;

/// Print every configured dataset.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    if config.datasets.is_empty() {
        println!("No datasets configured.");
        return Ok(());
    }

    println!("Datasets");
    println!("========");
    for dataset in &config.datasets {
        println!();
        for line in describe(dataset) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn describe(dataset: &DatasetSettings) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", dataset.id, dataset.name),
        format!("  type:      {}", dataset.data_type),
        format!("  source:    {}", dataset.source.kind()),
    ];
    if !dataset.copyright.is_empty() {
        lines.push(format!("  copyright: {}", dataset.copyright));
    }
    match &dataset.source {
        DatasetSource::File { files } => {
            for file in files {
                lines.push(format!("  file:      {}", file.display()));
            }
        }
        DatasetSource::Wms {
            url,
            layers,
            max_level,
            ..
        } => {
            lines.push(format!("  url:       {}", url));
            lines.push(format!("  layers:    {}", layers));
            lines.push(format!("  max level: {}", max_level));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_file_dataset() {
        let config =
            ConfigFile::parse("[dataset.rgb]\nname = Colour\ntype = u8vec3\nfiles = r.db,g.db,b.db\n")
                .unwrap();

        let lines = describe(&config.datasets[0]);

        assert_eq!(lines[0], "[rgb] Colour");
        assert!(lines.iter().any(|l| l.contains("u8vec3")));
        assert_eq!(lines.iter().filter(|l| l.contains("file:")).count(), 3);
        assert!(!lines.iter().any(|l| l.contains("copyright")));
    }

    #[test]
    fn test_describe_wms_dataset() {
        let config = ConfigFile::parse(
            "[dataset.w]\ntype = uint8\nsource = wms\nurl = http://x/{patch}\nlayers = gray\nmax_level = 7\n",
        )
        .unwrap();

        let lines = describe(&config.datasets[0]);

        assert!(lines.contains(&"  source:    wms".to_string()));
        assert!(lines.contains(&"  max level: 7".to_string()));
    }
}
