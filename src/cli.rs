use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

pub struct Config {
    pub output_path: PathBuf,
    pub root_dir: PathBuf,
    pub strict: bool,
    pub verbosity: u8,
}

pub fn parse_args() -> Result<Config> {
    let matches = Command::new("hpp2one")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merges a tree of modular C/C++ headers into one header file")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Sets the output header path")
                .num_args(1),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail when a local include matches no file in the tree"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increases log verbosity (-v, -vv)"),
        )
        .arg(
            Arg::new("dir")
                .value_name("DIR")
                .help("Root directory of the header tree")
                .num_args(1),
        )
        .get_matches();

    let root_dir = matches
        .get_one::<String>("dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // Build default filename from the root folder: {folder}.hpp
    let default_filename = {
        let folder_name = root_dir
            .canonicalize()
            .ok()
            .and_then(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "merged".to_string());

        format!("{folder_name}.hpp")
    };

    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_filename));

    Ok(Config {
        output_path,
        root_dir,
        strict: matches.get_flag("strict"),
        verbosity: matches.get_count("verbose"),
    })
}
