use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// User the language preference is stored for
    #[arg(short, long, default_value = "local")]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate an SRT subtitle file
    File {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language command tag (e.g. fr, kh, jp)
        #[arg(short, long)]
        lang: Option<String>,

        /// Output directory, defaults to the input file's directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Report progress through the log instead of a progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Translate a piece of text
    Text {
        /// Text to translate
        text: String,

        /// Target language command tag (e.g. fr, kh, jp)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// List supported language command tags
    Languages,

    /// Write a configuration file with default values
    InitConfig {
        /// Where to write the file
        #[arg(short, long, default_value = "subrelay.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_command() {
        let args = Args::parse_from([
            "subrelay", "-v", "--user", "42", "file", "-i", "movie.srt", "-l", "fr",
        ]);
        assert!(args.verbose);
        assert_eq!(args.user, "42");
        match args.command {
            Commands::File {
                input,
                lang,
                output_dir,
                quiet,
            } => {
                assert_eq!(input, PathBuf::from("movie.srt"));
                assert_eq!(lang.as_deref(), Some("fr"));
                assert!(output_dir.is_none());
                assert!(!quiet);
            }
            _ => panic!("expected file command"),
        }
    }

    #[test]
    fn test_parse_quiet_file_command() {
        let args = Args::parse_from(["subrelay", "file", "-i", "talk.srt", "--quiet"]);
        assert!(matches!(args.command, Commands::File { quiet: true, .. }));
    }

    #[test]
    fn test_parse_text_command_defaults() {
        let args = Args::parse_from(["subrelay", "text", "Hello"]);
        assert_eq!(args.user, "local");
        assert!(matches!(args.command, Commands::Text { ref text, lang: None } if text == "Hello"));
    }
}
