use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dox")]
#[command(about = "Convert .docx documents into a PII-masked JSONL corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    /// A .docx file, or a folder scanned recursively for them
    #[arg(long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Output JSONL file (default from config: raw_docx.jsonl)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, env = "DOX_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Abort on the first unreadable document instead of skipping it
    #[arg(long)]
    pub fail_fast: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["dox"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let args = ["dox", "--in", "docs", "--out", "out/corpus.jsonl", "--fail-fast"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.input, PathBuf::from("docs"));
        assert_eq!(cli.out, Some(PathBuf::from("out/corpus.jsonl")));
        assert!(cli.fail_fast);
    }

    #[test]
    fn test_out_is_optional() {
        let cli = Cli::try_parse_from(["dox", "--in", "a.docx"]).unwrap();
        assert_eq!(cli.out, None);
        assert!(!cli.fail_fast);
    }
}
