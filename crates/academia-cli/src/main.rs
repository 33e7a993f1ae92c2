use std::io::Write;
use std::path::{Path, PathBuf};

use academia_core::config_file::{self, ConfigFile};
use academia_core::{LinkStats, Paper};
use academia_parsing::{PaperLinker, ParsingConfig, ParsingConfigBuilder};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Academia - Link in-text citations to bibliography entries in paper JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debug messages
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect references and cites, and link cites to references where possible
    Link {
        /// Paper JSON files to link
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write linked papers here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Regex matched against section titles to find the bibliography
        #[arg(long)]
        references_title: Option<String>,
    },

    /// Print papers as plain text with cites highlighted
    Highlight {
        /// Paper JSON files to print
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Regex matched against section titles to find the bibliography
        #[arg(long)]
        references_title: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Link {
            files,
            output,
            no_color,
            references_title,
        } => link(&files, output, no_color, references_title),
        Command::Highlight {
            files,
            output,
            no_color,
            references_title,
        } => highlight(&files, output, no_color, references_title),
    }
}

/// Log to stderr. `RUST_LOG` applies unless `--verbose` forces debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(references_title: Option<String>) -> anyhow::Result<ParsingConfig> {
    build_config(
        &config_file::load_config(),
        references_title,
        std::env::var("ACADEMIA_REFERENCES_TITLE").ok(),
        std::env::var("ACADEMIA_ET_AL").ok(),
    )
}

/// Resolve configuration: CLI flags > env vars > config file > defaults
fn build_config(
    file: &ConfigFile,
    flag_title: Option<String>,
    env_title: Option<String>,
    env_et_al: Option<String>,
) -> anyhow::Result<ParsingConfig> {
    let mut builder = ParsingConfigBuilder::from_config_file(file)
        .context("invalid [parsing] section in config file")?;

    if let Some(pattern) = flag_title.or(env_title) {
        builder = builder.references_title_regex(&pattern);
    }
    if let Some(sentinel) = env_et_al {
        builder = builder.et_al_sentinel(&sentinel);
    }

    let config = builder.build()?;
    tracing::debug!(
        et_al = config.et_al(),
        strategy = ?config.name_list_strategy(),
        "resolved parsing config"
    );
    Ok(config)
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

fn read_paper(path: &Path) -> anyhow::Result<Paper> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not a paper", path.display()))
}

fn link(
    files: &[PathBuf],
    output: Option<PathBuf>,
    no_color: bool,
    references_title: Option<String>,
) -> anyhow::Result<()> {
    let linker = PaperLinker::with_config(resolve_config(references_title)?);
    let color = ColorMode(!no_color);
    let mut writer = open_writer(output.as_deref())?;
    let mut stderr = std::io::stderr();

    for path in files {
        let filename = path.display().to_string();
        output::print_status(&mut stderr, &format!("linking {filename}"), color)?;

        let linked = linker.link_paper(&read_paper(path)?);
        serde_json::to_writer(&mut writer, &linked)?;
        writeln!(writer)?;

        let stats = LinkStats::from_paper(&linked);
        output::print_link_report(&mut stderr, &filename, &stats, color)?;
    }
    writer.flush()?;
    Ok(())
}

fn highlight(
    files: &[PathBuf],
    output: Option<PathBuf>,
    no_color: bool,
    references_title: Option<String>,
) -> anyhow::Result<()> {
    let config = resolve_config(references_title)?;
    // Never write escape codes into a file
    let color = ColorMode(!no_color && output.is_none());
    let mut writer = open_writer(output.as_deref())?;
    let mut stderr = std::io::stderr();

    for path in files {
        output::print_status(
            &mut stderr,
            &format!("highlighting {}", path.display()),
            ColorMode(!no_color),
        )?;
        let paper = read_paper(path)?;
        output::print_highlighted(&mut writer, &paper, &config, color)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_core::config_file::ParsingSection;
    use academia_parsing::{NameListStrategy, is_references_title};

    fn file(references_title: &str, et_al: &str) -> ConfigFile {
        ConfigFile {
            parsing: Some(ParsingSection {
                references_title: Some(references_title.to_string()),
                et_al: Some(et_al.to_string()),
                name_list_strategy: Some("split".to_string()),
            }),
        }
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = build_config(&ConfigFile::default(), None, None, None).unwrap();
        assert!(is_references_title("References", &config));
        assert_eq!(config.et_al(), "et al.");
        assert_eq!(config.name_list_strategy(), NameListStrategy::Scanner);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = build_config(&file("^Bibliography$", "al."), None, None, None).unwrap();
        assert!(is_references_title("Bibliography", &config));
        assert!(!is_references_title("References", &config));
        assert_eq!(config.et_al(), "al.");
        assert_eq!(config.name_list_strategy(), NameListStrategy::Split);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = build_config(
            &file("^Bibliography$", "al."),
            None,
            Some("^Works Cited$".to_string()),
            Some("and others".to_string()),
        )
        .unwrap();
        assert!(is_references_title("Works Cited", &config));
        assert!(!is_references_title("Bibliography", &config));
        assert_eq!(config.et_al(), "and others");
        // untouched file settings survive
        assert_eq!(config.name_list_strategy(), NameListStrategy::Split);
    }

    #[test]
    fn test_flag_overrides_env_and_file() {
        let config = build_config(
            &file("^Bibliography$", "al."),
            Some("^Literature$".to_string()),
            Some("^Works Cited$".to_string()),
            None,
        )
        .unwrap();
        assert!(is_references_title("Literature", &config));
        assert!(!is_references_title("Works Cited", &config));
        assert!(!is_references_title("Bibliography", &config));
        assert_eq!(config.et_al(), "al.");
    }

    #[test]
    fn test_invalid_sources_are_errors() {
        assert!(build_config(&ConfigFile::default(), Some("(".to_string()), None, None).is_err());

        let bad_strategy = ConfigFile {
            parsing: Some(ParsingSection {
                name_list_strategy: Some("guess".to_string()),
                ..Default::default()
            }),
        };
        assert!(build_config(&bad_strategy, None, None, None).is_err());
    }
}
