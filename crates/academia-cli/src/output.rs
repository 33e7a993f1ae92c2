use std::io::Write;

use academia_core::{LinkStats, Paper};
use academia_parsing::cites::highlight_cites;
use academia_parsing::{ParsingConfig, is_references_title};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a progress line ("linking paper.json").
pub fn print_status(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", message.magenta())
    } else {
        writeln!(w, "{}", message)
    }
}

/// Build the one-line JSON report for a linked paper. `linking_success` is
/// a percentage string ("80%"), or null when the paper has no cites.
pub fn link_report(filename: &str, stats: &LinkStats) -> serde_json::Value {
    serde_json::json!({
        "filename": filename,
        "references": stats.references,
        "cites": stats.cites,
        "linked": stats.linked,
        "linking_success": stats.linking_success().map(|n| format!("{n}%")),
    })
}

/// Print the link report after linking one paper.
pub fn print_link_report(
    w: &mut dyn Write,
    filename: &str,
    stats: &LinkStats,
    color: ColorMode,
) -> std::io::Result<()> {
    print_status(w, &link_report(filename, stats).to_string(), color)
}

/// Render a paper as `# Title` lines followed by its paragraphs, one per
/// line. Bibliography headers are blue and body cites green.
pub fn render_highlighted(paper: &Paper, config: &ParsingConfig, color: ColorMode) -> String {
    let mut lines = Vec::new();
    for section in &paper.sections {
        let header = format!("# {}", section.title);
        let bibliography = is_references_title(&section.title, config);
        lines.push(if color.enabled() && bibliography {
            header.blue().to_string()
        } else {
            header
        });

        for paragraph in &section.paragraphs {
            lines.push(if color.enabled() && !bibliography {
                highlight_cites(paragraph, |cite| cite.green().to_string())
            } else {
                paragraph.clone()
            });
        }
    }
    lines.join("\n")
}

/// Print a paper with its cites highlighted.
pub fn print_highlighted(
    w: &mut dyn Write,
    paper: &Paper,
    config: &ParsingConfig,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "{}", render_highlighted(paper, config, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_core::Section;

    fn paper() -> Paper {
        Paper {
            sections: vec![
                Section {
                    title: "Introduction".to_string(),
                    paragraphs: vec!["Brown (2015) showed it.".to_string()],
                },
                Section {
                    title: "References".to_string(),
                    paragraphs: vec!["Brown, T. 2015. A Title.".to_string()],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_plain() {
        let out = render_highlighted(&paper(), &ParsingConfig::default(), ColorMode(false));
        assert_eq!(
            out,
            "# Introduction\nBrown (2015) showed it.\n# References\nBrown, T. 2015. A Title."
        );
    }

    #[test]
    fn test_render_colored() {
        let out = render_highlighted(&paper(), &ParsingConfig::default(), ColorMode(true));
        assert!(out.contains(&"Brown (2015)".green().to_string()));
        assert!(out.contains(&"# References".blue().to_string()));
        assert!(out.contains("# Introduction\n"));
        // bibliography text is left alone
        assert!(out.ends_with("\nBrown, T. 2015. A Title."));
    }

    #[test]
    fn test_render_uses_configured_title() {
        let config = academia_parsing::ParsingConfigBuilder::new()
            .references_title_regex("^Introduction$")
            .build()
            .unwrap();
        let out = render_highlighted(&paper(), &config, ColorMode(true));
        assert!(out.starts_with(&"# Introduction".blue().to_string()));
        // "Introduction" is now the bibliography, so its cite stays plain
        assert!(out.contains("\nBrown (2015) showed it.\n"));
    }

    #[test]
    fn test_link_report_shape() {
        let stats = LinkStats {
            references: 4,
            cites: 5,
            linked: 4,
            ambiguous: 0,
        };
        let report = link_report("paper.json", &stats);
        assert_eq!(report["filename"], "paper.json");
        assert_eq!(report["references"], 4);
        assert_eq!(report["linking_success"], "80%");
    }

    #[test]
    fn test_link_report_without_cites() {
        let report = link_report("empty.json", &LinkStats::default());
        assert!(report["linking_success"].is_null());
    }

    #[test]
    fn test_print_status_plain() {
        let mut buf = Vec::new();
        print_status(&mut buf, "linking a.json", ColorMode(false)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "linking a.json\n");
    }
}
