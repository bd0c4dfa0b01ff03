//! Numbered-menu session for generating diagrams from a terminal

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use diagen::{DiagramRequest, DiagramService, DiagramType};
use tracing::debug;

use crate::colorizer::Painter;

/// What the user picked at the menu prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Type(DiagramType),
    Quit,
    Invalid,
}

/// Interpret a menu answer: a 1-based number, a type id, or `q`/`quit`
pub fn parse_choice(answer: &str) -> MenuChoice {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
        return MenuChoice::Quit;
    }
    if let Ok(index) = answer.parse::<usize>() {
        return DiagramType::from_menu_index(index)
            .map(MenuChoice::Type)
            .unwrap_or(MenuChoice::Invalid);
    }
    answer
        .parse::<DiagramType>()
        .map(MenuChoice::Type)
        .unwrap_or(MenuChoice::Invalid)
}

/// File a diagram of `diagram_type` is written to inside `dir`
pub fn output_file(dir: &Path, diagram_type: DiagramType) -> PathBuf {
    dir.join(format!("{}_diagram.png", diagram_type.id()))
}

/// Write the numbered list of supported types
pub fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Available diagram types:")?;
    for (i, diagram_type) in DiagramType::ALL.iter().enumerate() {
        writeln!(out, "  {:>2}. {} ({})", i + 1, diagram_type.label(), diagram_type.id())?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Interactive loop over `input`/`out`, writing images into `dir`
///
/// Runs until the user quits or input ends. Returns the number of diagrams
/// generated successfully.
pub async fn run_session<R, W>(
    service: &DiagramService,
    input: &mut R,
    out: &mut W,
    dir: &Path,
    painter: Painter,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut generated = 0;
    loop {
        print_menu(out)?;
        write!(out, "Select a diagram type (1-{}, or q to quit): ", DiagramType::ALL.len())?;
        out.flush()?;

        let Some(answer) = read_line(input)? else {
            break;
        };
        let diagram_type = match parse_choice(&answer) {
            MenuChoice::Type(diagram_type) => diagram_type,
            MenuChoice::Quit => break,
            MenuChoice::Invalid => {
                writeln!(out, "{}", painter.failure(&format!("Invalid choice: {}", answer.trim())))?;
                continue;
            }
        };

        write!(out, "Describe the {}: ", diagram_type.label().to_lowercase())?;
        out.flush()?;
        let Some(prompt) = read_line(input)? else {
            break;
        };

        let path = output_file(dir, diagram_type);
        debug!(%diagram_type, path = %path.display(), "Generating from menu");
        let request = DiagramRequest::new(diagram_type.id(), prompt);
        match service.generate_to(&request, &path).await {
            Ok(result) => {
                generated += 1;
                writeln!(out, "{}", result.preview())?;
                writeln!(
                    out,
                    "{}",
                    painter.success(&format!("Diagram saved to {}", path.display()))
                )?;
            }
            Err(e) => {
                writeln!(
                    out,
                    "{}",
                    painter.failure(&format!("Failed to generate diagram: {}", e))
                )?;
            }
        }
        writeln!(out)?;
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use diagen::{DiagramError, DiagramMarkup, DiagramRenderer, MarkupGenerator};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct Echo;

    #[async_trait]
    impl MarkupGenerator for Echo {
        async fn generate(&self, t: DiagramType, prompt: &str) -> Result<DiagramMarkup, DiagramError> {
            Ok(DiagramMarkup::new(format!("{}\n  %% {}", t.header(), prompt)))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    struct Writes(bool);

    #[async_trait]
    impl DiagramRenderer for Writes {
        async fn render(&self, _: &DiagramMarkup, path: &Path) -> Result<bool, DiagramError> {
            if self.0 {
                std::fs::write(path, b"png")?;
            }
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "writes"
        }
    }

    fn service(render_ok: bool, dir: &Path) -> DiagramService {
        DiagramService::new(Arc::new(Echo), Arc::new(Writes(render_ok)), dir)
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), MenuChoice::Type(DiagramType::Flowchart));
        assert_eq!(parse_choice(" 7 "), MenuChoice::Type(DiagramType::Pie));
        assert_eq!(parse_choice("mindmap"), MenuChoice::Type(DiagramType::Mindmap));
        assert_eq!(parse_choice("Q"), MenuChoice::Quit);
        assert_eq!(parse_choice("0"), MenuChoice::Invalid);
        assert_eq!(parse_choice("99"), MenuChoice::Invalid);
        assert_eq!(parse_choice("bogus-type"), MenuChoice::Invalid);
    }

    #[test]
    fn test_output_file_name() {
        let path = output_file(Path::new("out"), DiagramType::Sequence);
        assert_eq!(path, Path::new("out").join("sequence-diagram_diagram.png"));
    }

    #[test]
    fn test_menu_lists_every_type() {
        let mut out = Vec::new();
        print_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for (i, t) in DiagramType::ALL.iter().enumerate() {
            assert!(text.contains(&format!("{}. {} ({})", i + 1, t.label(), t.id())));
        }
    }

    #[tokio::test]
    async fn test_session_generates_and_quits() {
        let dir = tempdir().unwrap();
        let service = service(true, dir.path());
        let mut input = Cursor::new("1\nlogin flow\nq\n");
        let mut out = Vec::new();

        let generated = run_session(&service, &mut input, &mut out, dir.path(), Painter::plain())
            .await
            .unwrap();

        assert_eq!(generated, 1);
        assert!(dir.path().join("flowchart-diagram_diagram.png").exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Diagram saved to"));
        assert!(text.contains("```mermaid\nflowchart"));
    }

    #[tokio::test]
    async fn test_session_reports_render_failure() {
        let dir = tempdir().unwrap();
        let service = service(false, dir.path());
        let mut input = Cursor::new("pie-chart\npets\n");
        let mut out = Vec::new();

        let generated = run_session(&service, &mut input, &mut out, dir.path(), Painter::plain())
            .await
            .unwrap();

        assert_eq!(generated, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to generate diagram"));
        assert!(!text.contains("Diagram saved to"));
    }

    #[tokio::test]
    async fn test_session_rejects_invalid_choice_and_continues() {
        let dir = tempdir().unwrap();
        let service = service(true, dir.path());
        let mut input = Cursor::new("42\n12\nideas\n");
        let mut out = Vec::new();

        let generated = run_session(&service, &mut input, &mut out, dir.path(), Painter::plain())
            .await
            .unwrap();

        assert_eq!(generated, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Invalid choice: 42"));
        assert!(dir.path().join("mindmap_diagram.png").exists());
    }
}
