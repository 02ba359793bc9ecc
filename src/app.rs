//! Per-source output loop coordinating readers, formatters, and the pager.
//!
//! Sources are processed one at a time, start to finish, on a single thread.
//! Each source gets its own reader and output session; nothing is shared
//! between them. A cancelled pager silently ends the current source, and a
//! mid-stream read fault is logged and skipped so the remaining sources still
//! get processed (the exit code reflects the failure at the end).

use crate::cli::Args;
use crate::error::Result;
use crate::highlight::Syntax;
use crate::pager::{should_page, PageFlow, Pager, PagerMode, TerminalPrompt};
use crate::reader::LineReader;
use crate::table;
use crate::theme::Theme;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Where a source's formatted lines go: through a pager, or straight to the
/// sink. Both paths share the line-number prefix format and the cancellation
/// contract (the direct path just never cancels).
pub enum Output {
    Paged(Pager),
    Direct {
        sink: Box<dyn Write>,
        line_numbers: bool,
    },
}

impl Output {
    /// Emit one line, optionally tagged with its source line number.
    pub fn line(&mut self, text: &str, line_number: Option<u64>) -> Result<PageFlow> {
        match self {
            Output::Paged(pager) => match line_number {
                Some(number) => pager.output_line_number(text, number),
                None => pager.output_line(text),
            },
            Output::Direct { sink, line_numbers } => {
                if let (Some(number), true) = (line_number, *line_numbers) {
                    write!(sink, "{number:>6}  ")?;
                }
                sink.write_all(text.as_bytes())?;
                sink.write_all(b"\n")?;
                Ok(PageFlow::Continue)
            }
        }
    }

    pub fn finish(&mut self) -> Result<()> {
        match self {
            Output::Paged(pager) => pager.finalize(),
            Output::Direct { sink, .. } => {
                sink.flush()?;
                Ok(())
            }
        }
    }
}

/// The application driver: applies the CLI flags to each source in turn.
pub struct App {
    args: Args,
    mode: PagerMode,
    theme: Theme,
}

impl App {
    pub fn new(args: Args) -> Self {
        let mode = args.pager_mode();
        let theme = if args.theme {
            Theme::vim()
        } else {
            Theme::default()
        };
        Self { args, mode, theme }
    }

    /// Process every source and return the process exit code. Faults on one
    /// source are logged and do not stop the remaining ones.
    pub fn run(&self) -> i32 {
        let is_tty = io::stdout().is_terminal();
        let mut failed = false;

        for path in self.args.sources() {
            let mut reader = LineReader::open(&path);
            let mut output = self.make_output(&reader, is_tty);

            if let Err(err) = self.process_source(&path, &mut reader, &mut output) {
                log::error!("{err}");
                eprintln!("Error processing {}: {err}", path.display());
                failed = true;
            }
            if let Err(err) = output.finish() {
                log::error!("flush failed for {}: {err}", path.display());
                failed = true;
            }
        }

        if failed {
            1
        } else {
            0
        }
    }

    fn make_output(&self, reader: &LineReader, is_tty: bool) -> Output {
        if should_page(self.mode, reader.info().category, is_tty) {
            Output::Paged(Pager::new(
                Box::new(io::stdout()),
                Box::new(TerminalPrompt::new()),
                None,
                self.args.line_numbers,
            ))
        } else {
            Output::Direct {
                sink: Box::new(io::stdout()),
                line_numbers: self.args.line_numbers,
            }
        }
    }

    /// Route one source through the formatter the flags select.
    ///
    /// Pager cancellation ends the source early but is not an error; a real
    /// read fault propagates to the caller with the path attached.
    pub fn process_source(
        &self,
        path: &Path,
        reader: &mut LineReader,
        output: &mut Output,
    ) -> Result<()> {
        let syntax = self.resolve_syntax(path);

        if self.args.rainbow_csv {
            self.emit_csv(reader, output, table::format_rainbow)
        } else if self.args.align_csv || syntax == Some(Syntax::Csv) {
            self.emit_csv(reader, output, table::format_aligned)
        } else if self.args.align_md_table || syntax == Some(Syntax::Markdown) {
            self.emit_markdown(reader, output)
        } else {
            self.emit_lines(reader, output, syntax)
        }
    }

    fn resolve_syntax(&self, path: &Path) -> Option<Syntax> {
        if let Some(name) = &self.args.syntax {
            let syntax = Syntax::from_name(name);
            if syntax.is_none() {
                log::warn!("unknown syntax name: {name}");
            }
            syntax
        } else {
            Syntax::detect(path)
        }
    }

    /// Regular line-by-line output with optional highlighting.
    fn emit_lines(
        &self,
        reader: &mut LineReader,
        output: &mut Output,
        syntax: Option<Syntax>,
    ) -> Result<()> {
        loop {
            let result = reader.read_line()?;
            if result.is_eof {
                return Ok(());
            }

            let text = match syntax {
                Some(syntax) if syntax != Syntax::Csv => self
                    .theme
                    .render_line(&syntax.highlight_line(&result.text)),
                _ => result.text,
            };

            if output.line(&text, Some(result.line_number))? == PageFlow::Cancelled {
                return Ok(());
            }
        }
    }

    /// Collect the source as CSV and emit it as a formatted grid. A source
    /// whose first line does not look like CSV falls back to plain output,
    /// which matters for piped input routed here by a flag.
    fn emit_csv(
        &self,
        reader: &mut LineReader,
        output: &mut Output,
        format: fn(&table::CsvTable) -> Vec<String>,
    ) -> Result<()> {
        match table::collect_table(reader, 0)? {
            table::CsvOutcome::Empty => Ok(()),
            table::CsvOutcome::NotCsv(first) => {
                if output.line(&first.text, Some(first.line_number))? == PageFlow::Cancelled {
                    return Ok(());
                }
                self.emit_lines(reader, output, None)
            }
            table::CsvOutcome::Table(csv) => {
                for line in format(&csv) {
                    if output.line(&line, None)? == PageFlow::Cancelled {
                        return Ok(());
                    }
                }
                Ok(())
            }
        }
    }

    /// Markdown mode: contiguous table runs are re-aligned, everything else
    /// is highlighted line by line. Tables change the line structure, so this
    /// mode never prints line numbers.
    fn emit_markdown(&self, reader: &mut LineReader, output: &mut Output) -> Result<()> {
        let mut lines = Vec::new();
        loop {
            let result = reader.read_line()?;
            if result.is_eof {
                break;
            }
            lines.push(result.text);
        }

        let mut i = 0;
        while i < lines.len() {
            if table::looks_like_md_table(&lines[i]) && !table::is_md_separator(&lines[i]) {
                // Collect the contiguous table run, dropping separator rows;
                // the formatter regenerates its own.
                let start = i;
                while i < lines.len() && table::looks_like_md_table(&lines[i]) {
                    i += 1;
                }
                let run: Vec<String> = lines[start..i]
                    .iter()
                    .filter(|line| !table::is_md_separator(line))
                    .cloned()
                    .collect();

                for line in table::format_md_table(&run) {
                    if output.line(&line, None)? == PageFlow::Cancelled {
                        return Ok(());
                    }
                }
            } else {
                let rendered = self
                    .theme
                    .render_line(&Syntax::Markdown.highlight_line(&lines[i]));
                if output.line(&rendered, None)? == PageFlow::Cancelled {
                    return Ok(());
                }
                i += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run_source(args: Args, content: &[u8]) -> String {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();

        let app = App::new(args);
        let sink = SharedSink::default();
        let mut output = Output::Direct {
            sink: Box::new(sink.clone()),
            line_numbers: app.args.line_numbers,
        };
        let mut reader = LineReader::open(file.path());
        app.process_source(file.path(), &mut reader, &mut output)
            .unwrap();
        sink.contents()
    }

    #[test]
    fn test_plain_output_passes_lines_through() {
        let output = run_source(Args::default(), b"hello\nworld\n");
        assert_eq!(output, "hello\nworld\n");
    }

    #[test]
    fn test_line_numbers_prefixed() {
        let args = Args {
            line_numbers: true,
            ..Args::default()
        };
        let output = run_source(args, b"alpha\nbeta\n");
        assert_eq!(output, "     1  alpha\n     2  beta\n");
    }

    #[test]
    fn test_align_csv_renders_grid() {
        let args = Args {
            align_csv: true,
            ..Args::default()
        };
        let output = run_source(args, b"a,b\ncc,d\n");
        assert!(output.starts_with("+----+---+\n"));
        assert!(output.contains("| a  | b |\n"));
        assert!(output.contains("| cc | d |\n"));
    }

    #[test]
    fn test_rainbow_csv_uses_256_colors() {
        let args = Args {
            rainbow_csv: true,
            ..Args::default()
        };
        let output = run_source(args, b"x,y\n");
        assert!(output.contains("\x1b[38;5;196m"));
    }

    #[test]
    fn test_markdown_mode_aligns_tables_between_prose() {
        let args = Args {
            align_md_table: true,
            ..Args::default()
        };
        let content = b"intro text\n| a | bbb |\n|---|---|\n| cc | d |\nafter\n";
        let output = run_source(args, content);

        assert!(output.contains("intro text\n"));
        assert!(output.contains("| a  | bbb |\n"));
        assert!(output.contains("|----|-----|\n"));
        assert!(output.contains("| cc | d   |\n"));
        assert!(output.contains("after\n"));
    }

    #[test]
    fn test_explicit_syntax_overrides_extension() {
        let args = Args {
            syntax: Some("py".to_string()),
            ..Args::default()
        };
        // Highlighted output wraps the keyword in escapes
        let output = run_source(args, b"def main():\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("def"));
    }

    #[test]
    fn test_align_csv_falls_back_to_plain_for_non_csv_input() {
        let args = Args {
            align_csv: true,
            ..Args::default()
        };
        let output = run_source(args, b"no commas on the first line\nsecond line\n");
        assert_eq!(output, "no commas on the first line\nsecond line\n");
        assert!(!output.contains('+'));
    }

    #[test]
    fn test_empty_csv_source_emits_nothing() {
        let args = Args {
            align_csv: true,
            ..Args::default()
        };
        let output = run_source(args, b"");
        assert!(output.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_exit_code_reflects_faulting_source() {
        // Reading a directory opens fine but faults on the first read, which
        // must flip the exit code without stopping the remaining sources.
        let dir = tempfile::tempdir().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"fine\n").unwrap();
        file.flush().unwrap();

        let faulty = Args {
            files: vec![dir.path().to_path_buf(), file.path().to_path_buf()],
            no_pager: true,
            ..Args::default()
        };
        assert_eq!(App::new(faulty).run(), 1);

        let healthy = Args {
            files: vec![file.path().to_path_buf()],
            no_pager: true,
            ..Args::default()
        };
        assert_eq!(App::new(healthy).run(), 0);
    }

    #[test]
    fn test_nonexistent_source_is_not_an_error() {
        let app = App::new(Args::default());
        let sink = SharedSink::default();
        let mut output = Output::Direct {
            sink: Box::new(sink.clone()),
            line_numbers: false,
        };
        let path = Path::new("/no/such/rcat-input.txt");
        let mut reader = LineReader::open(path);
        app.process_source(path, &mut reader, &mut output).unwrap();
        assert!(sink.contents().is_empty());
    }
}
