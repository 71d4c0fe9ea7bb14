//! Output module
//!
//! Writes the filtered text either to the console, framed by marker lines,
//! or to a file through a buffered writer.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for file writing (1MB)
const BUFFER_SIZE: usize = 1024 * 1024;

const OUTPUT_HEADER: &str = "==== FILTERED TEXT OUTPUT ====";
const OUTPUT_FOOTER: &str = "==============================";

/// Buffered file writer
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create (or truncate) the output file
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_output_dir(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::with_capacity(BUFFER_SIZE, file),
            path,
            bytes_written: 0,
        })
    }

    /// Write text followed by a newline
    pub fn write_line(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", text)?;
        self.bytes_written += text.len() as u64 + 1;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Where the filtered text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Console, optionally framed by marker lines
    Stdout { framed: bool },
    File(PathBuf),
}

impl OutputTarget {
    pub fn new(path: Option<PathBuf>, quiet: bool) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdout { framed: !quiet },
        }
    }

    /// Emit the filtered text, returning the number of bytes written
    pub fn emit(&self, text: &str) -> anyhow::Result<u64> {
        match self {
            Self::Stdout { framed } => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                write_framed(&mut out, text, *framed)
            }
            Self::File(path) => {
                let mut writer = OutputWriter::new(path.clone())?;
                writer.write_line(text)?;
                writer.flush()?;
                Ok(writer.bytes_written())
            }
        }
    }
}

fn write_framed<W: Write>(out: &mut W, text: &str, framed: bool) -> anyhow::Result<u64> {
    if framed {
        writeln!(out, "{}", OUTPUT_HEADER)?;
    }
    writeln!(out, "{}", text)?;
    if framed {
        writeln!(out, "{}", OUTPUT_FOOTER)?;
    }
    out.flush()?;

    Ok(text.len() as u64 + 1)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("result.txt");

        let mut writer = OutputWriter::new(path.clone()).unwrap();
        writer.write_line("Hello world").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.bytes_written(), 12);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world\n");
    }

    #[test]
    fn test_file_target() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        let target = OutputTarget::new(Some(path.clone()), false);
        target.emit("kept words").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept words\n");
    }

    #[test]
    fn test_framed_output() {
        let mut buf = Vec::new();
        write_framed(&mut buf, "a b", true).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "==== FILTERED TEXT OUTPUT ====\na b\n==============================\n"
        );
    }

    #[test]
    fn test_quiet_is_unframed() {
        assert_eq!(OutputTarget::new(None, true), OutputTarget::Stdout { framed: false });

        let mut buf = Vec::new();
        write_framed(&mut buf, "a b", false).unwrap();
        assert_eq!(buf, b"a b\n");
    }
}
