//! Size-capped exception log with numbered backups (`api_exceptions.txt.1`, `.2`, ...).

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogConfig {
    pub path: PathBuf,
    /// The live file is rotated before a write would push it past this size.
    pub max_bytes: u64,
    /// Rotated files kept; `0` truncates in place.
    pub backups: usize,
}

pub struct RotatingFile {
    config: ErrorLogConfig,
    file: File,
    written: u64,
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RotatingFile {
    pub fn open(config: ErrorLogConfig) -> io::Result<Self> {
        if let Some(dir) = config.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let file = open_append(&config.path)?;
        let written = file.metadata()?.len();
        Ok(RotatingFile { config, file, written })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let path = &self.config.path;
        if self.config.backups == 0 {
            self.file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
        } else {
            let oldest = backup_path(path, self.config.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.config.backups).rev() {
                let from = backup_path(path, index);
                if from.exists() {
                    fs::rename(&from, backup_path(path, index + 1))?;
                }
            }
            fs::rename(path, backup_path(path, 1))?;
            self.file = open_append(path)?;
        }
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.config.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
