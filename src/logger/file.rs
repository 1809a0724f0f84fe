/// Daily log file output
///
/// Plain-text mirror of the console output. Disabled until
/// `init_file_logging` is called with a directory. The file is reopened
/// under the new name when the UTC date changes.
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

static FILE_WRITER: Lazy<Mutex<Option<DailyLogFile>>> = Lazy::new(|| Mutex::new(None));

struct DailyLogFile {
    dir: PathBuf,
    date: NaiveDate,
    writer: BufWriter<File>,
}

impl DailyLogFile {
    fn open(dir: &Path, date: NaiveDate) -> io::Result<Self> {
        let path = log_file_path(dir, date);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            date,
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, line: &str, today: NaiveDate) -> io::Result<()> {
        if today != self.date {
            self.writer.flush()?;
            *self = Self::open(&self.dir, today)?;
        }
        writeln!(self.writer, "{}", line)
    }
}

fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("aquasonda_{}.log", date.format("%Y-%m-%d")))
}

/// Open (or append to) today's log file in `dir`
pub fn init_file_logging(dir: &Path) {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {}", dir.display(), e);
        return;
    }

    let today = Utc::now().date_naive();
    match DailyLogFile::open(dir, today) {
        Ok(file) => {
            *FILE_WRITER.lock() = Some(file);
        }
        Err(e) => {
            eprintln!(
                "Failed to open log file {}: {}",
                log_file_path(dir, today).display(),
                e
            );
        }
    }
}

/// Append one line to the log file, no-op when file logging is off
pub fn write_to_file(line: &str) {
    let mut guard = FILE_WRITER.lock();
    if let Some(file) = guard.as_mut() {
        if file.write_line(line, Utc::now().date_naive()).is_err() {
            // Stop writing after the first failure
            *guard = None;
        }
    }
}

pub fn flush_file_logging() {
    if let Some(file) = FILE_WRITER.lock().as_mut() {
        let _ = file.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolls_over_to_new_file_at_date_change() {
        let dir = tempfile::tempdir().unwrap();
        let day_one = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let day_two = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let mut file = DailyLogFile::open(dir.path(), day_one).unwrap();
        file.write_line("before midnight", day_one).unwrap();
        file.write_line("after midnight", day_two).unwrap();
        file.writer.flush().unwrap();

        let first = fs::read_to_string(log_file_path(dir.path(), day_one)).unwrap();
        let second = fs::read_to_string(log_file_path(dir.path(), day_two)).unwrap();
        assert_eq!(first, "before midnight\n");
        assert_eq!(second, "after midnight\n");
    }
}
