use std::{
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    thread,
    time::Duration,
};

use chrono::{format::DelayedFormat, DateTime, Local};
use concat_string::concat_string;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 所有 Logger 的寫入通道，結束程式前用來 flush
static WRITERS: Lazy<Mutex<Vec<Sender<Record>>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 等待寫入執行緒完成 flush 的上限
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// 單次批次寫入的緩衝大小
const BATCH_SIZE: usize = 4096;

/// A named file logger. Lines are handed to a background thread that appends them
/// to `log/<name>_<date>.log`.
pub struct Logger {
    writer: Sender<Record>,
}

enum Record {
    Line(LogMessage),
    Flush(Sender<()>),
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let log_path = Self::get_log_path(log_name);
        let (tx, rx) = unbounded::<Record>();

        if let Ok(mut writers) = WRITERS.lock() {
            writers.push(tx.clone());
        }

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let file = log_path.and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|why| {
                        error_console(format!("Failed to open log file {:?}: {}", path, why))
                    })
                    .ok()
            });

            write_loop(rx, file.map(BufWriter::new));
        });

        Logger { writer: tx }
    }

    pub fn info(&self, log: String) {
        self.send(log::Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(log::Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(log::Level::Error, log);
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(Record::Line(LogMessage::new(level, msg))) {
            error_console(why.to_string());
        }
    }

    fn get_log_path(name: &str) -> Option<PathBuf> {
        let path = Path::new("log");

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(concat_string!(
            name,
            "_",
            Local::now().format("%Y-%m-%d").to_string(),
            ".log"
        ));

        Some(log_path)
    }
}

fn write_loop(rx: Receiver<Record>, mut writer: Option<BufWriter<File>>) {
    let mut line = String::with_capacity(BATCH_SIZE);

    while let Ok(received) = rx.recv() {
        match received {
            Record::Line(message) => {
                if writeln!(
                    &mut line,
                    "{} {} {}",
                    message.created_at.format("%F %X%.6f"),
                    message.level,
                    message.msg
                )
                .is_err()
                {
                    continue;
                }

                if rx.is_empty() || line.len() >= BATCH_SIZE {
                    write_batch(&mut writer, &mut line);
                }
            }
            Record::Flush(ack) => {
                write_batch(&mut writer, &mut line);
                let _ = ack.send(());
            }
        }
    }

    write_batch(&mut writer, &mut line);
}

fn write_batch(writer: &mut Option<BufWriter<File>>, line: &mut String) {
    if line.is_empty() {
        return;
    }

    match writer {
        Some(w) => {
            if w.write_all(line.as_bytes()).is_err() || w.flush().is_err() {
                print!("{}", line);
            }
        }
        // 沒有可寫的檔案時改輸出到 console
        None => print!("{}", line),
    }

    line.clear();
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

/// Blocks until every logger's writer thread has written what was queued so far.
///
/// Called before the process exits; the writer threads are detached and would
/// otherwise be killed with lines still buffered.
pub fn flush() {
    let writers = match WRITERS.lock() {
        Ok(writers) => writers.clone(),
        Err(_) => return,
    };

    for writer in writers {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        if writer.send(Record::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv_timeout(FLUSH_TIMEOUT);
        }
    }
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_file_logger_writes_after_flush() {
        let logger = Logger::new("logging_test");
        let marker = format!("marker-{}", Local::now().timestamp_nanos_opt().unwrap_or(0));
        logger.info(marker.clone());
        flush();

        let path = Logger::get_log_path("logging_test").unwrap();
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        assert!(content.contains(&marker));
        assert!(content.contains("INFO"));
    }

    #[test]
    fn test_log_message_new() {
        let message = LogMessage::new(log::Level::Error, "boom".to_string());
        assert_eq!(message.level, log::Level::Error);
        assert_eq!(message.msg, "boom");
    }
}
