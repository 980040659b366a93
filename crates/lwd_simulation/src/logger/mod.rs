//! Глобальный logger симуляции
//!
//! Один sink на процесс. `create_headless_app` ставит `ConsoleLogger`,
//! хост может заменить его своим `LogPrinter` через `set_logger`.
//! Уровень ниже порога отсекается до форматирования строки.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static SINK: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Порядок вариантов = порядок важности (derive Ord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Куда уходят строки лога (консоль, редактор движка, файл)
pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, line: &str);
}

pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn print(&self, level: LogLevel, line: &str) {
        println!("[{}] {}", level.label(), line);
    }
}

/// Заменяет sink (хост подключает свой вывод)
pub fn set_logger(printer: Box<dyn LogPrinter>) {
    *SINK.lock().unwrap() = Some(printer);
}

pub fn set_log_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

/// Ставит `ConsoleLogger`, если хост ещё ничего не подключил
pub fn init_logger() {
    let mut sink = SINK.lock().unwrap();
    if sink.is_none() {
        *sink = Some(Box::new(ConsoleLogger));
    }
}

pub fn log(message: &str) {
    emit(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    emit(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    emit(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    emit(LogLevel::Error, message);
}

fn emit(level: LogLevel, message: &str) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }

    if let Some(printer) = SINK.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        printer.print(level, &format!("{} {}", timestamp, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Capture(Arc<Mutex<Vec<(LogLevel, String)>>>);

    impl LogPrinter for Capture {
        fn print(&self, level: LogLevel, line: &str) {
            self.0.lock().unwrap().push((level, line.to_string()));
        }
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.label(), "WARNING");
    }

    /// Единственный тест, трогающий глобальный sink и порог
    #[test]
    fn test_sink_filters_below_min_level() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        set_logger(Box::new(Capture(lines.clone())));
        set_log_level(LogLevel::Warning);

        log_info("barrel-log-check info");
        log_warning("barrel-log-check warning");
        log_error("barrel-log-check error");

        set_log_level(LogLevel::Debug);

        let captured: Vec<(LogLevel, String)> = lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, line)| line.contains("barrel-log-check"))
            .cloned()
            .collect();

        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].0, LogLevel::Warning);
        assert!(captured[0].1.ends_with(" barrel-log-check warning"));
        assert_eq!(captured[1].0, LogLevel::Error);
    }
}
