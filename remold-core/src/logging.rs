use std::sync::Mutex;

/// Progress and warning sink. The engine reports everything through this
/// single method so hosts can redirect or silence output.
pub trait Log {
    fn log(&self, msg: &str);
}

/// Writes each message as a line on stderr.
pub struct StderrLog;

impl Log for StderrLog {
    fn log(&self, msg: &str) {
        eprintln!("{msg}");
    }
}

/// Discards all messages.
pub struct NullLog;

impl Log for NullLog {
    fn log(&self, _msg: &str) {}
}

/// Collects messages in memory, for hosts that render output themselves.
#[derive(Default)]
pub struct MemoryLog {
    messages: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Log for MemoryLog {
    fn log(&self, msg: &str) {
        self.messages.lock().unwrap().push(msg.to_string());
    }
}
