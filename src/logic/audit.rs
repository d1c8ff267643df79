use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Debug,
    Info,
    Warn,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Debug => "DEBUG",
            AuditLevel::Info => "INFO",
            AuditLevel::Warn => "WARN",
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub level: AuditLevel,
    pub message: String,
}

/// Receiver for everything the engine would otherwise log.
///
/// Passed into each evaluation so the engine itself never touches global
/// logging state.
pub trait AuditSink {
    fn record(&mut self, level: AuditLevel, message: String);

    fn debug(&mut self, message: String) {
        self.record(AuditLevel::Debug, message);
    }

    fn info(&mut self, message: String) {
        self.record(AuditLevel::Info, message);
    }

    fn warn(&mut self, message: String) {
        self.record(AuditLevel::Warn, message);
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }
}

#[cfg(test)]
impl AuditLog {
    pub fn warnings(&self) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter().filter(|e| e.level == AuditLevel::Warn)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.message.contains(needle))
    }
}

impl AuditSink for AuditLog {
    fn record(&mut self, level: AuditLevel, message: String) {
        self.events.push(AuditEvent { level, message });
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&mut self, level: AuditLevel, message: String) {
        match level {
            AuditLevel::Debug => tracing::debug!(target: "snowops::audit", "{}", message),
            AuditLevel::Info => tracing::info!(target: "snowops::audit", "{}", message),
            AuditLevel::Warn => tracing::warn!(target: "snowops::audit", "{}", message),
        }
    }
}

/// Sends every event to two sinks.
pub struct Tee<'a, A: AuditSink, B: AuditSink> {
    first: &'a mut A,
    second: &'a mut B,
}

impl<'a, A: AuditSink, B: AuditSink> Tee<'a, A, B> {
    pub fn new(first: &'a mut A, second: &'a mut B) -> Self {
        Self { first, second }
    }
}

impl<A: AuditSink, B: AuditSink> AuditSink for Tee<'_, A, B> {
    fn record(&mut self, level: AuditLevel, message: String) {
        self.first.record(level, message.clone());
        self.second.record(level, message);
    }
}
