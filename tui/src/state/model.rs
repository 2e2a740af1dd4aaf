use regression::PredictedTable;

/// A single log entry shown in the event panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// Outcome of the last upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BatchStatus {
    /// Nothing uploaded yet.
    #[default]
    Idle,
    /// The upload was valid and has predictions.
    Loaded(PredictedTable),
    /// The upload was rejected; the message is shown in the batch panel.
    Failed(String),
}

impl BatchStatus {
    /// The predicted table, if the last upload succeeded.
    pub fn table(&self) -> Option<&PredictedTable> {
        match self {
            BatchStatus::Loaded(table) => Some(table),
            _ => None,
        }
    }
}
