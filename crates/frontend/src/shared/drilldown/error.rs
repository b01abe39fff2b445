use thiserror::Error;

/// Ошибки детализации
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrillError {
    /// Transport failure or non-2xx status
    #[error("Ошибка сети: {0}")]
    Network(String),

    /// Body is not JSON or lacks expected fields
    #[error("Некорректный ответ сервера: {0}")]
    Malformed(String),

    /// A level fetch is still outstanding
    #[error("Предыдущий запрос ещё выполняется")]
    Busy,

    #[error("Достигнут последний уровень детализации")]
    TerminalLevel,

    #[error("Значение '{0}' отсутствует на текущем уровне")]
    UnknownLabel(String),

    #[error("Детализация не открыта")]
    NotOpen,
}

impl DrillError {
    /// Errors worth an inline banner; the rest are ignored clicks
    pub fn is_user_visible(&self) -> bool {
        matches!(self, DrillError::Network(_) | DrillError::Malformed(_))
    }
}
