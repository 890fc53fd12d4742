/// Failures talking to the hosted data service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// Short message safe to show to a user.
    pub fn user_message(&self) -> &'static str {
        match self {
            BackendError::Network(_) => "Não foi possível contactar o servidor. Verifique sua conexão.",
            BackendError::Status { status, .. } if *status == 401 || *status == 403 => {
                "Acesso aos dados negado. Faça login novamente."
            }
            BackendError::Status { .. } | BackendError::Decode(_) => {
                "Falha ao carregar dados. Tente novamente mais tarde."
            }
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }
}
