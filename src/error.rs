use thiserror::Error;

/// Status line shown after a successful import.
pub const STATUS_LOADED: &str = "Fichier chargé avec succès !";

/// Errors raised while importing or converting precipitation data.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural problem with the input file: unknown delimiter, empty file,
    /// or a mandatory column is missing.
    #[error("invalid file format: {0}")]
    Format(String),
    /// A date outside the representable range (serial conversion, user-typed bounds).
    #[error("date out of range: {0}")]
    DateRange(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// One-line message for the status surface.
    pub fn status_message(&self) -> String {
        match self {
            Error::Format(_) => {
                "Fichier invalide. Vérifiez les colonnes et le séparateur.".to_string()
            }
            Error::DateRange(_) => "Date invalide. Veuillez réessayer.".to_string(),
            other => format!("Erreur: {}", other),
        }
    }
}
