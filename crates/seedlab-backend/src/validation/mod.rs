//! Checks run before any analysis or catalog data is submitted.
//!
//! A failed check is reported to the user as a warning toast and no request
//! is sent.

pub mod forms;
pub mod percentages;
pub mod repetitions;

/// A rule violated by data typed in one of the forms. The display text is
/// shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "El total de la repetición ({total}) debe estar entre {min} y {max} semillas (±5% de {expected})."
    )]
    OutOfTolerance {
        total: i64,
        expected: u32,
        min: i64,
        max: i64,
    },
    #[error("El campo \"{field}\" no puede ser negativo.")]
    NegativeCount { field: &'static str },
    #[error("Los conteos son demasiado grandes.")]
    CountTooLarge,
    #[error("Hay repeticiones registradas con conteos negativos.")]
    NegativeRecordedCount,
    #[error("La repetición no tiene semillas contadas.")]
    EmptyRepetition,
    #[error("Ya se registraron las {expected} repeticiones esperadas.")]
    RepetitionLimitReached { expected: u32 },
    #[error(
        "No se pueden esperar {requested} repeticiones: ya existen {existing}. Se mantiene en {clamped}."
    )]
    ExpectedBelowExisting {
        requested: u32,
        existing: u32,
        clamped: u32,
    },
    #[error("Se requieren al menos {clamped} repeticiones.")]
    ExpectedBelowMinimum { requested: u32, clamped: u32 },
    #[error("Los porcentajes deben sumar 100 (suman {total}).")]
    PercentagesDoNotAddUp { total: i64 },
    #[error("No hay repeticiones registradas para calcular porcentajes.")]
    NoRepetitions,
    #[error("El campo \"{field}\" es obligatorio.")]
    Required { field: &'static str },
    #[error("La cantidad debe ser mayor que cero.")]
    NonPositiveQuantity,
    #[error("El análisis ya fue finalizado y no admite cambios.")]
    NotEditable,
}

impl ValidationError {
    /// Value the form field should be reset to, for rejections that come
    /// with one.
    pub fn clamped_value(&self) -> Option<u32> {
        match self {
            ValidationError::ExpectedBelowExisting { clamped, .. }
            | ValidationError::ExpectedBelowMinimum { clamped, .. } => Some(*clamped),
            _ => None,
        }
    }
}
