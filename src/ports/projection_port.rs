//! Projection output port trait.

use crate::domain::error::CashflowError;
use crate::domain::projection::Projection;
use std::io::Write;
use std::path::Path;

/// Port for writing a projection table.
pub trait ProjectionPort {
    fn write_to(&self, projection: &Projection, out: &mut dyn Write) -> Result<(), CashflowError>;

    /// Default implementation: creates the file and delegates to `write_to`.
    fn write(&self, projection: &Projection, output_path: &Path) -> Result<(), CashflowError> {
        let mut file = std::fs::File::create(output_path).map_err(|e| CashflowError::Output {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        self.write_to(projection, &mut file)
    }
}
