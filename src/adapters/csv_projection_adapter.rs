//! CSV projection writer.

use crate::domain::error::CashflowError;
use crate::domain::projection::Projection;
use crate::ports::projection_port::ProjectionPort;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct CsvProjectionAdapter;

impl CsvProjectionAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectionPort for CsvProjectionAdapter {
    fn write_to(&self, projection: &Projection, out: &mut dyn Write) -> Result<(), CashflowError> {
        let mut wtr = csv::Writer::from_writer(out);

        wtr.write_record(projection.header())
            .map_err(|e| CashflowError::Output {
                reason: format!("CSV write error: {}", e),
            })?;
        for row in projection.rows() {
            wtr.write_record(row.record())
                .map_err(|e| CashflowError::Output {
                    reason: format!("CSV write error: {}", e),
                })?;
        }
        wtr.flush().map_err(|e| CashflowError::Output {
            reason: format!("CSV flush error: {}", e),
        })?;
        Ok(())
    }
}
