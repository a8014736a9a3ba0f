//! Results output formatting (CSV).

use std::io::Write;

use crate::curve::TransferCurve;
use crate::error::Result;

/// Write a transfer curve as CSV, one row per sweep point.
///
/// Format:
/// ```csv
/// vin,id,vout
/// 0,0,1.8
/// 0.01,0,1.8
/// ```
///
/// Unresolved points are written with `NaN` in the `id` and `vout` columns.
pub fn write_csv<W: Write>(curve: &TransferCurve, writer: &mut W) -> Result<()> {
    writeln!(writer, "vin,id,vout")?;
    for point in curve {
        writeln!(writer, "{},{},{}", point.vin, point.id, point.vout)?;
    }
    writer.flush()?;
    Ok(())
}
