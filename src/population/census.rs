use anyhow::{Context, Result, ensure};
use log::{debug, info};
use polars::prelude::*;

use crate::population::CensusRow;

/// Census columns: planning area, subzone, age bracket and population count.
const CENSUS_COLUMNS: [&str; 4] = ["PA", "SZ", "AG", "Pop"];

/// Sum population counts by (planning area, subzone, age bracket).
///
/// Rows with a missing key, or a missing, non-numeric or negative count, are
/// dropped. The result is sorted by key, one row per distinct key.
pub fn aggregate_census(df: &DataFrame) -> Result<Vec<CensusRow>> {
    for name in CENSUS_COLUMNS {
        ensure!(df.column(name).is_ok(), "[census] census table is missing column {name:?}");
    }

    let valid = df.clone().lazy()
        .select([
            col("PA").cast(DataType::String),
            col("SZ").cast(DataType::String),
            col("AG").cast(DataType::String),
            col("Pop").cast(DataType::Int64),
        ])
        .filter(
            col("PA").is_not_null()
                .and(col("SZ").is_not_null())
                .and(col("AG").is_not_null())
                .and(col("Pop").is_not_null())
                .and(col("Pop").gt_eq(lit(0)))
        )
        .collect()
        .context("[census] Failed to clean census table")?;
    debug!("[census] dropped {} of {} census rows with a missing key or invalid count", df.height() - valid.height(), df.height());

    let aggregated = valid.lazy()
        .group_by([col("PA"), col("SZ"), col("AG")])
        .agg([col("Pop").sum()])
        .sort(["PA", "SZ", "AG"], SortMultipleOptions::default())
        .collect()
        .context("[census] Failed to aggregate census table")?;

    let rows = aggregated.column("PA")?.str()?.into_no_null_iter()
        .zip(aggregated.column("SZ")?.str()?.into_no_null_iter())
        .zip(aggregated.column("AG")?.str()?.into_no_null_iter())
        .zip(aggregated.column("Pop")?.i64()?.into_no_null_iter())
        .map(|(((planning_area, subzone), age_bracket), population)| CensusRow {
            planning_area: planning_area.to_string(),
            subzone: subzone.to_string(),
            age_bracket: age_bracket.to_string(),
            population_count: population.max(0) as u64,
        })
        .collect::<Vec<_>>();

    info!("[census] aggregated {} census rows into {} keys", df.height(), rows.len());
    Ok(rows)
}

/// Census rows as a DataFrame with the input column names.
pub(crate) fn census_to_dataframe(rows: &[CensusRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::new("PA".into(), rows.iter().map(|row| row.planning_area.as_str()).collect::<Vec<_>>()),
        Column::new("SZ".into(), rows.iter().map(|row| row.subzone.as_str()).collect::<Vec<_>>()),
        Column::new("AG".into(), rows.iter().map(|row| row.age_bracket.as_str()).collect::<Vec<_>>()),
        Column::new("Pop".into(), rows.iter().map(|row| row.population_count as i64).collect::<Vec<_>>()),
    ])?)
}
