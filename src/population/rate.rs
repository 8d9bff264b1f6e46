use log::info;

use crate::{error::ConsistencyError, population::{ElderlyRate, ReducedPopulation}};

/// Pair an elderly reduction with an all-ages reduction and compute each building's elderly rate.
///
/// Both collections must list the same buildings with identical geometry, in
/// the same order. Nothing is reordered or matched up. A rate is
/// `elderly / combined`, or 0 when the combined population is not positive.
pub fn elderly_rates(elderly: &[ReducedPopulation], combined: &[ReducedPopulation]) -> Result<Vec<ElderlyRate>, ConsistencyError> {
    if elderly.len() != combined.len() {
        return Err(ConsistencyError::FeatureCountMismatch { elderly: elderly.len(), combined: combined.len() });
    }

    let rates = elderly.iter().zip(combined).enumerate()
        .map(|(index, (elderly, combined))| {
            if elderly.geometry != combined.geometry {
                return Err(ConsistencyError::GeometryMismatch { index });
            }
            let elderly_rate = if combined.allocated_population > 0.0 {
                elderly.allocated_population / combined.allocated_population
            } else {
                0.0
            };
            Ok(ElderlyRate { population: elderly.clone(), elderly_rate })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("[rate] computed elderly rates for {} buildings", rates.len());
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    fn reduced(x: f64, population: f64) -> ReducedPopulation {
        ReducedPopulation {
            geometry: MultiPolygon(vec![polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 0.0)]]),
            building_levels: 10.0,
            floor_area: 500.0,
            planning_area: "BEDOK".into(),
            subzone: "BEDOK NORTH".into(),
            allocated_population: population,
        }
    }

    #[test]
    fn rate_is_elderly_share() {
        let rates = elderly_rates(
            &[reduced(0.0, 5.0), reduced(2.0, 0.0), reduced(4.0, 3.0)],
            &[reduced(0.0, 20.0), reduced(2.0, 0.0), reduced(4.0, 3.0)],
        ).unwrap();

        assert_eq!(rates.iter().map(|r| r.elderly_rate).collect::<Vec<_>>(), vec![0.25, 0.0, 1.0]);
        assert_eq!(rates[0].population, reduced(0.0, 5.0));
        assert!(rates.iter().all(|r| (0.0..=1.0).contains(&r.elderly_rate)));
    }

    #[test]
    fn feature_count_mismatch_is_fatal() {
        let err = elderly_rates(
            &[reduced(0.0, 1.0), reduced(2.0, 1.0), reduced(4.0, 1.0)],
            &[reduced(0.0, 2.0), reduced(2.0, 2.0), reduced(4.0, 2.0), reduced(6.0, 2.0)],
        ).unwrap_err();
        assert_eq!(err, ConsistencyError::FeatureCountMismatch { elderly: 3, combined: 4 });
    }

    #[test]
    fn geometry_mismatch_is_fatal() {
        let err = elderly_rates(
            &[reduced(0.0, 1.0), reduced(2.0, 1.0)],
            &[reduced(0.0, 2.0), reduced(3.0, 2.0)],
        ).unwrap_err();
        assert_eq!(err, ConsistencyError::GeometryMismatch { index: 1 });
        assert!(err.to_string().contains("geometry"));
    }
}
