use aidweather::{
    AidWeather, AidWeatherConfig, AidWeatherError, Location, OverlayOptions, OverlayTreatment,
    ParameterSet, SecondaryTable, Smoothing, TimeRange,
};
use polars::prelude::*;

/// Plant height measured on three plants every ten days, leaf counts and stage notes.
fn field_observations() -> Result<DataFrame, AidWeatherError> {
    let mut dates = Vec::new();
    let mut height = Vec::new();
    let mut leaves = Vec::new();
    let mut stage = Vec::new();
    for visit in 0..12u32 {
        let date = format!("2020-{:02}-{:02}", 4 + visit / 3, 1 + (visit % 3) * 10);
        for plant in 0..3 {
            dates.push(date.clone());
            height.push(5.0 + 4.5 * visit as f64 + plant as f64 * 0.8);
            leaves.push(i64::from(2 + visit + plant));
            stage.push(if visit < 6 { "vegetative" } else { "flowering" });
        }
    }
    Ok(DataFrame::new(vec![
        Column::new("date".into(), dates),
        Column::new("height_cm".into(), height),
        Column::new("leaves".into(), leaves),
        Column::new("stage".into(), stage),
    ])?)
}

fn main() -> Result<(), AidWeatherError> {
    env_logger::init();

    let config = AidWeatherConfig::default();
    let client = AidWeather::builder()
        .config(&config)
        .location(Location::new("Evora", 38.5714, -7.9135)?)
        .range(TimeRange::between("2020-03-15", "2020-08-15")?)
        .parameters(ParameterSet::new(["T2M", "PRECTOTCORR"])?)
        .build()?;

    let secondary = SecondaryTable::new(field_observations()?)?;
    let options = OverlayOptions::builder()
        .parameters(vec!["T2M".to_string()])
        .primary_smoothing(Smoothing::centered(7))
        .count_window(2)
        .date_range(TimeRange::between("2020-04-01", "2020-07-31")?)
        .build();
    let overlay = client.overlay().secondary(&secondary).options(options).call()?;

    for series in &overlay.secondary {
        match &series.treatment {
            OverlayTreatment::Band { bands, trend } => println!(
                "{}: {} dated bands, {:.3} per day",
                series.column,
                bands.len(),
                trend.slope
            ),
            OverlayTreatment::MovingAverage { raw, window, .. } => println!(
                "{}: {} points with a {}-point moving average",
                series.column,
                raw.len(),
                window
            ),
            OverlayTreatment::Markers(markers) => {
                println!("{}: {} markers", series.column, markers.len())
            }
        }
    }

    if let Some(t2m) = overlay.primary_column("T2M") {
        let smoothed: Vec<f64> = t2m.values.iter().flatten().copied().collect();
        println!("T2M: {} smoothed days", smoothed.len());
    }
    Ok(())
}
