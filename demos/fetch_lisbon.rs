use aidweather::{
    AggSpec, AidWeather, AidWeatherConfig, AidWeatherError, ColumnNaming, Frequency, Location,
    ParameterSet, Threshold, TimeRange,
};

fn main() -> Result<(), AidWeatherError> {
    // Set RUST_LOG=info (or debug) to see the request and cache messages
    env_logger::init();

    let config = AidWeatherConfig::default();
    let client = AidWeather::builder()
        .config(&config)
        .location(Location::new("Lisbon", 38.7223, -9.1393)?)
        .range(TimeRange::between("2020-01-01", "2020-06-30")?)
        .parameters(ParameterSet::new(["T2M", "T2M_MAX", "RH2M", "PRECTOTCORR"])?)
        .build()?;

    println!("Requesting {}", client.request_url());
    let table = client.get().naming(ColumnNaming::Labels).call()?;
    println!("{}", table.frame().head(Some(5)));

    // Served from the cache from here on
    let warm_days = client
        .filter()
        .naming(ColumnNaming::Codes)
        .thresholds(vec![Threshold::new("T2M_MAX", 20.0, 45.0)])
        .call()?;
    println!("{} days reached 20°C", warm_days.height());

    let monthly = client
        .aggregate()
        .naming(ColumnNaming::Codes)
        .frequency(Frequency::MonthEnd)
        .agg(AggSpec::parse_per_column([
            ("T2M", "mean"),
            ("T2M_MAX", "max"),
            ("PRECTOTCORR", "sum"),
        ])?)
        .call()?;
    println!("{}", monthly.frame());

    Ok(())
}
