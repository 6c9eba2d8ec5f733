use aidweather::{
    aggregate, AggFunction, AggSpec, Frequency, ParameterSet, RawObservationMap, TableReshaper,
    TimeRange,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;

fn ten_years(codes: &[&str], range: &TimeRange) -> RawObservationMap {
    codes
        .iter()
        .enumerate()
        .map(|(position, code)| {
            let series: BTreeMap<String, Option<f64>> = range
                .days()
                .enumerate()
                .map(|(i, day)| {
                    let value = if i % 97 == 0 { -999.0 } else { (i + position) as f64 * 0.1 };
                    (day.format("%Y%m%d").to_string(), Some(value))
                })
                .collect();
            (code.to_string(), series)
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let codes = ["T2M", "T2M_MAX", "T2M_MIN", "RH2M", "PRECTOTCORR", "WS10M"];
    let range = TimeRange::between("2010-01-01", "2019-12-31").unwrap();
    let raw = ten_years(&codes, &range);
    let reshaper = TableReshaper::new(ParameterSet::new(codes).unwrap())
        .with_fill_value(Some(-999.0))
        .with_window(range);
    let table = reshaper.reshape(&raw).unwrap();
    let mean = AggSpec::Uniform(AggFunction::Mean);

    c.bench_function("reshape", |b| b.iter(|| reshaper.reshape(black_box(&raw))));
    c.bench_function("aggregate_monthly", |b| {
        b.iter(|| aggregate(black_box(&table), Frequency::MonthEnd, &mean))
    });
    c.bench_function("aggregate_weekly", |b| {
        b.iter(|| aggregate(black_box(&table), "W-MON".parse().unwrap(), &mean))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
