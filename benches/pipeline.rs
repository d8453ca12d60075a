use chrono::{Days, NaiveDate};
use climate_eto::{ClimateEngine, LocationContext, RawDailyRecord};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn records(days: u64) -> Vec<RawDailyRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut records = Vec::new();
    for offset in 0..days {
        let date = start + Days::new(offset);
        let wobble = (offset % 7) as f64 * 0.3;
        records.push(
            RawDailyRecord::new("nasa_power", date, -15.78, -47.93)
                .with("T2M_MAX", Some(29.0 + wobble))
                .with("T2M_MIN", Some(17.0 - wobble))
                .with("T2M", Some(23.0))
                .with("RH2M", Some(58.0 + wobble))
                .with("WS2M", Some(2.2))
                .with("ALLSKY_SFC_SW_DWN", Some(19.0 + wobble)),
        );
        records.push(
            RawDailyRecord::new("openmeteo_archive", date, -15.78, -47.93)
                .with("temperature_2m_max", Some(30.0 - wobble))
                .with("temperature_2m_min", Some(16.5))
                .with("relative_humidity_2m_mean", Some(61.0))
                .with("wind_speed_10m_mean", Some(3.1))
                .with("shortwave_radiation_sum", Some(20.5)),
        );
    }
    records
}

fn bench_pipeline(c: &mut Criterion) {
    let engine = ClimateEngine::builder().build().unwrap();
    let location = LocationContext::builder()
        .latitude(-15.78)
        .longitude(-47.93)
        .elevation(1172.0)
        .build()
        .unwrap();
    let year = records(365);

    c.bench_function("pipeline_one_year_two_sources", |b| {
        b.iter(|| engine.run(black_box(&location), black_box(&year)))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
