use chrono::{Days, NaiveDate};
use climate_eto::{
    eto_frame, fused_frame, ClimateEngine, EngineConfig, EtoError, EtoFlags, EtoMethod,
    FusionMethod, LocationContext, LocationJob, MemoryAdapter, RawDailyRecord, SourceAdapter,
    StandardVariable,
};
use std::sync::Arc;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
}

fn brasilia() -> LocationContext {
    LocationContext::builder()
        .latitude(-15.78)
        .longitude(-47.93)
        .elevation(1172.0)
        .build()
        .unwrap()
}

fn nasa(offset: u64) -> RawDailyRecord {
    RawDailyRecord::new("nasa_power", start() + Days::new(offset), -15.78, -47.93)
        .with("T2M_MAX", Some(29.0 + offset as f64 * 0.2))
        .with("T2M_MIN", Some(15.0))
        .with("T2M", Some(22.0))
        .with("RH2M", Some(45.0))
        .with("WS2M", Some(2.4))
        .with("ALLSKY_SFC_SW_DWN", Some(21.0))
        .with("CLOUD_AMT", Some(12.0))
}

fn openmeteo(offset: u64) -> RawDailyRecord {
    RawDailyRecord::new("openmeteo_archive", start() + Days::new(offset), -15.80, -47.90)
        .with("temperature_2m_max", Some(30.5))
        .with("temperature_2m_min", Some(14.2))
        .with("temperature_2m_mean", Some(22.4))
        .with("relative_humidity_2m_mean", Some(41.0))
        .with("wind_speed_10m_mean", Some(3.3))
        .with("shortwave_radiation_sum", Some(22.1))
        .with("et0_fao_evapotranspiration", Some(5.1))
}

fn mixed_week() -> Vec<RawDailyRecord> {
    (0..7).flat_map(|d| [nasa(d), openmeteo(d)]).collect()
}

#[test]
fn pipeline_is_idempotent_and_order_independent() {
    let engine = ClimateEngine::builder().build().unwrap();
    let records = mixed_week();

    let first = engine.run(&brasilia(), &records);
    let second = engine.run(&brasilia(), &records);
    assert_eq!(first, second);

    let mut reversed = records.clone();
    reversed.reverse();
    let third = engine.run(&brasilia(), &reversed);
    assert_eq!(first.fused, third.fused);
    assert_eq!(first.days, third.days);
}

#[test]
fn overlapping_sources_are_fused_and_flagged() {
    let engine = ClimateEngine::builder().build().unwrap();
    let output = engine.run(&brasilia(), &mixed_week());

    assert_eq!(output.days.len(), 7);
    // CLOUD_AMT, once per NASA record.
    assert_eq!(output.unmapped_fields, 7);

    let day = &output.fused[0];
    let tmax = day.get(StandardVariable::TempMax).unwrap();
    assert_eq!(tmax.method, FusionMethod::WeightedMean);
    // Open-Meteo (weight 1) outweighs NASA (weight 0.5).
    let value = tmax.value.unwrap();
    assert!((value - (29.0 * 0.5 + 30.5) / 1.5).abs() < 1e-9);
    assert_eq!(tmax.sources[0].as_str(), "openmeteo_archive");

    // Provider ETo is carried along but never used as an input.
    assert_eq!(day.method(StandardVariable::ProviderEto), FusionMethod::SingleSource);

    for result in output.results() {
        assert_eq!(result.method, EtoMethod::PenmanMonteithFao56);
        assert!(result.flags.contains(EtoFlags::FUSED));
        assert!(result.eto_mm_per_day > 3.0 && result.eto_mm_per_day < 8.0);
    }
}

#[test]
fn short_gap_is_interpolated_long_gap_falls_back() {
    let engine = ClimateEngine::builder().build().unwrap();

    let short: Vec<RawDailyRecord> = (0..5)
        .map(|d| {
            let r = nasa(d);
            if d == 2 { r.with("RH2M", None) } else { r }
        })
        .collect();
    let output = engine.run(&brasilia(), &short);
    assert_eq!(
        output.fused[2].method(StandardVariable::HumidityMean),
        FusionMethod::Interpolated
    );
    let day2 = output.days[2].result().unwrap();
    assert_eq!(day2.method, EtoMethod::PenmanMonteithFao56);
    assert!(day2.flags.contains(EtoFlags::INTERPOLATED));

    let long: Vec<RawDailyRecord> = (0..6)
        .map(|d| {
            let r = nasa(d);
            if (1..=3).contains(&d) { r.with("RH2M", None) } else { r }
        })
        .collect();
    let output = engine.run(&brasilia(), &long);
    for d in 1..=3 {
        assert_eq!(
            output.fused[d].method(StandardVariable::HumidityMean),
            FusionMethod::Unavailable
        );
        let result = output.days[d].result().unwrap();
        assert_eq!(result.method, EtoMethod::HargreavesSamani);
        assert_eq!(result.flag_names(), vec!["missing_humidity"]);
    }
}

#[test]
fn out_of_range_value_is_replaced_by_the_other_source() {
    let engine = ClimateEngine::builder().build().unwrap();
    let records = [nasa(0).with("T2M_MAX", Some(80.0)), openmeteo(0)];
    let output = engine.run(&brasilia(), &records);

    let tmax = output.fused[0].get(StandardVariable::TempMax).unwrap();
    assert_eq!(tmax.method, FusionMethod::SingleSource);
    assert_eq!(tmax.value, Some(30.5));
}

#[test]
fn fused_max_below_min_fails_the_day() {
    let engine = ClimateEngine::builder().build().unwrap();
    let records = [
        RawDailyRecord::new("openmeteo_archive", start(), -15.78, -47.93)
            .with("temperature_2m_max", Some(20.0))
            .with("temperature_2m_min", Some(18.0)),
        RawDailyRecord::new("openmeteo_forecast", start(), -15.78, -47.93)
            .with("temperature_2m_max", Some(12.0)),
    ];
    let output = engine.run(&brasilia(), &records);

    let day = &output.fused[0];
    assert_eq!(day.method(StandardVariable::TempMax), FusionMethod::Unavailable);
    assert_eq!(day.method(StandardVariable::TempMin), FusionMethod::Unavailable);
    assert!(output.days[0].result().is_none());
    assert!(matches!(
        output.days[0].error(),
        Some(EtoError::InsufficientData { .. })
    ));
}

#[test]
fn days_without_temperatures_fail_alone() {
    let engine = ClimateEngine::builder().build().unwrap();
    let records = [
        nasa(0),
        RawDailyRecord::new("nasa_power", start() + Days::new(1), -15.78, -47.93)
            .with("RH2M", Some(50.0)),
        nasa(5),
    ];
    let output = engine.run(&brasilia(), &records);

    assert_eq!(output.days.len(), 6);
    let failures: Vec<_> = output.failures().map(|(date, _)| date).collect();
    assert_eq!(
        failures,
        (1..=4).map(|d| start() + Days::new(d)).collect::<Vec<_>>()
    );
    assert!(output
        .failures()
        .all(|(_, e)| matches!(e, EtoError::InsufficientData { .. })));
    assert!(output.days[0].result().is_some());
    assert!(output.days[5].result().is_some());

    let frame = eto_frame(&output.days).unwrap();
    assert_eq!(frame.height(), 6);
    let fused = fused_frame(&output.fused).unwrap();
    assert_eq!(fused.height(), 6);
}

#[test]
fn sources_and_elevation_lookup_feed_the_pipeline() {
    let config = EngineConfig {
        max_source_distance_km: Some(25.0),
        ..EngineConfig::default()
    };
    let engine = ClimateEngine::builder().config(config).build().unwrap();
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(MemoryAdapter::new("nasa_power", (0..3).map(nasa).collect())),
        Arc::new(MemoryAdapter::new("openmeteo_archive", (0..3).map(openmeteo).collect())),
    ];
    let bare = LocationContext::builder()
        .latitude(-15.78)
        .longitude(-47.93)
        .build()
        .unwrap();
    let lookup = |_lat: f64, _lon: f64| Some(1172.0);

    let (output, errors) = engine.run_with_sources(
        &bare,
        &adapters,
        &lookup,
        start(),
        start() + Days::new(2),
    );
    assert!(errors.is_empty());
    assert_eq!(output.location.elevation, Some(1172.0));
    assert_eq!(output.rejected_records, 0);
    assert_eq!(output.results().count(), 3);
}

#[tokio::test]
async fn batch_keeps_job_order() {
    let engine = ClimateEngine::builder().build().unwrap();
    let jobs: Vec<LocationJob> = [-15.78, -22.9, -3.1]
        .into_iter()
        .map(|lat| LocationJob {
            location: LocationContext::builder()
                .latitude(lat)
                .longitude(-47.93)
                .elevation(800.0)
                .build()
                .unwrap(),
            records: mixed_week(),
        })
        .collect();

    let outputs = engine.run_batch(jobs.clone()).await.unwrap();
    assert_eq!(outputs.len(), 3);
    for (job, output) in jobs.iter().zip(&outputs) {
        assert_eq!(output.location, job.location);
        assert_eq!(*output, engine.run(&job.location, &job.records));
    }
}
