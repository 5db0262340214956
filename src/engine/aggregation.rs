//! Per-source resolution and cross-source combination.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use serde_json::Value;

use super::catalog::{combinator_for, INVERTER_SENSORS};
use super::context::ProcessingContext;
use super::resolver::resolve;
use crate::model::{json_number, Combinator, SensorValue, SourceRecord};

/// Timestamp layouts GivTCP has used without an explicit offset. Read as local time.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Resolves every mapped sensor against each inverter, records the
/// per-source values and stores the combined value in the context.
pub fn aggregate(mut context: ProcessingContext, inverters: &[SourceRecord]) -> ProcessingContext {
    for sensor in INVERTER_SENSORS {
        let Some(mapping) = sensor.mapping else {
            continue;
        };

        let resolved: Vec<Option<&Value>> = inverters
            .iter()
            .map(|record| resolve(&record.data, &mapping))
            .collect();

        for (snapshot, value) in context.sources.iter_mut().zip(&resolved) {
            if let Some(value) = value {
                snapshot.values.insert(sensor.id, (*value).clone());
            }
        }

        let combinator = combinator_for(sensor.id, context.regime);
        if let Some(value) = combine(combinator, &resolved) {
            context.set(sensor.id, value);
        }
    }

    context
}

/// Combines one sensor's per-source values, indexed by source sort order.
pub fn combine(combinator: Combinator, values: &[Option<&Value>]) -> Option<SensorValue> {
    match combinator {
        Combinator::Addition => {
            let mut numbers = numbers(values).peekable();
            numbers.peek()?;
            Some(SensorValue::Number(numbers.sum()))
        }
        Combinator::Any => values
            .first()
            .copied()
            .flatten()
            .cloned()
            .map(SensorValue::Json),
        Combinator::Average => {
            let (sum, count) = numbers(values).fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            // no values averages to NaN, which the emission rule treats as unset
            Some(SensorValue::Number(sum / count as f64))
        }
        Combinator::EarliestDate => earliest_date(values),
        Combinator::All | Combinator::Ignore => None,
    }
}

fn numbers<'a>(values: &'a [Option<&'a Value>]) -> impl Iterator<Item = f64> + 'a {
    values.iter().flatten().filter_map(|value| json_number(value))
}

fn earliest_date(values: &[Option<&Value>]) -> Option<SensorValue> {
    let present: Vec<&Value> = values.iter().flatten().copied().collect();
    let first = *present.first()?;

    let parsed: Option<Vec<DateTime<FixedOffset>>> = present.iter().map(|value| parse_timestamp(value)).collect();
    match parsed {
        Some(timestamps) => timestamps.into_iter().min().map(SensorValue::Timestamp),
        None => {
            tracing::warn!(value = %first, "Unparseable last updated time");
            Some(SensorValue::Text(
                first
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| first.to_string()),
            ))
        }
    }
}

pub fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    value.as_str().and_then(parse_timestamp_text)
}

/// Parses RFC 3339, falling back to offset-less layouts in local time.
pub fn parse_timestamp_text(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }

    NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(text, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
            .map(DateTime::<FixedOffset>::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SensorId, Topology};
    use serde_json::json;

    fn values(raw: &[Value]) -> Vec<Option<&Value>> {
        raw.iter().map(Some).collect()
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_combinators_over_three_sources() {
            let raw = [json!(10), json!(20), json!(30)];
            let values = values(&raw);

            assert_eq!(combine(Combinator::Addition, &values), Some(SensorValue::Number(60.0)));
            assert_eq!(combine(Combinator::Average, &values), Some(SensorValue::Number(20.0)));
            assert_eq!(combine(Combinator::Any, &values), Some(SensorValue::Json(json!(10))));
            assert_eq!(combine(Combinator::All, &values), None);
            assert_eq!(combine(Combinator::Ignore, &values), None);
        }

        #[test]
        fn test_average_skips_sources_without_the_value() {
            let reported = json!(40);
            assert_eq!(
                combine(Combinator::Average, &[Some(&reported), None]),
                Some(SensorValue::Number(40.0))
            );
        }

        #[test]
        fn test_addition_accepts_numeric_text() {
            let raw = [json!("100.5"), json!(200)];
            assert_eq!(
                combine(Combinator::Addition, &values(&raw)),
                Some(SensorValue::Number(300.5))
            );
        }

        #[test]
        fn test_earliest_date_picks_minimum() {
            let raw = [
                json!("2024-06-15T12:00:30+00:00"),
                json!("2024-06-15T12:00:10+00:00"),
                json!("2024-06-15T13:00:20+01:00"),
            ];
            let expected = DateTime::parse_from_rfc3339("2024-06-15T12:00:10+00:00").unwrap();
            assert_eq!(
                combine(Combinator::EarliestDate, &values(&raw)),
                Some(SensorValue::Timestamp(expected))
            );
        }

        #[test]
        fn test_parses_offsetless_timestamps() {
            assert!(parse_timestamp_text("2024-06-15 12:00:10.123456").is_some());
            assert!(parse_timestamp_text("2024-06-15T12:00:10").is_some());
        }

        #[test]
        fn test_aggregate_records_per_source_values() {
            let inverters = vec![
                SourceRecord::new("Inverter 1", 0, json!({"Power": {"Power": {"PV_Power": 1000, "SOC": 40}}})),
                SourceRecord::new("Inverter 2", 1, json!({"Power": {"Power": {"PV_Power": 500, "SOC": 60}}})),
            ];
            let topology = Topology {
                single_phase: true,
                single_inverter: false,
            };

            let context = aggregate(ProcessingContext::new(topology, &inverters), &inverters);

            assert_eq!(context.number(SensorId::PvPower), Some(1500.0));
            assert_eq!(context.number(SensorId::BatteryStateOfCharge), Some(50.0));
            assert_eq!(context.source_value(1, SensorId::PvPower), Some(&json!(500)));
            // ignored for this regime, derived later
            assert_eq!(context.get(SensorId::LoadPower), None);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_addition_without_numbers_is_absent() {
            assert_eq!(combine(Combinator::Addition, &[None, None]), None);
            let raw = [json!({"a": 1})];
            assert_eq!(combine(Combinator::Addition, &values(&raw)), None);
        }

        #[test]
        fn test_average_without_numbers_is_nan() {
            match combine(Combinator::Average, &[None]) {
                Some(SensorValue::Number(n)) => assert!(n.is_nan()),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn test_any_with_missing_first_source() {
            let second = json!(20);
            assert_eq!(combine(Combinator::Any, &[None, Some(&second)]), None);
        }

        #[test]
        fn test_earliest_date_keeps_unparseable_text() {
            let raw = [json!("2024-06-15T12:00:10+00:00"), json!("not a date")];
            assert_eq!(
                combine(Combinator::EarliestDate, &values(&raw)),
                Some(SensorValue::Text("2024-06-15T12:00:10+00:00".to_string()))
            );
            assert_eq!(combine(Combinator::EarliestDate, &[None]), None);
        }
    }
}
