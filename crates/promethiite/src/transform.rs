//! Prometheus sample to Graphite metric mapping.

use promethiite_exposition::{Labels, Sample};
use promethiite_graphite::{is_reserved, Metric, Tags};

/// Replace dots in a prefix so it stays a single path segment.
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.replace('.', "_")
}

/// Copy labels into tags.
///
/// Whitespace, `;` and `~` in values become `_`, and an empty value becomes
/// a single `_`, so every value is accepted on the wire. Keys are unchanged.
pub fn sanitize_tags(labels: &Labels) -> Tags {
    labels
        .iter()
        .map(|(name, value)| (name.clone(), sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: &str) -> String {
    if value.is_empty() {
        "_".to_string()
    } else {
        value.replace(is_reserved, "_")
    }
}

/// Convert one sample into the metric sent to Graphite.
///
/// The sample timestamp is carried over in whole seconds; samples without
/// one are stamped by the sink at send time.
pub fn to_graphite(sample: &Sample) -> Metric {
    let metric =
        Metric::new(sample.name.clone(), sample.value).with_tags(sanitize_tags(&sample.labels));
    match sample.timestamp_ms {
        Some(millis) => metric.with_timestamp(millis_to_secs(millis)),
        None => metric,
    }
}

/// Milliseconds to the nearest whole second.
fn millis_to_secs(millis: i64) -> i64 {
    millis.saturating_add(500).div_euclid(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promethiite_exposition::Span;

    fn sample(name: &str, labels: &[(&str, &str)], value: f64) -> Sample {
        Sample {
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value,
            timestamp_ms: None,
            span: Span::default(),
        }
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("app"), "app");
        assert_eq!(normalize_prefix("prod.web01.node"), "prod_web01_node");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn test_reference_example() {
        let metric = to_graphite(&sample(
            "http_requests_total",
            &[("method", "GET"), ("status", "200 OK")],
            42.0,
        ));

        assert_eq!(metric.name, "http_requests_total");
        assert_eq!(metric.value, 42.0);
        assert_eq!(metric.tags.get("method").map(String::as_str), Some("GET"));
        assert_eq!(metric.tags.get("status").map(String::as_str), Some("200_OK"));
        assert_eq!(metric.timestamp, None);
    }

    #[test]
    fn test_every_space_is_replaced_and_keys_kept() {
        let s = sample("x", &[("with space", "a b  c "), ("plain", "v")], 1.0);
        let tags = sanitize_tags(&s.labels);

        assert_eq!(
            tags.keys().collect::<Vec<_>>(),
            s.labels.keys().collect::<Vec<_>>()
        );
        assert_eq!(tags["with space"], "a_b__c_");
        assert_eq!(tags["plain"], "v");
    }

    #[test]
    fn test_reserved_characters_are_replaced() {
        let s = sample(
            "req",
            &[("path", "/a;b"), ("msg", "tab\there\nnext"), ("mode", "~x")],
            2.0,
        );
        let metric = to_graphite(&s);

        assert_eq!(metric.tags["path"], "/a_b");
        assert_eq!(metric.tags["msg"], "tab_here_next");
        assert_eq!(metric.tags["mode"], "_x");
        assert!(promethiite_graphite::validate(&metric).is_ok());
    }

    #[test]
    fn test_empty_label_keeps_its_key() {
        let s = sample("up", &[("job", ""), ("instance", "a:9100")], 1.0);
        let metric = to_graphite(&s);

        assert_eq!(
            metric.tags.keys().collect::<Vec<_>>(),
            s.labels.keys().collect::<Vec<_>>()
        );
        assert_eq!(metric.tags["job"], "_");
        assert_eq!(metric.tags["instance"], "a:9100");
        assert!(promethiite_graphite::validate(&metric).is_ok());
    }

    #[test]
    fn test_timestamp_conversion() {
        let mut s = sample("x", &[], 1.0);
        s.timestamp_ms = Some(1395066363000);
        assert_eq!(to_graphite(&s).timestamp, Some(1395066363));

        s.timestamp_ms = Some(1395066363600);
        assert_eq!(to_graphite(&s).timestamp, Some(1395066364));

        s.timestamp_ms = Some(1395066363499);
        assert_eq!(to_graphite(&s).timestamp, Some(1395066363));

        s.timestamp_ms = Some(-3982045);
        assert_eq!(to_graphite(&s).timestamp, Some(-3982));

        s.timestamp_ms = Some(i64::MAX);
        assert_eq!(to_graphite(&s).timestamp, Some(i64::MAX / 1000));
    }
}
