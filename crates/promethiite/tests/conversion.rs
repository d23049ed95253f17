//! Conversion behaviour against an in-memory sink.

use promethiite::pipeline::{self, Summary};
use promethiite::transform::normalize_prefix;
use promethiite::Error;
use promethiite_graphite::{encode_line, Metric, MetricSink};

/// Records what a real client would put on the wire.
struct RecordingSink {
    prefix: String,
    metrics: Vec<Metric>,
    lines: Vec<String>,
    flushed: bool,
}

impl RecordingSink {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            metrics: Vec::new(),
            lines: Vec::new(),
            flushed: false,
        }
    }

    fn names(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                let path = line.split(' ').next().unwrap_or_default();
                path.split(';').next().unwrap_or_default().to_string()
            })
            .collect()
    }
}

impl MetricSink for RecordingSink {
    async fn send(&mut self, metric: Metric) -> Result<(), promethiite_graphite::Error> {
        self.lines.push(encode_line(&self.prefix, &metric, 0)?);
        self.metrics.push(metric);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), promethiite_graphite::Error> {
        self.flushed = true;
        Ok(())
    }
}

const NODE_EXPORTER: &str = r#"
# HELP node_cpu_seconds_total Seconds the CPUs spent in each mode.
# TYPE node_cpu_seconds_total counter
node_cpu_seconds_total{cpu="0",mode="idle"} 10293.44
node_cpu_seconds_total{cpu="0",mode="user"} 812.5
# HELP node_filesystem_avail_bytes Filesystem space available.
# TYPE node_filesystem_avail_bytes gauge
node_filesystem_avail_bytes{device="/dev/sda1",fstype="ext4",mountpoint="/mnt/My Documents"} 1.2e+10
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_bucket{le="0.1"} 3
http_request_duration_seconds_bucket{le="+Inf"} 5
http_request_duration_seconds_sum 0.73
http_request_duration_seconds_count 5
go_goroutines 41
"#;

#[tokio::test]
async fn reference_example() {
    let mut sink = RecordingSink::new("app");
    pipeline::run(
        "http_requests_total{method=\"GET\",status=\"200 OK\"} 42\n",
        &mut sink,
    )
    .await
    .unwrap();

    assert_eq!(sink.metrics.len(), 1);
    let metric = &sink.metrics[0];
    assert_eq!(metric.value, 42.0);
    assert_eq!(metric.tags.len(), 2);
    assert_eq!(metric.tags["method"], "GET");
    assert_eq!(metric.tags["status"], "200_OK");
    assert_eq!(sink.names(), vec!["app.http_requests_total"]);
    assert!(sink.flushed);
}

#[tokio::test]
async fn one_metric_per_sample_in_order() {
    let mut sink = RecordingSink::new("host");
    let summary = pipeline::run(NODE_EXPORTER, &mut sink).await.unwrap();

    assert_eq!(summary, Summary { families: 4, metrics: 8 });
    assert_eq!(
        sink.names(),
        vec![
            "host.node_cpu_seconds_total",
            "host.node_cpu_seconds_total",
            "host.node_filesystem_avail_bytes",
            "host.http_request_duration_seconds_bucket",
            "host.http_request_duration_seconds_bucket",
            "host.http_request_duration_seconds_sum",
            "host.http_request_duration_seconds_count",
            "host.go_goroutines",
        ]
    );
}

#[tokio::test]
async fn dotted_prefix_becomes_one_segment() {
    let mut sink = RecordingSink::new("prod.eu.web01");
    pipeline::run("up 1\n", &mut sink).await.unwrap();
    assert_eq!(sink.names(), vec!["prod_eu_web01.up"]);
}

#[tokio::test]
async fn label_keys_kept_and_values_sanitized() {
    let mut sink = RecordingSink::new("host");
    pipeline::run(NODE_EXPORTER, &mut sink).await.unwrap();

    let fs = &sink.metrics[2];
    assert_eq!(
        fs.tags.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["device", "fstype", "mountpoint"]
    );
    assert_eq!(fs.tags["mountpoint"], "/mnt/My_Documents");
    assert_eq!(
        sink.lines[2],
        "host.node_filesystem_avail_bytes;device=/dev/sda1;fstype=ext4;mountpoint=/mnt/My_Documents 12000000000.0 0\n"
    );
}

#[tokio::test]
async fn conversion_is_repeatable() {
    let mut first = RecordingSink::new("app");
    let mut second = RecordingSink::new("app");
    pipeline::run(NODE_EXPORTER, &mut first).await.unwrap();
    pipeline::run(NODE_EXPORTER, &mut second).await.unwrap();

    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.lines, second.lines);
}

#[tokio::test]
async fn sample_timestamps_are_forwarded_in_seconds() {
    let mut sink = RecordingSink::new("app");
    pipeline::run("jobs_done 3 1395066363000\n", &mut sink)
        .await
        .unwrap();
    assert_eq!(sink.lines, vec!["app.jobs_done 3.0 1395066363\n"]);
}

#[tokio::test]
async fn malformed_input_sends_nothing() {
    let text = "good_one 1\ngood_two 2\nhttp_requests_total{method=\"GET\"}\n";
    let mut sink = RecordingSink::new("app");

    let err = pipeline::run(text, &mut sink).await.unwrap_err();
    match &err {
        Error::Parse { error, .. } => assert_eq!(error.line(text), 3),
        other => panic!("expected parse error, got {:?}", other),
    }
    assert!(sink.metrics.is_empty());
    assert!(!sink.flushed);
}

#[tokio::test]
async fn awkward_label_values_are_forwarded() {
    let text = "good 1\nreq{path=\"/a;b\",mode=\"~raw\",job=\"\"} 2\nother 3\n";
    let mut sink = RecordingSink::new("app");

    let summary = pipeline::run(text, &mut sink).await.unwrap();
    assert_eq!(summary.metrics, 3);
    assert_eq!(
        sink.lines,
        vec![
            "app.good 1.0 0\n",
            "app.req;job=_;mode=_raw;path=/a_b 2.0 0\n",
            "app.other 3.0 0\n",
        ]
    );
}
