use rvis_core::models::LocationRecord;
use rvis_core::traits::RecordSink;
use rvis_store::{CsvSink, read_records};

fn record(county: &str, name: &str, phone: &str, lat: Option<f64>) -> LocationRecord {
    LocationRecord {
        county: county.into(),
        name: name.into(),
        phone: phone.into(),
        address: String::new(),
        lat,
        lng: lat.map(|v| v + 100.0),
    }
}

#[test]
fn pages_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rvis_all_data.csv");

    let page1 = vec![
        record("臺北市", "仁愛醫院", "02-27093600", Some(25.037)),
        record("臺北市", "Clinic, Annex", "", None),
    ];
    // Numeric-looking text must stay text.
    let page2 = vec![record("", "00123", "0800", Some(-0.5))];

    {
        let mut sink = CsvSink::create(&path).unwrap();
        sink.append(&page1).unwrap();
        sink.append(&page2).unwrap();
        assert_eq!(sink.written(), 3);
    }

    let read = read_records(&path).unwrap();
    assert_eq!(read, [page1, page2].concat());
    assert_eq!(read[2].name, "00123");
    assert_eq!(read[1].lat, None);
}

#[test]
fn create_truncates_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale\ncontent\n").unwrap();

    CsvSink::create(&path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "county,name,phone,address,lat,lng\n"
    );
    assert!(read_records(&path).unwrap().is_empty());
}

#[test]
fn flushed_pages_survive_without_explicit_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.csv");

    let mut sink = CsvSink::create(&path).unwrap();
    sink.append(&[record("Tainan", "A", "06", Some(23.0))]).unwrap();

    // Sink still open: the batch must already be on disk.
    let read = read_records(&path).unwrap();
    assert_eq!(read.len(), 1);
    drop(sink);
}

#[test]
fn missing_file_is_a_sink_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_records(dir.path().join("absent.csv")).unwrap_err();
    assert!(err.to_string().starts_with("Sink error"));
}

#[test]
fn create_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvSink::create(dir.path().join("no/such/dir/out.csv"));
    assert!(result.is_err());
}
