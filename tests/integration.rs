use feedback_popup::{BrowserDetector, BrowserFlags};
use fixtures::fixtures;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DetectionFixture {
    user_agent: String,
    /// Expected flags; families left out of the fixture default to false.
    #[serde(default)]
    browsers: BrowserFlags,
}

#[fixtures(["tests/fixtures/*.yml"])]
#[test]
fn detection_fixtures(path: &std::path::Path) {
    let detector = BrowserDetector::new().expect("failed to build BrowserDetector");
    let content = std::fs::read_to_string(path).unwrap();
    let fixtures: Vec<DetectionFixture> = serde_yaml::from_str(&content).unwrap();
    assert!(!fixtures.is_empty(), "empty fixture file: {:?}", path);

    for f in &fixtures {
        let flags = detector.detect(&f.user_agent);
        assert_eq!(
            flags, f.browsers,
            "flag mismatch for UA: {}",
            f.user_agent
        );
    }
}
