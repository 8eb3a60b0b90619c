use giftwrap_core::{load_script, run_script, NotificationState};
use std::path::PathBuf;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scripts")
        .join(name)
}

#[test]
fn bundled_deselect_sample_shows_carrier_banner() {
    let script = load_script(&sample("deselect_with_carrier.json")).expect("load sample");
    let report = run_script(&script).expect("run sample");

    assert!(report.steps[0].selected);
    assert!(!report.steps[1].selected);
    assert!(report.steps[2].session_open);
    assert_eq!(
        report.final_notification(),
        NotificationState::AlternateCarrierAvailable
    );
}
