//! Basic integration tests for pickview.
//!
//! Tests that require a window (show()) are marked #[ignore]
//! and should be run manually with: cargo test -- --ignored

use pickview::App;

#[test]
fn test_app_starts_with_a_cloud_and_no_hover() {
    let app = App::new();
    assert!((50..=200).contains(&app.point_count()));
    assert_eq!(app.hovered_point(), None);
    assert_eq!(app.generation(), 1);
}

#[test]
fn test_regeneration_bumps_generation() {
    let mut app = App::new();
    let first = app.generation();
    app.regenerate_points();
    assert_eq!(app.generation(), first + 1);
    assert!((50..=200).contains(&app.point_count()));
}

#[test]
#[ignore = "opens a window; run manually with cargo test -- --ignored"]
fn test_show_viewer() {
    pickview::show();
}
