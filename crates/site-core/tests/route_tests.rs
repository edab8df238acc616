// Routing, cause lookup and viewport tiers.

use site_core::cause::{cause_for, cause_for_path, DEFAULT_CAUSE};
use site_core::route::NAV_LINKS;
use site_core::shapes::shape_spec;
use site_core::{ActiveScene, DetailParams, Route, Router, ShapeKind, ViewportClass, ViewportTracker};

#[test]
fn paths_resolve_to_routes_and_unknown_falls_back() {
    assert_eq!(Route::from_path("/"), Route::Rights);
    assert_eq!(Route::from_path("/activism"), Route::Activism);
    assert_eq!(Route::from_path("/charity"), Route::Charity);
    assert_eq!(Route::from_path("/about"), Route::About);
    assert_eq!(Route::from_path("/nope"), Route::Rights);
    assert_eq!(Route::from_path(""), Route::Rights);
    assert_eq!(Route::from_path("/about/"), Route::Rights);
}

#[test]
fn every_route_round_trips_through_its_path() {
    for r in Route::ALL {
        assert_eq!(Route::from_path(r.path()), r);
    }
}

#[test]
fn root_status_text_names_the_cause() {
    assert_eq!(Route::Rights.status_text(), "/rights");
    assert_eq!(Route::Activism.status_text(), "/activism");
    assert_eq!(Route::About.status_text(), "/about");
}

#[test]
fn each_route_mounts_one_scene() {
    assert_eq!(Route::Rights.scene(), ActiveScene::Shapes(ShapeKind::Knot));
    assert_eq!(Route::Activism.scene(), ActiveScene::Shapes(ShapeKind::Torus));
    assert_eq!(
        Route::Charity.scene(),
        ActiveScene::Shapes(ShapeKind::Dodecahedron)
    );
    assert_eq!(Route::About.scene(), ActiveScene::Aquarium);
    assert!(!Route::About.shows_shape_overlays());
    assert!(Route::Charity.shows_shape_overlays());
}

#[test]
fn nav_links_are_in_display_order() {
    let labels: Vec<&str> = NAV_LINKS.iter().map(|(_, l)| *l).collect();
    assert_eq!(labels, ["rights", "activism", "charity", "about"]);
    assert_eq!(NAV_LINKS[0].0, Route::Rights);
}

#[test]
fn aquarium_load_starts_only_on_first_entry() {
    let mut router = Router::default();
    assert_eq!(router.current(), Route::Rights);
    assert!(!router.aquarium_requested());

    let t = router.navigate(Route::About);
    assert!(t.changed());
    assert!(t.enter_aquarium);
    assert!(t.start_aquarium_load);
    assert!(!t.leave_aquarium);

    let t = router.navigate(Route::Charity);
    assert!(t.leave_aquarium);
    assert!(!t.enter_aquarium);
    assert_eq!(router.active_scene(), ActiveScene::Shapes(ShapeKind::Dodecahedron));

    let t = router.navigate(Route::About);
    assert!(t.enter_aquarium);
    assert!(!t.start_aquarium_load);
}

#[test]
fn navigating_to_the_current_route_is_a_no_op_transition() {
    let mut router = Router::new(Route::Activism);
    let t = router.navigate_path("/activism");
    assert!(!t.changed());
    assert!(!t.enter_aquarium && !t.leave_aquarium && !t.start_aquarium_load);
}

#[test]
fn landing_on_about_requests_the_aquarium() {
    let router = Router::new(Route::About);
    assert!(router.aquarium_requested());
    assert_eq!(router.active_scene(), ActiveScene::Aquarium);
}

#[test]
fn causes_follow_the_route_with_a_default() {
    assert_eq!(cause_for(Route::Rights).title, "Non-Human Rights");
    assert_eq!(cause_for(Route::Activism).title, "Activism");
    assert!(cause_for(Route::Activism).url.contains("nytimes.com"));
    assert_eq!(cause_for(Route::Charity).title, "Enduring Hearts");
    assert_eq!(*cause_for(Route::About), DEFAULT_CAUSE);
    assert_eq!(*cause_for_path("/whatever"), DEFAULT_CAUSE);
    for r in Route::ALL {
        assert!(cause_for(r).url.starts_with("https://"));
    }
}

#[test]
fn viewport_breakpoint_splits_mobile_and_desktop() {
    assert_eq!(ViewportClass::from_width(320.0), ViewportClass::Mobile);
    assert_eq!(ViewportClass::from_width(767.9), ViewportClass::Mobile);
    assert_eq!(ViewportClass::from_width(768.0), ViewportClass::Desktop);
    assert!(ViewportClass::Mobile.is_mobile());
    assert_eq!(ViewportClass::Desktop.detail(), DetailParams::HIGH);
    assert_eq!(ViewportClass::Mobile.detail(), DetailParams::LOW);
}

#[test]
fn tracker_reports_only_flips() {
    let mut t = ViewportTracker::new(1200.0);
    assert_eq!(t.class(), ViewportClass::Desktop);
    assert_eq!(t.observe(1000.0), None);
    assert_eq!(t.observe(500.0), Some(ViewportClass::Mobile));
    assert_eq!(t.observe(400.0), None);
    assert_eq!(t.observe(900.0), Some(ViewportClass::Desktop));
}

#[test]
fn low_tier_is_cheaper_for_every_shape() {
    let (hi, lo) = (DetailParams::HIGH, DetailParams::LOW);
    for kind in [ShapeKind::Knot, ShapeKind::Torus, ShapeKind::Dodecahedron] {
        let a = shape_spec(kind, &hi);
        let b = shape_spec(kind, &lo);
        assert!(b.cost() < a.cost(), "{kind:?} not cheaper on mobile");
        assert!(a.material.backside);
    }
    assert!(lo.shadow_frames < hi.shadow_frames);
    assert!(lo.label_font_size < hi.label_font_size);
}

#[test]
fn watermark_size_is_css_em() {
    assert_eq!(DetailParams::HIGH.watermark_font_css(), "33.5em");
    assert_eq!(DetailParams::LOW.watermark_font_css(), "16em");
}
