// Procedural geometry, motion and shadow scheduling.

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use site_core::aquarium::{self, AQUARIUM_CAMERA_POSITION};
use site_core::bubbles::{BubbleField, BUBBLES};
use site_core::easing::Damped;
use site_core::float::{FloatMotion, FloatParams};
use site_core::geometry::{dodecahedron, floor_plane, sphere, torus, torus_knot};
use site_core::lighting::{RandomizedLight, ShadowAccumulator};
use site_core::orbit::OrbitControls;
use site_core::rig::{rig_target, CameraRig};
use site_core::{bloom_level_spreads, DetailParams, MeshData, BLOOM_LEVELS};
use std::f32::consts::FRAC_PI_2;

fn assert_well_formed(mesh: &MeshData) {
    assert_eq!(mesh.indices.len() % 3, 0);
    let n = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
    for v in &mesh.vertices {
        let len = Vec3::from(v.normal).length();
        assert!((len - 1.0).abs() < 1e-3, "normal length {len}");
    }
}

#[test]
fn swept_tubes_have_expected_topology() {
    let knot = torus_knot(3.0, 1.0, 64, 8, 2, 3);
    assert_eq!(knot.vertices.len(), 65 * 9);
    assert_eq!(knot.triangle_count(), 64 * 8 * 2);
    assert_well_formed(&knot);

    let ring = torus(4.0, 1.2, 16, 32);
    assert_eq!(ring.vertices.len(), 17 * 33);
    assert_eq!(ring.triangle_count(), 16 * 32 * 2);
    assert_well_formed(&ring);
    let (min_b, max_b) = ring.bounds();
    assert!((max_b.x - 5.2).abs() < 1e-3);
    assert!((min_b.z + 1.2).abs() < 1e-3);
}

#[test]
fn sphere_drops_degenerate_pole_triangles() {
    let s = sphere(1.0, 8, 6);
    assert_eq!(s.triangle_count(), 2 * 8 * 6 - 2 * 8);
    for v in &s.vertices {
        assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn dodecahedron_faces_point_outward() {
    let d = dodecahedron(4.0);
    assert_eq!(d.triangle_count(), 36);
    assert_well_formed(&d);
    for v in &d.vertices {
        let p = Vec3::from(v.position);
        assert!((p.length() - 4.0).abs() < 1e-3);
        assert!(Vec3::from(v.normal).dot(p) > 0.0);
    }
}

#[test]
fn floor_plane_is_flat_and_centred() {
    let f = floor_plane(2.0);
    let (min_b, max_b) = f.bounds();
    assert_eq!(min_b, Vec3::new(-1.0, 0.0, -1.0));
    assert_eq!(max_b, Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(f.triangle_count(), 2);
}

#[test]
fn damping_approaches_without_overshoot_and_settles() {
    let mut d = Damped::new(0.0);
    let mut settled = false;
    for _ in 0..600 {
        if !d.damp(1.0, 0.2, 1.0 / 60.0) {
            settled = true;
            break;
        }
        assert!(d.value <= 1.0);
    }
    assert!(settled);
    assert_eq!(d.value, 1.0);
    assert_eq!(d.velocity, 0.0);
}

#[test]
fn rig_converges_on_pointer_target_at_any_frame_rate() {
    let pointer = Vec2::new(1.0, -0.5);
    let goal = rig_target(pointer);
    let run = |dt: f32, steps: usize| {
        let mut rig = CameraRig::default();
        for _ in 0..steps {
            rig.step(pointer, dt);
        }
        rig.position()
    };
    let slow = run(1.0 / 30.0, 15);
    let fast = run(1.0 / 120.0, 60);
    assert!((slow - fast).length() < 0.05, "{slow} vs {fast}");
    let settled = run(1.0 / 60.0, 600);
    assert!((settled - goal).length() < 1e-2);
}

#[test]
fn rig_distance_to_target_never_grows_with_a_still_pointer() {
    let pointer = Vec2::new(0.7, 0.4);
    let goal = rig_target(pointer);
    let mut rig = CameraRig::default();
    let mut last = (rig.position() - goal).length();
    for frame in 0..200 {
        let d = (rig.step(pointer, 1.0 / 60.0) - goal).length();
        assert!(d <= last + 1e-6, "frame {frame}: {last} -> {d}");
        last = d;
    }
    assert!(last < 1e-2);
}

#[test]
fn centred_pointer_pulls_camera_back_to_base_distance() {
    assert_eq!(rig_target(Vec2::ZERO), Vec3::new(0.0, 0.0, 25.0));
}

fn settle(orbit: &mut OrbitControls) -> Vec3 {
    let mut eye = orbit.eye();
    for _ in 0..600 {
        eye = orbit.update(1.0 / 60.0);
    }
    eye
}

#[test]
fn orbit_polar_angle_stays_in_upper_hemisphere() {
    let mut orbit = OrbitControls::rotation_only(AQUARIUM_CAMERA_POSITION, Vec3::ZERO);
    let radius = orbit.radius();
    assert!((orbit.polar() - FRAC_PI_2).abs() < 1e-4);

    orbit.drag(0.0, -1000.0, 100.0);
    settle(&mut orbit);
    assert!(orbit.polar() <= FRAC_PI_2 + 1e-4);

    orbit.drag(0.0, 1000.0, 100.0);
    let eye = settle(&mut orbit);
    assert!(orbit.polar().abs() < 1e-3);
    assert!((eye.y - radius).abs() < 1e-2);
    assert!((eye.length() - radius).abs() < 1e-3);
}

#[test]
fn orbit_full_height_drag_is_one_turn_at_fixed_distance() {
    let mut orbit = OrbitControls::rotation_only(AQUARIUM_CAMERA_POSITION, Vec3::ZERO);
    let radius = orbit.radius();
    orbit.drag(480.0, 0.0, 480.0);
    let eye = settle(&mut orbit);
    assert!((eye - AQUARIUM_CAMERA_POSITION).length() < 1e-2, "{eye}");
    assert_eq!(orbit.radius(), radius);
    assert_eq!(orbit.target(), Vec3::ZERO);
}

#[test]
fn float_offset_stays_within_its_range() {
    let params = FloatParams::with_float(2.0);
    let motion = FloatMotion::new(params, 123.0);
    for i in 0..2000 {
        let pose = motion.pose(i as f32 * 0.05);
        assert!(pose.offset.y.abs() <= params.max_height() + 1e-5);
        assert_eq!(pose.offset.x, 0.0);
        assert_eq!(pose.offset.z, 0.0);
        let (axis, angle) = pose.rotation.to_axis_angle();
        assert!(axis.is_finite());
        assert!(angle <= params.rotation_intensity * 0.3 + 1e-4);
    }
}

#[test]
fn phases_desynchronise_groups() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = FloatMotion::random(FloatParams::default(), &mut rng);
    let b = FloatMotion::random(FloatParams::default(), &mut rng);
    assert_ne!(a.phase(), b.phase());
    assert_ne!(a.pose(1.0).offset, b.pose(1.0).offset);
}

#[test]
fn bubble_instances_keep_table_scale_and_colour() {
    let mut rng = StdRng::seed_from_u64(7);
    let field = BubbleField::new(&BUBBLES, &mut rng);
    assert_eq!(field.len(), BUBBLES.len());
    let instances = field.instances(aquarium::group_transform(), 3.0);
    assert_eq!(instances.len(), 12);
    for (inst, b) in instances.iter().zip(BUBBLES.iter()) {
        let m = Mat4::from_cols_array_2d(&inst.model);
        assert!((m.x_axis.truncate().length() - b.scale).abs() < 1e-3);
        assert_eq!(&inst.color[..3], &b.color[..]);
        assert_eq!(inst.color[3], 1.0);
    }
}

#[test]
fn shadow_accumulator_averages_then_freezes() {
    let mut acc = ShadowAccumulator::new(3);
    assert_eq!(acc.next_weight(), Some(1.0));
    assert_eq!(acc.next_weight(), Some(0.5));
    let third = acc.next_weight().unwrap_or_default();
    assert!((third - 1.0 / 3.0).abs() < 1e-6);
    assert!(acc.is_done());
    assert_eq!(acc.next_weight(), None);
    assert_eq!(acc.accumulated(), 3);

    acc.reset(2);
    assert_eq!(acc.accumulated(), 0);
    assert_eq!(acc.frames(), 2);
    assert_eq!(ShadowAccumulator::new(0).frames(), 1);
}

#[test]
fn shadow_budget_follows_detail_tier() {
    assert_eq!(aquarium::shadow_accumulator(&DetailParams::HIGH).frames(), 60);
    assert_eq!(aquarium::shadow_accumulator(&DetailParams::LOW).frames(), 30);
}

#[test]
fn randomized_light_samples_stay_above_the_floor() {
    let light = aquarium::shadow_light();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let positions = light.sample(&mut rng);
        assert_eq!(positions.len(), light.amount as usize);
        for p in positions {
            assert!(p.y >= -light.radius);
            let m = light.shadow_matrix(p, Vec3::ZERO);
            assert!(m.is_finite());
        }
    }
}

#[test]
fn light_jitter_spans_half_the_radius_each_way() {
    let light = RandomizedLight {
        ambient: 0.0,
        ..aquarium::shadow_light()
    };
    let half = light.radius * 0.5;
    let mut rng = StdRng::seed_from_u64(11);
    let mut widest = 0.0_f32;
    for _ in 0..200 {
        for p in light.sample(&mut rng) {
            let d = (p - light.position).abs();
            assert!(d.max_element() <= half + 1e-4, "{d}");
            widest = widest.max(d.max_element());
        }
    }
    assert!(widest > half * 0.8);
}

#[test]
fn turtle_sway_is_bounded() {
    for i in 0..1000 {
        assert!(aquarium::turtle_sway(i as f32 * 0.1).abs() <= 0.25 + 1e-6);
    }
}

#[test]
fn bloom_walks_every_level_with_a_widening_kernel() {
    let spreads: Vec<f32> = bloom_level_spreads().collect();
    assert_eq!(spreads.len(), BLOOM_LEVELS as usize);
    assert_eq!(spreads.len(), 8);
    assert!(spreads[0] >= 1.0);
    assert!(spreads.windows(2).all(|w| w[1] > w[0]));
}
