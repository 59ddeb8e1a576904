#![allow(missing_docs)]
//! Behaviour of whole graphs: determinism, value ranges, algebraic
//! identities between combiners, error propagation and shared evaluation.

use nova_noise::{
    Abs, Add, Billow, Checkerboard, Clamp, Const, Curve, Max, Min, ModuleError, ModuleId,
    NoiseGraph, Perlin, Point3D, RidgedMulti, ScaleBias, Select, Terrace, Turbulence, Voronoi,
};
use rayon::prelude::*;

fn sample_points() -> Vec<Point3D> {
    let mut points = Vec::new();
    for i in 0..20 {
        for j in 0..10 {
            for k in 0..6 {
                points.push(Point3D::new(
                    f64::from(i) * 0.173 - 3.1,
                    f64::from(j) * 0.291 + 0.4,
                    f64::from(k) * 0.457 - 1.7,
                ));
            }
        }
    }
    points
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

// Reference values below match libnoise: gradients come from its
// `g_randomVectors` table, indexed by the lattice hash
// `(1619 x + 31337 y + 6971 z + 1013 seed)` folded with `>> 8` and masked to
// 8 bits.
#[test]
fn perlin_reference_values() {
    let mut graph = NoiseGraph::new();
    let mut single = Perlin::new();
    single.set_octave_count(1).expect("valid octave count");
    let single = graph.add(single);
    let perlin = graph.add(Perlin::new());

    assert_close(
        graph.evaluate(single, 0.5, 0.5, 0.5).expect("evaluation"),
        -0.007_778_425_749_999_97,
    );
    // Every octave after the first lands on a lattice corner, where gradient
    // noise is zero
    assert_close(
        graph.evaluate(perlin, 0.5, 0.5, 0.5).expect("evaluation"),
        -0.007_778_425_749_999_97,
    );

    let mut seeded = Perlin::new();
    seeded.set_seed(42);
    let seeded = graph.add(seeded);
    assert_close(
        graph.evaluate(seeded, 1.25, -0.75, 3.5).expect("evaluation"),
        -0.220_137_529_268_554_8,
    );
}

#[test]
fn fractal_reference_values() {
    let mut graph = NoiseGraph::new();
    let billow = graph.add(Billow::new());
    let ridged = graph.add(RidgedMulti::new());
    let voronoi = graph.add(Voronoi::new());
    let mut with_distance = Voronoi::new();
    with_distance.enable_distance(true);
    let with_distance = graph.add(with_distance);

    let at = |id| graph.evaluate(id, 1.25, -0.75, 3.5).expect("evaluation");
    assert_close(at(billow), -0.504_804_946_723_632_9);
    assert_close(at(ridged), 0.267_434_613_740_275_66);
    assert_close(at(voronoi), -0.741_041_249_595_582_5);
    assert_close(at(with_distance), -0.175_375_999_730_691_07);
}

#[test]
fn evaluation_is_deterministic() {
    let build = || {
        let mut graph = NoiseGraph::new();
        let perlin = graph.add(Perlin::new());
        let ridged = graph.add(RidgedMulti::new());
        let turbulence = graph
            .add_with_sources(Turbulence::new(), &[ridged])
            .expect("valid wiring");
        let root = graph
            .add_with_sources(Add, &[perlin, turbulence])
            .expect("valid wiring");
        (graph, root)
    };
    let (first, first_root) = build();
    let (second, second_root) = build();

    for point in sample_points() {
        let a = first.evaluate_point(first_root, point).expect("evaluation");
        let b = second.evaluate_point(second_root, point).expect("evaluation");
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn fractal_sources_stay_bounded() {
    let mut graph = NoiseGraph::new();
    let sources = [
        graph.add(Perlin::new()),
        graph.add(Billow::new()),
        graph.add(RidgedMulti::new()),
    ];
    let voronoi = graph.add(Voronoi::new());

    for point in sample_points() {
        for &source in &sources {
            let value = graph.evaluate_point(source, point).expect("evaluation");
            assert!((-2.0..=2.0).contains(&value), "value out of range: {value}");
        }
        let value = graph.evaluate_point(voronoi, point).expect("evaluation");
        assert!((-1.0..=1.0).contains(&value), "value out of range: {value}");
    }
}

#[test]
fn perlin_is_continuous() {
    let mut graph = NoiseGraph::new();
    let perlin = graph.add(Perlin::new());
    let step = Point3D::new(1e-7, 1e-7, 1e-7);

    for point in sample_points() {
        let a = graph.evaluate_point(perlin, point).expect("evaluation");
        let b = graph.evaluate_point(perlin, point + step).expect("evaluation");
        assert!((a - b).abs() < 1e-4, "jump of {} at {point:?}", (a - b).abs());
    }
}

#[test]
fn combiner_algebra() {
    let mut graph = NoiseGraph::new();
    let perlin = graph.add(Perlin::new());
    let billow = graph.add(Billow::new());
    let ab = graph.add_with_sources(Add, &[perlin, billow]).expect("valid wiring");
    let ba = graph.add_with_sources(Add, &[billow, perlin]).expect("valid wiring");
    let min = graph.add_with_sources(Min, &[perlin, billow]).expect("valid wiring");
    let max = graph.add_with_sources(Max, &[perlin, billow]).expect("valid wiring");
    let folded = graph.add_with_sources(Abs, &[perlin]).expect("valid wiring");

    for point in sample_points() {
        let p = graph.evaluate_point(perlin, point).expect("evaluation");
        let b = graph.evaluate_point(billow, point).expect("evaluation");

        assert_eq!(graph.evaluate_point(ab, point), Ok(p + b));
        assert_eq!(graph.evaluate_point(ba, point), Ok(p + b));

        let lo = graph.evaluate_point(min, point).expect("evaluation");
        let hi = graph.evaluate_point(max, point).expect("evaluation");
        assert!(lo <= hi);
        assert!(lo == p || lo == b);

        let value = graph.evaluate_point(folded, point).expect("evaluation");
        assert!(value >= 0.0);
        assert_eq!(value, p.abs());
    }
}

#[test]
fn select_switches_on_control_band() {
    let mut graph = NoiseGraph::new();
    let low = graph.add(Const::new(-5.0));
    let high = graph.add(Const::new(5.0));
    let control = graph.add(Perlin::new());
    let mut select = Select::new();
    select.set_bounds(-0.25, 0.25).expect("valid bounds");
    let select = graph
        .add_with_sources(select, &[low, high, control])
        .expect("valid wiring");

    for point in sample_points() {
        let ctrl = graph.evaluate_point(control, point).expect("evaluation");
        let expected = if (-0.25..=0.25).contains(&ctrl) { 5.0 } else { -5.0 };
        assert_eq!(graph.evaluate_point(select, point), Ok(expected));
    }
}

#[test]
fn parameter_validation() {
    let mut clamp = Clamp::new();
    assert!(matches!(
        clamp.set_bounds(1.0, 0.0),
        Err(ModuleError::InvalidParameter(_))
    ));

    let mut terrace = Terrace::new();
    assert!(matches!(
        terrace.make_control_points(1),
        Err(ModuleError::InvalidParameter(_))
    ));

    let mut graph = NoiseGraph::new();
    let source = graph.add(Const::new(0.0));
    let curve = graph
        .add_with_sources(Curve::new(), &[source])
        .expect("valid wiring");
    assert_eq!(
        graph.evaluate(curve, 0.0, 0.0, 0.0),
        Err(ModuleError::PointsNeeded {
            available: 0,
            required: 4
        })
    );
}

#[test]
fn missing_source_reports_first_empty_slot() {
    let mut graph = NoiseGraph::new();
    let add = graph.add(Add);
    assert_eq!(
        graph.evaluate(add, 0.0, 0.0, 0.0),
        Err(ModuleError::MissingSource {
            module: add,
            slot: 0
        })
    );
}

#[test]
fn errors_propagate_to_the_root() {
    let mut graph = NoiseGraph::new();
    let broken = graph.add(Abs);
    let scale = graph
        .add_with_sources(ScaleBias::new(), &[broken])
        .expect("valid wiring");
    let perlin = graph.add(Perlin::new());
    let root = graph
        .add_with_sources(Add, &[perlin, scale])
        .expect("valid wiring");

    assert_eq!(
        graph.evaluate(root, 0.1, 0.2, 0.3),
        Err(ModuleError::MissingSource {
            module: broken,
            slot: 0
        })
    );
}

#[test]
fn terrace_over_clamped_source() {
    let mut graph = NoiseGraph::new();
    let perlin = graph.add(Perlin::new());
    let mut clamp = Clamp::new();
    clamp.set_bounds(-1.0, 0.999).expect("valid bounds");
    let clamped = graph.add_with_sources(clamp, &[perlin]).expect("valid wiring");
    let mut terrace = Terrace::new();
    terrace.make_control_points(4).expect("enough points");
    let terrace = graph
        .add_with_sources(terrace, &[clamped])
        .expect("valid wiring");

    for point in sample_points() {
        let value = graph.evaluate_point(terrace, point).expect("evaluation");
        assert!((-1.0..=1.0).contains(&value));
    }
}

#[test]
fn checkerboard_alternates() {
    let mut graph = NoiseGraph::new();
    let board = graph.add(Checkerboard);
    assert_eq!(graph.evaluate(board, 0.5, 0.5, 0.5), Ok(1.0));
    assert_eq!(graph.evaluate(board, 1.5, 0.5, 0.5), Ok(-1.0));
    assert_eq!(graph.evaluate(board, -0.5, 0.5, 0.5), Ok(-1.0));
}

#[test]
fn shared_graph_evaluates_in_parallel() {
    let mut graph = NoiseGraph::new();
    let perlin = graph.add(Perlin::new());
    let ridged = graph.add(RidgedMulti::new());
    let root: ModuleId = graph
        .add_with_sources(Max, &[perlin, ridged])
        .expect("valid wiring");

    let points = sample_points();
    let sequential: Vec<f64> = points
        .iter()
        .map(|&p| graph.evaluate_point(root, p).expect("evaluation"))
        .collect();
    let parallel: Vec<f64> = points
        .par_iter()
        .map(|&p| graph.evaluate_point(root, p).expect("evaluation"))
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn spherical_sampling_matches_cartesian() {
    let mut graph = NoiseGraph::new();
    let perlin = graph.add(Perlin::new());

    let on_sphere = graph.evaluate_sphere(perlin, 30.0, 45.0).expect("evaluation");
    let cartesian = graph
        .evaluate_point(perlin, Point3D::from_lat_lon(30.0, 45.0))
        .expect("evaluation");
    assert_eq!(on_sphere.to_bits(), cartesian.to_bits());
}

#[cfg(feature = "serde")]
#[test]
fn value_types_serialize() {
    use nova_noise::{Axis, ControlPoint, Quality};

    let point = Point3D::new(1.0, -2.5, 3.0);
    let json = serde_json::to_string(&point).expect("serialize");
    assert_eq!(
        serde_json::from_str::<Point3D>(&json).expect("deserialize"),
        point
    );

    assert_eq!(
        serde_json::to_string(&Quality::Best).expect("serialize"),
        "\"Best\""
    );
    assert_eq!(
        serde_json::to_string(&Axis::Z).expect("serialize"),
        "\"Z\""
    );

    let control = ControlPoint::new(0.5, -0.25);
    let json = serde_json::to_string(&control).expect("serialize");
    assert_eq!(
        serde_json::from_str::<ControlPoint>(&json).expect("deserialize"),
        control
    );
}
