use approx::assert_abs_diff_eq;
use depth_layout::common::{
    BoxFormat, CompositorConfig, CoordBox, DepthConvention, DepthMap, Layout, LayoutError, LayoutObject, NormBox,
};
use depth_layout::compositing::{
    composite, normalize_depths, paint_order, DepthCompositor, DepthPatch, LayoutProcess,
};
use depth_layout::data::{MemoryDepthStore, TimeCalc};
use ndarray::{s, Array2};

fn compositor(convention: DepthConvention) -> DepthCompositor {
    DepthCompositor::new(CompositorConfig::new().with_depth_convention(convention)).unwrap()
}

fn two_box_layout() -> Layout {
    Layout::new("two_boxes", 100, 100)
        .with_object(LayoutObject::new(1, NormBox::new(0.0, 0.0, 0.5, 0.5)))
        .with_object(LayoutObject::new(2, NormBox::new(0.25, 0.25, 0.5, 0.5)))
}

/// 0.4 everywhere, 0.8 inside the second box of `two_box_layout`.
fn two_box_depth() -> DepthMap {
    let mut depth = Array2::from_elem((100, 100), 0.4f32);
    depth.slice_mut(s![25..75, 25..75]).fill(0.8);
    DepthMap::from(depth)
}

#[test]
fn end_to_end_two_boxes() {
    let layout = two_box_layout();
    let result = compositor(DepthConvention::NearerHigher)
        .run(&layout, &two_box_depth())
        .unwrap();

    assert_eq!(result.shape(), (100, 100));
    assert_eq!(result.order, vec![0, 1]);
    assert_eq!(result.nearest(), Some(1));
    assert_abs_diff_eq!(result.depth_of(0).unwrap(), 0.0);
    assert_abs_diff_eq!(result.depth_of(1).unwrap(), 1.0);

    let canvas = &result.canvas;
    // all of box 2, including the overlap with box 1
    assert!(canvas.slice(s![25..75, 25..75]).iter().all(|&v| v == 1.0));
    // box 1 outside the overlap carries its own (minimum) value
    assert!(canvas.slice(s![0..25, 0..50]).iter().all(|&v| v == 0.0));
    assert!(canvas.slice(s![25..50, 0..25]).iter().all(|&v| v == 0.0));
    // background
    assert_eq!(canvas[[90, 90]], 0.0);
    assert_eq!(canvas[[10, 80]], 0.0);
}

#[test]
fn end_to_end_three_boxes_uses_target_range() {
    let layout = two_box_layout()
        .with_object(LayoutObject::new(3, NormBox::new(0.8, 0.8, 0.2, 0.2)));
    let mut depth = two_box_depth().into_array();
    depth.slice_mut(s![80..100, 80..100]).fill(0.6);

    let config = CompositorConfig::new()
        .with_depth_convention(DepthConvention::NearerHigher)
        .with_target_range(0.2, 1.0);
    let result = DepthCompositor::new(config)
        .unwrap()
        .run(&layout, &DepthMap::from(depth))
        .unwrap();

    // box 1 mean is (1875 * 0.4 + 625 * 0.8) / 2500 = 0.5
    assert_abs_diff_eq!(result.depth_of(0).unwrap(), 0.2, epsilon = 1e-5);
    assert_abs_diff_eq!(result.depth_of(1).unwrap(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(result.depth_of(2).unwrap(), 0.4666667, epsilon = 1e-5);
    assert_eq!(result.order, vec![0, 2, 1]);
    assert_abs_diff_eq!(result.canvas[[5, 5]], 0.2, epsilon = 1e-5);
    assert_abs_diff_eq!(result.canvas[[90, 90]], result.depth_of(2).unwrap());
}

#[test]
fn nearer_object_wins_overlap_for_either_convention() {
    let a = DepthPatch::new(0, 0.2, CoordBox::new(0, 0, 60, 60));
    let b = DepthPatch::new(1, 0.9, CoordBox::new(40, 40, 100, 100));
    let overlap = s![40..60, 40..60];

    // disparity-like: larger is nearer, B is in front
    let (canvas, order) = composite(&[a, b], DepthConvention::NearerHigher, (100, 100));
    assert_eq!(order, vec![0, 1]);
    assert!(canvas.slice(overlap).iter().all(|&v| v == 0.9));
    assert_eq!(canvas[[10, 10]], 0.2);
    assert_eq!(canvas[[90, 90]], 0.9);

    // metric-like: smaller is nearer, A is in front
    let (canvas, order) = composite(&[a, b], DepthConvention::NearerLower, (100, 100));
    assert_eq!(order, vec![1, 0]);
    assert!(canvas.slice(overlap).iter().all(|&v| v == 0.2));
    assert_eq!(canvas[[90, 90]], 0.9);
}

#[test]
fn composite_is_independent_of_input_order() {
    let patches = vec![
        DepthPatch::new(0, 0.5, CoordBox::new(0, 0, 30, 30)),
        DepthPatch::new(1, 0.1, CoordBox::new(10, 10, 50, 50)),
        DepthPatch::new(2, 0.5, CoordBox::new(20, 0, 40, 20)),
        DepthPatch::new(3, 0.8, CoordBox::new(25, 25, 35, 35)),
    ];
    let mut reversed = patches.clone();
    reversed.reverse();
    let rotated: Vec<DepthPatch> = patches.iter().cycle().skip(2).take(4).copied().collect();

    let (canvas, order) = composite(&patches, DepthConvention::NearerHigher, (50, 50));
    for other in [reversed, rotated] {
        let (c, o) = composite(&other, DepthConvention::NearerHigher, (50, 50));
        assert_eq!(c, canvas);
        assert_eq!(o, order);
    }

    // ties paint in slot order
    assert_eq!(order, vec![1, 0, 2, 3]);
    assert_eq!(canvas[[5, 25]], 0.5);
}

#[test]
fn tie_break_is_by_slot_index_for_both_conventions() {
    let patches = [
        DepthPatch::new(4, 0.3, CoordBox::new(0, 0, 1, 1)),
        DepthPatch::new(2, 0.3, CoordBox::new(0, 0, 1, 1)),
        DepthPatch::new(7, 0.3, CoordBox::new(0, 0, 1, 1)),
    ];
    assert_eq!(paint_order(&patches, DepthConvention::NearerHigher), vec![2, 4, 7]);
    assert_eq!(paint_order(&patches, DepthConvention::NearerLower), vec![2, 4, 7]);
}

#[test]
fn repeated_runs_are_identical() {
    let c = compositor(DepthConvention::NearerHigher);
    let depth = two_box_depth();
    let first = c.run(&two_box_layout(), &depth).unwrap();
    for _ in 0..3 {
        assert_eq!(c.run(&two_box_layout(), &depth).unwrap(), first);
    }
}

#[test]
fn degenerate_box_never_painted() {
    let layout = Layout::new("degenerate", 100, 100)
        .with_object(LayoutObject::new(4, NormBox::new(0.5, 0.5, 0.0, 0.0)))
        .with_object(LayoutObject::new(9, NormBox::new(0.0, 0.0, 0.3, 0.3)))
        .with_object(LayoutObject::new(6, NormBox::new(0.7, 0.7, 0.2, 0.0)));
    let depth = DepthMap::constant(100, 100, 5.0);

    let result = compositor(DepthConvention::NearerHigher).run(&layout, &depth).unwrap();

    assert_eq!(result.objects.len(), 3);
    assert!(result.objects[0].excluded);
    assert!(result.objects[2].excluded);
    assert_eq!(result.depth_of(0), None);
    assert_eq!(result.order, vec![1]);
    // a single remaining object lands on the midpoint
    assert_abs_diff_eq!(result.depth_of(1).unwrap(), 0.5);
    assert_eq!(result.canvas[[50, 50]], 0.0);
    assert_eq!(result.canvas[[75, 75]], 0.0);
    assert_eq!(result.canvas[[10, 10]], 0.5);
}

#[test]
fn box_over_the_border_is_clipped_not_shifted() {
    // centred on the left edge: covers columns 0..10 only
    let edge = NormBox::from_raw([0.0, 0.5, 0.2, 0.2], BoxFormat::Cxcywh);
    let layout = Layout::new("edge", 100, 100)
        .with_object(LayoutObject::new(3, edge))
        .with_object(LayoutObject::new(5, NormBox::new(0.5, 0.5, 0.2, 0.2)));
    let mut depth = Array2::from_elem((100, 100), 1.0f32);
    depth.slice_mut(s![.., 0..10]).fill(9.0);

    let result = compositor(DepthConvention::NearerHigher)
        .run(&layout, &DepthMap::from(depth))
        .unwrap();

    assert_eq!(result.order, vec![1, 0]);
    assert_eq!(result.canvas[[50, 5]], 1.0);
    assert_eq!(result.canvas[[50, 15]], 0.0);
    assert_eq!(result.canvas.slice(s![40..60, 0..10]).iter().filter(|&&v| v == 1.0).count(), 200);
}

#[test]
fn no_valid_objects_gives_zero_canvas() {
    let layout = Layout::new("empty", 32, 48)
        .with_object(LayoutObject::new(0, NormBox::new(0.0, 0.0, 1.0, 1.0)));
    let result = compositor(DepthConvention::NearerLower)
        .run(&layout, &DepthMap::constant(32, 48, 1.0))
        .unwrap();

    assert_eq!(result.shape(), (32, 48));
    assert!(result.objects.is_empty());
    assert!(result.order.is_empty());
    assert!(result.canvas.iter().all(|&v| v == 0.0));
}

#[test]
fn normalizer_stays_in_range() {
    let out = normalize_depths(&[3.0, -1.0, 7.0, 2.5], (0.0, 1.0));
    assert_abs_diff_eq!(out[0], 0.5);
    assert_abs_diff_eq!(out[1], 0.0);
    assert_abs_diff_eq!(out[2], 1.0);
    assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));

    assert_eq!(normalize_depths(&[42.0], (0.0, 1.0)), vec![0.5]);
    assert_eq!(normalize_depths(&[1.5, 1.5, 1.5], (0.0, 1.0)), vec![0.5; 3]);
    assert!(normalize_depths(&[], (0.0, 1.0)).is_empty());

    let tiny = normalize_depths(&[1e-30, 2e-30, 1.5e-30], (0.0, 1.0));
    assert!(tiny.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn flipped_layout_sees_the_same_depths() {
    // depth grows left to right
    let depth = DepthMap::from(Array2::from_shape_fn((100, 100), |(_, x)| x as f32));
    let layout = two_box_layout();
    let c = compositor(DepthConvention::NearerHigher);
    let plain = c.run(&layout, &depth).unwrap();

    let mut flipped = layout.clone();
    flipped.flip_horizontal();
    let mirrored = c.run(&flipped, &depth).unwrap();

    assert_eq!(mirrored.objects, plain.objects);
    assert_eq!(mirrored.order, plain.order);
    assert_eq!(mirrored.canvas, plain.canvas.slice(s![.., ..;-1]).to_owned());

    // forgetting to orient the depth map silently swaps the order
    let mut unoriented = flipped.clone();
    unoriented.flip = false;
    let wrong = c.run(&unoriented, &depth).unwrap();
    assert_eq!(wrong.order, vec![1, 0]);
}

#[test]
fn double_flip_restores_depth_map() {
    let depth = DepthMap::from(Array2::from_shape_fn((7, 13), |(y, x)| (y * 13 + x) as f32 * 0.37));
    let once = depth.oriented(true);
    assert_eq!(once[[0, 0]], depth[[0, 12]]);
    assert_eq!(once[[6, 12]], depth[[6, 0]]);

    let twice = depth_layout::common::orient(once, true);
    assert_eq!(twice, depth.view());
    assert_eq!(depth.oriented(false), depth.view());
}

#[test]
fn shape_mismatch_is_fatal() {
    let err = compositor(DepthConvention::NearerHigher)
        .run(&two_box_layout(), &DepthMap::constant(50, 100, 1.0))
        .unwrap_err();
    match err {
        LayoutError::ShapeMismatch { expected, found } => {
            assert_eq!(expected, (100, 100));
            assert_eq!(found, (50, 100));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resize_is_opt_in() {
    let store = MemoryDepthStore::new();
    store.insert("two_boxes", DepthMap::constant(50, 50, 2.0));
    let layout = two_box_layout();

    let strict = compositor(DepthConvention::NearerHigher);
    assert!(matches!(
        strict.composite_with_store(&store, &layout),
        Err(LayoutError::ShapeMismatch { .. })
    ));

    let resizing = DepthCompositor::new(
        CompositorConfig::new()
            .with_depth_convention(DepthConvention::NearerHigher)
            .with_resize_depth(true),
    )
    .unwrap();
    let result = resizing.composite_with_store(&store, &layout).unwrap();
    assert_eq!(result.shape(), (100, 100));
    assert_eq!(result.order.len(), 2);
}

#[test]
fn missing_depth_map_is_reported() {
    let store = MemoryDepthStore::new();
    let err = compositor(DepthConvention::NearerHigher)
        .composite_with_store(&store, &two_box_layout())
        .unwrap_err();
    assert!(matches!(err, LayoutError::MissingDepthMap { ref filename } if filename == "two_boxes"));
}

#[test]
fn too_many_objects_is_rejected() {
    let config = CompositorConfig::new()
        .with_depth_convention(DepthConvention::NearerHigher)
        .with_num_obj(1);
    let err = DepthCompositor::new(config)
        .unwrap()
        .run(&two_box_layout(), &two_box_depth())
        .unwrap_err();
    assert!(matches!(err, LayoutError::TooManyObjects { count: 2, max: 1 }));
}

#[test]
fn unset_convention_fails_at_startup() {
    let err = DepthCompositor::new(CompositorConfig::new()).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDepthConvention(_)));
    assert!(depth_layout::init_compositor(&CompositorConfig::new()).is_err());
}

#[test]
fn forward_records_stage_timings() {
    let c = compositor(DepthConvention::NearerHigher);
    let depth = two_box_depth();
    let mut timer = TimeCalc::default();
    for _ in 0..4 {
        c.forward(&two_box_layout(), &depth, Some(&mut timer)).unwrap();
    }
    assert_eq!(timer.runs(), 4);
    assert_eq!(timer.stages().len(), 3);
    assert!(timer.avg_stage(3).is_none());
}
