use depth_layout::common::{BatchPolicy, BoxFormat, CompositorConfig, DepthConvention, LayoutError};
use depth_layout::data::DatasetKind;
use std::io::Write;

#[test]
fn parses_json_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "depth_convention": "disparity",
            "target_range": [0.1, 0.9],
            "box_format": "cxcywh",
            "batch_policy": "abort",
            "resize_depth": true
        }}"#
    )
    .unwrap();

    let config = CompositorConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.depth_convention, Some(DepthConvention::NearerHigher));
    assert_eq!(config.target_range, (0.1, 0.9));
    assert_eq!(config.box_format, BoxFormat::Cxcywh);
    assert_eq!(config.batch_policy, BatchPolicy::Abort);
    assert!(config.resize_depth);
    // untouched fields keep their defaults
    assert_eq!(config.num_obj, DatasetKind::Coco.num_obj());
    assert_eq!(config.depth_suffix, ".npy");
    assert_eq!(config.validate().unwrap(), DepthConvention::NearerHigher);
}

#[test]
fn rejects_unreadable_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "depth_convention": "sideways" }}"#).unwrap();
    assert!(CompositorConfig::from_json_file(file.path()).is_err());
    assert!(CompositorConfig::from_json_file("/nonexistent/config.json").is_err());
}

#[test]
fn convention_spellings() {
    for name in ["nearer_higher", "Higher", "DISPARITY"] {
        assert_eq!(DepthConvention::from_str(name), Some(DepthConvention::NearerHigher));
    }
    for name in ["nearer_lower", "lower", "metric"] {
        assert_eq!(DepthConvention::from_str(name), Some(DepthConvention::NearerLower));
    }
    assert_eq!(DepthConvention::from_str("auto"), None);
    assert_eq!(DepthConvention::NearerLower.to_string(), "nearer_lower");
}

#[test]
fn reference_pair_must_agree() {
    let disparity = CompositorConfig::new()
        .with_depth_convention(DepthConvention::NearerHigher)
        .with_reference_pair(12.0, 3.0);
    assert!(disparity.validate().is_ok());

    let contradicted = disparity.clone().with_depth_convention(DepthConvention::NearerLower);
    assert!(matches!(contradicted.validate(), Err(LayoutError::InvalidDepthConvention(_))));

    let ambiguous = disparity.with_reference_pair(5.0, 5.0);
    assert!(matches!(ambiguous.validate(), Err(LayoutError::InvalidDepthConvention(_))));
}

#[test]
fn target_range_must_increase() {
    let config = CompositorConfig::new()
        .with_depth_convention(DepthConvention::NearerLower)
        .with_target_range(1.0, 0.0);
    assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

    let config = config.with_target_range(0.0, f32::INFINITY);
    assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));
}

#[test]
fn dataset_presets() {
    let config = CompositorConfig::new().with_dataset(DatasetKind::VisualGenome);
    assert_eq!(config.num_obj, 31);
    assert!(config.to_string().contains("Depth Convention: <unset>"));
}
